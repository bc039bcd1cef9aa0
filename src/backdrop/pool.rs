use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PoolError;

/// Both buffers plus one spare.
pub const MIN_POOL_SIZE: usize = 3;

/// Rejection sampling gives up after this many draws and scans instead.
const MAX_PICK_ATTEMPTS: usize = 32;

/// Opaque identifier (URL) of an ambient clip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaSource(String);

impl MediaSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn url(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaSource {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MediaSource {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Fixed, ordered set of interchangeable clips. Always holds at least
/// [`MIN_POOL_SIZE`] distinct entries.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaPool {
    sources: Vec<MediaSource>,
}

impl MediaPool {
    /// Builds a pool from an explicit list, dropping repeated URLs while
    /// keeping first-seen order.
    pub fn new<I, S>(sources: I) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = S>,
        S: Into<MediaSource>,
    {
        let mut unique: Vec<MediaSource> = Vec::new();
        for source in sources {
            let source = source.into();
            if source.url().trim().is_empty() || unique.contains(&source) {
                continue;
            }
            unique.push(source);
        }

        if unique.len() < MIN_POOL_SIZE {
            return Err(PoolError::TooSmall {
                required: MIN_POOL_SIZE,
                actual: unique.len(),
            });
        }

        Ok(Self { sources: unique })
    }

    /// Expands a numbered naming convention, e.g.
    /// `https://host/background/{n}.mp4` with `count = 20` gives `1.mp4..20.mp4`.
    pub fn from_template(template: &str, count: usize) -> Result<Self, PoolError> {
        if !template.contains("{n}") {
            return Err(PoolError::MissingPlaceholder(template.to_string()));
        }
        Self::new((1..=count).map(|n| MediaSource::new(template.replace("{n}", &n.to_string()))))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn sources(&self) -> &[MediaSource] {
        &self.sources
    }

    pub fn contains(&self, source: &MediaSource) -> bool {
        self.sources.contains(source)
    }
}

/// Picks a random source that is not in `excluded`.
///
/// Draws at random first; if the bounded number of draws all hit excluded
/// sources, falls back to a uniform choice among the eligible ones. Returns
/// `None` only when every source in the pool is excluded.
pub fn pick_distinct<R: Rng>(
    pool: &MediaPool,
    excluded: &[&MediaSource],
    rng: &mut R,
) -> Option<MediaSource> {
    let sources = pool.sources();
    if sources.is_empty() {
        return None;
    }

    for _ in 0..MAX_PICK_ATTEMPTS {
        let candidate = &sources[rng.gen_range(0..sources.len())];
        if !excluded.contains(&candidate) {
            return Some(candidate.clone());
        }
    }

    let eligible: Vec<&MediaSource> = sources
        .iter()
        .filter(|source| !excluded.contains(source))
        .collect();
    eligible.choose(rng).map(|source| (*source).clone())
}
