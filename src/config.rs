//! Site configuration: profile, links, backdrop pool, stream, and timings.
//! Defaults describe the reference deployment; a server-rendered page can
//! override any part through the `__PRELOADED_STATE__` JSON global.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::backdrop::{CrossfadeSettings, MediaPool};
use crate::deep_link::LinkTarget;
use crate::error::ConfigError;

const DEFAULT_MEDIA_TEMPLATE: &str =
    "https://github.com/radiohost-cloud/loveluxurylife/raw/main/background/{n}.mp4";
const DEFAULT_MEDIA_COUNT: usize = 20;
const DEFAULT_STREAM_URL: &str = "https://stream.radiohost.cloud/listen/live/radio.mp3";

#[cfg(target_arch = "wasm32")]
const PRELOADED_STATE_KEY: &str = "__PRELOADED_STATE__";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub bio: String,
    pub avatar_url: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "#LLL".to_string(),
            bio: "Curating the finest in luxury, fashion, and style. A life of wealth and taste, \
                  set to a soundtrack of chill fashion music. Explore our exclusive world below."
                .to_string(),
            avatar_url: "https://github.com/radiohost-cloud/loveluxurylife/raw/main/avatar.jpg"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_url: Option<String>,
}

impl Link {
    fn new(id: &str, title: &str, url: &str, mobile_url: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            mobile_url: Some(mobile_url.to_string()),
        }
    }

    pub fn target(&self) -> LinkTarget {
        LinkTarget::new(self.url.clone(), self.mobile_url.clone())
    }
}

fn default_links() -> Vec<Link> {
    vec![
        Link::new(
            "1",
            "Youtube",
            "https://www.youtube.com/@radioluxurylove",
            "youtube://www.youtube.com/@radioluxurylove",
        ),
        Link::new(
            "2",
            "Instagram",
            "https://www.instagram.com/channel/Abbtoj2Ysc3rcLAG/",
            "instagram://channel?id=Abbtoj2Ysc3rcLAG",
        ),
        Link::new(
            "3",
            "TikTok",
            "https://www.tiktok.com/@radiomore.love",
            "tiktok://user?username=radiomore.love",
        ),
        Link::new(
            "4",
            "Facebook",
            "https://www.facebook.com/share/1At1j1eXh1/?mibextid=wwXIfr",
            "fb://facewebmodal/f?href=https://www.facebook.com/share/1At1j1eXh1/?mibextid=wwXIfr",
        ),
    ]
}

/// Backdrop clip pool: an explicit list wins over the numbered template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaConfig {
    pub url_template: String,
    pub count: usize,
    pub sources: Vec<String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_MEDIA_TEMPLATE.to_string(),
            count: DEFAULT_MEDIA_COUNT,
            sources: Vec::new(),
        }
    }
}

impl MediaConfig {
    pub fn pool(&self) -> Result<MediaPool, ConfigError> {
        let pool = if self.sources.is_empty() {
            MediaPool::from_template(&self.url_template, self.count)?
        } else {
            MediaPool::new(self.sources.iter().cloned())?
        };
        Ok(pool)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timings {
    pub settle_ms: u64,
    pub fallback_ms: u64,
    pub max_play_failures: u32,
    pub prompt_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            settle_ms: 1000,
            fallback_ms: 2500,
            max_play_failures: 3,
            prompt_ms: 10_000,
        }
    }
}

impl Timings {
    pub fn crossfade(&self) -> CrossfadeSettings {
        CrossfadeSettings {
            settle_delay: Duration::from_millis(self.settle_ms),
            max_play_failures: self.max_play_failures.max(1),
        }
    }

    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_ms)
    }

    pub fn prompt_duration(&self) -> Duration {
        Duration::from_millis(self.prompt_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub profile: Profile,
    pub links: Vec<Link>,
    pub media: MediaConfig,
    pub stream_url: String,
    pub timings: Timings,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            links: default_links(),
            media: MediaConfig::default(),
            stream_url: DEFAULT_STREAM_URL.to_string(),
            timings: Timings::default(),
        }
    }
}

impl SiteConfig {
    /// Parses an override document. Missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (index, link) in self.links.iter().enumerate() {
            if link.id.trim().is_empty() {
                return Err(ConfigError::EmptyLinkId { index });
            }
            if !seen.insert(link.id.as_str()) {
                return Err(ConfigError::DuplicateLinkId(link.id.clone()));
            }
            if link.url.trim().is_empty() {
                return Err(ConfigError::EmptyLinkUrl(link.id.clone()));
            }
        }
        self.media.pool()?;
        Ok(())
    }

    /// Reads the page's preloaded state, falling back to defaults.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let Some(raw) = preloaded_state_json() else {
            return Self::default();
        };
        match Self::from_json(&raw) {
            Ok(config) => {
                tracing::info!(links = config.links.len(), "using preloaded site config");
                config
            }
            Err(err) => {
                tracing::warn!(%err, "ignoring preloaded site config");
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(target_arch = "wasm32")]
fn preloaded_state_json() -> Option<String> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &PRELOADED_STATE_KEY.into()).ok()?;
    if value.is_null() || value.is_undefined() {
        return None;
    }
    js_sys::JSON::stringify(&value).ok()?.as_string()
}
