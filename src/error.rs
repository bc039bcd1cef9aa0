use thiserror::Error;

/// Raised when a media pool cannot keep both buffers distinct with a spare.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("media pool needs at least {required} distinct sources, got {actual}")]
    TooSmall { required: usize, actual: usize },
    #[error("media url template `{0}` has no `{{n}}` placeholder")]
    MissingPlaceholder(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid site config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("link #{index} has an empty id")]
    EmptyLinkId { index: usize },
    #[error("duplicate link id `{0}`")]
    DuplicateLinkId(String),
    #[error("link `{0}` has an empty url")]
    EmptyLinkUrl(String),
    #[error(transparent)]
    Pool(#[from] PoolError),
}
