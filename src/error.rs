// Error types for the aura crate.
// Covers network fetches, cache store I/O, and configuration loading.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuraError {
    #[error("network error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("install aborted: {url} could not be precached")]
    InstallAborted { url: String },

    #[error("no cache directory available on this platform")]
    NoCacheDir,

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AuraError>;
