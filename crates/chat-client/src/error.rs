//! Chat client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MessengerError {
    #[error("Message or channel not found")]
    NotFound,

    #[error("Missing permissions")]
    Forbidden,

    #[error("Rate limited by platform")]
    RateLimited,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MessengerError {
    /// Whether this is an outcome callers recover from locally
    /// (the target is gone, or the bot may not touch it).
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::NotFound | Self::Forbidden)
    }
}
