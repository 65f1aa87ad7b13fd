//! Pagination and producer errors.

use chat_client::MessengerError;
use thiserror::Error;

/// Errors a result producer can report.
#[derive(Error, Debug)]
pub enum ProducerError {
    /// Query rejected before any request was made.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rate limit exceeded")]
    RateLimit,

    /// Producer is not configured (missing API key, etc.).
    #[error("Producer not configured: {0}")]
    NotConfigured(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

/// Errors surfaced by the pagination engine and reaction router.
#[derive(Error, Debug)]
pub enum PaginationError {
    /// The producer returned nothing displayable.
    #[error("No results found for `{query}`")]
    NoResults { query: String },

    #[error("Unknown or disabled producer: {0}")]
    UnknownProducer(String),

    #[error("Producer error: {0}")]
    Producer(#[from] ProducerError),

    #[error("Messaging error: {0}")]
    Messenger(#[from] MessengerError),
}

impl PaginationError {
    /// Whether this should be reported to operators rather than shown
    /// to the user as a plain reply.
    pub fn is_unexpected(&self) -> bool {
        match self {
            Self::NoResults { .. } => false,
            Self::Messenger(e) => !e.is_expected(),
            _ => true,
        }
    }
}
