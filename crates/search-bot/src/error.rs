//! Application error types.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Chat error: {0}")]
    Messenger(#[from] chat_client::MessengerError),

    #[error("Pagination error: {0}")]
    Pagination(#[from] pagination::PaginationError),
}

impl AppError {
    /// Whether the operator should hear about this error.
    pub fn is_unexpected(&self) -> bool {
        match self {
            AppError::Config(_) => true,
            AppError::Messenger(e) => !e.is_expected(),
            AppError::Pagination(e) => e.is_unexpected(),
        }
    }
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;
