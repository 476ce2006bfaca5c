//! Backend errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from backend: {0}")]
    UnexpectedResponse(String),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("failed to decode backend response: {0}")]
    Decode(String),

    #[error("backend connection closed")]
    Closed,
}
