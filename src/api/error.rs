//! Errors surfaced by workshop store implementations.

use thiserror::Error;

/// Errors that can occur when talking to the workshop catalog.
///
/// The session controller treats every variant the same way (the attempted
/// mutation did not happen, prior state is kept); the variants exist so the
/// presentation layer can word its messages.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The service rejected the submitted fields (HTTP 400)
    #[error("the catalog rejected the request: {0}")]
    Validation(String),

    /// The addressed workshop does not exist (HTTP 404)
    #[error("workshop not found: {0}")]
    NotFound(String),

    /// Any other non-success HTTP status
    #[error("catalog returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded
    #[error("could not decode catalog response: {0}")]
    Decode(String),

    /// The store refused the call outright (used by the in-memory store's
    /// failure switch)
    #[error("catalog unavailable")]
    Unavailable,
}

impl StoreError {
    /// Check whether the service rejected the submitted fields
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}
