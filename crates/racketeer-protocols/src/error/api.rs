//! Remote game API errors.

use thiserror::Error;

/// Failure reported by the remote API gateway.
///
/// Transport failures (`Network`, `Decode`) and business failures
/// (`Status`, `Rejected`) are both surfaced as values; nothing is raised
/// past the gateway boundary.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Rejected(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}
