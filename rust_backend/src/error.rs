//! Crate-level error types.

use crate::ephemeris::EphemerisError;

/// Result type for calculator operations
pub type Result<T> = std::result::Result<T, RetrogradeError>;

/// Error type for calculator operations
#[derive(Debug, thiserror::Error)]
pub enum RetrogradeError {
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),

    #[error("Invalid samples: {0}")]
    InvalidSamples(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RetrogradeError {
    /// Whether the underlying cause is a pair missing from the ephemeris.
    pub fn is_body_not_found(&self) -> bool {
        matches!(self, RetrogradeError::Ephemeris(e) if e.is_body_not_found())
    }
}
