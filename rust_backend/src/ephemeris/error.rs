//! Error types for ephemeris access.

use crate::core::domain::ObservationPair;

/// Result type for ephemeris operations
pub type EphemerisResult<T> = Result<T, EphemerisError>;

/// Error type for ephemeris operations
#[derive(Debug, thiserror::Error)]
pub enum EphemerisError {
    #[error("{pair} not available in ephemeris '{provider}'")]
    BodyNotFound {
        provider: String,
        pair: ObservationPair,
    },

    #[error("No sample at JD {jd} for {pair} in ephemeris '{provider}'")]
    MissingSample {
        provider: String,
        pair: ObservationPair,
        jd: f64,
    },

    #[error("Requested range {start_jd}..{end_jd} is outside ephemeris '{provider}'")]
    UnsupportedRange {
        provider: String,
        start_jd: f64,
        end_jd: f64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ephemeris table parse error: {0}")]
    Parse(String),
}

impl EphemerisError {
    /// Whether the error means the pair is simply absent from the source.
    pub fn is_body_not_found(&self) -> bool {
        matches!(self, EphemerisError::BodyNotFound { .. })
    }
}
