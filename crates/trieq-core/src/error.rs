//! Error types for TriEq
//!
//! Only setup and configuration can fail. Audio processing has no error path.

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum EqError {
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    #[error("Invalid block size: {0}")]
    InvalidBlockSize(usize),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias
pub type EqResult<T> = Result<T, EqError>;

/// Check a sample rate handed over at prepare time
pub fn validate_sample_rate(sample_rate: f64) -> EqResult<f64> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate)
    } else {
        Err(EqError::InvalidSampleRate(sample_rate))
    }
}
