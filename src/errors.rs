use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the intake engine and its collaborators.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Payment gateway error: {0}")]
    Gateway(String),
    #[error("Lead sink error: {0}")]
    Sink(String),
    #[error("Unknown service goal: {0}")]
    UnknownGoal(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = StdResult<T, IntakeError>;
