//! Error types for execlock.
//!
//! Uses thiserror for derive macros. Every variant carries a human-readable
//! message and maps to a process exit code.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for lock operations.
#[derive(Error, Debug)]
pub enum LockError {
    /// Input rejected before the backend was touched (empty namespace or
    /// workflow ID, zero TTL).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Missing or invalid configuration/credentials.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failure, command timeout, or authentication failure.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Any other backend failure (unexpected reply, protocol error).
    #[error("Backend error: {0}")]
    Backend(String),

    /// The result could not be written out.
    #[error("Output error: {0}")]
    Output(String),
}

impl LockError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LockError::Validation(_) => exit_codes::VALIDATION_FAILURE,
            LockError::Config(_) | LockError::Output(_) => exit_codes::USER_ERROR,
            LockError::BackendUnavailable(_) | LockError::Backend(_) => {
                exit_codes::BACKEND_FAILURE
            }
        }
    }
}

/// Result type alias for lock operations.
pub type Result<T> = std::result::Result<T, LockError>;
