//! Error types for the simulated speed test

use thiserror::Error;

/// Speed test error types
#[derive(Error, Debug)]
pub enum SpeedSimError {
    /// Requested buffer size cannot be measured
    #[error("Invalid buffer size: {size} bytes")]
    InvalidSize { size: usize },

    /// Buffer allocation failed
    #[error("Failed to allocate {requested} bytes: {reason}")]
    Allocation { requested: usize, reason: String },

    /// The routine returned an error record to its host
    #[error("Speed-test execution failed: {message}")]
    Execution {
        message: String,
        debug_logs: Vec<String>,
    },

    /// The host/routine boundary closed before a result arrived
    #[error("Transfer error: {0}")]
    Transfer(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, SpeedSimError>;

impl SpeedSimError {
    /// Diagnostic lines carried by the error, if any
    pub fn debug_logs(&self) -> &[String] {
        match self {
            SpeedSimError::Execution { debug_logs, .. } => debug_logs,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for SpeedSimError {
    fn from(err: serde_json::Error) -> Self {
        SpeedSimError::Serialization(err.to_string())
    }
}
