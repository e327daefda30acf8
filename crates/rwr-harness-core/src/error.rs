//! Error types for the harness

use thiserror::Error;

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Harness error types
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Test package staging failed
    #[error("Staging error: {0}")]
    Staging(String),

    /// Server process could not be launched or handed over
    #[error("Launch error: {0}")]
    Launch(String),

    /// Console stream I/O failed
    #[error("Console error: {0}")]
    Console(String),

    /// The server console violated the expected line protocol
    #[error("Protocol error: {0}")]
    Protocol(String),
}
