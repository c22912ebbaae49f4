// error.rs - error types for speech-bridge

use thiserror::Error;

/// Errors returned by platform backends and configuration.
///
/// None of these reach the host as events; the adapter logs and drops them.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Unsupported: {0}")]
    Unsupported(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lock poisoned: {0}")]
    Lock(&'static str),
}
