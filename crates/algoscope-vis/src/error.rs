//! Error types for algoscope-vis.

use thiserror::Error;

/// Result type for algoscope-vis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or driving playback.
#[derive(Debug, Error)]
pub enum Error {
    /// Custom input contained no parsable integers
    #[error("no integers found in input: {0:?}")]
    NoIntegers(String),

    /// An environment variable held a value that could not be used
    #[error("invalid value for {key}: {value:?}")]
    Config { key: &'static str, value: String },

    /// Algorithm selection error
    #[error(transparent)]
    Steps(#[from] algoscope_steps::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
