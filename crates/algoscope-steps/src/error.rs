//! Error types for algoscope-steps.

use thiserror::Error;

/// Result type for algoscope-steps operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when selecting an algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The identifier does not name one of the known algorithms.
    #[error("unknown algorithm: {0:?}")]
    UnknownAlgorithm(String),
}
