//! Error types for ragwire-vector.

use thiserror::Error;

/// Result type for ragwire-vector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ragwire-vector operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Dimension mismatch between vector and collection.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions.
        expected: usize,
        /// Actual dimensions provided.
        actual: usize,
    },

    /// Invalid vector (empty, NaN or infinite components).
    #[error("Invalid vector: {0}")]
    InvalidVector(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}
