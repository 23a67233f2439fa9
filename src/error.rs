use crate::parameters::bounds::BoundsError;
use thiserror::Error;

/// Error types for the distr-family library.
#[derive(Error, Debug)]
pub enum DistrError {
    /// A parameter mapping did not contain a requested name.
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// A distribution rejected a parameter value.
    #[error("Invalid parameter value: {0}")]
    InvalidParameter(String),

    /// Invalid input data or combinator arguments.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error indicating a mismatch in vector lengths.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Error for invalid bounds.
    #[error("Bounds error: {0}")]
    Bounds(#[from] BoundsError),

    /// Error raised by the minimizer backend.
    #[error("Optimization failed: {0}")]
    OptimizationFailure(String),

    /// Error during numerical computation.
    #[error("Computation error: {0}")]
    Computation(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for cases that don't fit the other categories.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for distr-family operations.
pub type Result<T> = std::result::Result<T, DistrError>;

/// Extensions for converting from other error types.
impl From<String> for DistrError {
    fn from(s: String) -> Self {
        DistrError::Other(s)
    }
}

impl From<&str> for DistrError {
    fn from(s: &str) -> Self {
        DistrError::Other(s.to_string())
    }
}

impl From<statrs::StatsError> for DistrError {
    fn from(err: statrs::StatsError) -> Self {
        DistrError::InvalidParameter(err.to_string())
    }
}
