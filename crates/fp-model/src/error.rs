//! Model errors.

use fp_core::FpError;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while checking model inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A rate constant or allocation outside its physiological domain.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(#[from] FpError),
}
