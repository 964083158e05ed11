//! Error types for solver operations.

use fp_core::FpError;
use thiserror::Error;

/// Errors that can occur during a nonlinear solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Invalid state: {what}")]
    InvalidState { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Core error: {0}")]
    Core(#[from] FpError),
}

pub type SolverResult<T> = Result<T, SolverError>;
