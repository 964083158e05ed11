//! Equilibration errors.

use fp_model::ModelError;
use fp_sim::SimError;
use thiserror::Error;

pub type EquilibriumResult<T> = Result<T, EquilibriumError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EquilibriumError {
    /// Rate constants or allocation outside their domain.
    #[error(transparent)]
    InvalidParameters(#[from] ModelError),

    #[error("Invalid options: {what}")]
    InvalidOptions { what: &'static str },

    /// Rounds exhausted before the residual met the tolerance.
    #[error("No convergence after {iterations} rounds (residual {residual:e})")]
    ConvergenceFailure { iterations: usize, residual: f64 },

    /// Integration produced a negative or non-finite state.
    #[error("Non-physical state: {what}")]
    NonPhysical { what: String },

    #[error("Integration failed: {0}")]
    Integration(#[from] SimError),
}

impl EquilibriumError {
    /// Whether retrying with more rounds could help.
    pub fn is_convergence_failure(&self) -> bool {
        matches!(self, EquilibriumError::ConvergenceFailure { .. })
    }
}
