//! Error types for simulation operations.

use fp_solver::SolverError;
use thiserror::Error;

/// Errors encountered during transient simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: String },

    /// A step failed in a way a smaller step may avoid.
    #[error("Retryable step failure: {message}")]
    Retryable { message: String },

    #[error("Step cutback exhausted at t = {t}: dt = {dt} ({cause})")]
    CutbackExhausted { t: f64, dt: f64, cause: String },

    #[error("Implicit solve failed: {0}")]
    Solver(#[from] SolverError),
}

impl SimError {
    /// Whether `run_sim` should retry the step with a smaller `dt`.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SimError::Retryable { .. } | SimError::Solver(_))
    }
}

pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solver_failures_are_retryable() {
        let e: SimError = SolverError::ConvergenceFailed {
            what: "stalled".to_string(),
        }
        .into();
        assert!(e.is_retryable());
        assert!(!SimError::InvalidArg { what: "dt" }.is_retryable());
        assert!(
            !SimError::NonPhysical {
                what: "negative pool".to_string()
            }
            .is_retryable()
        );
    }
}
