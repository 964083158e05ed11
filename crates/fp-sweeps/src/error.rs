//! Sweep errors.

use fp_core::Real;
use thiserror::Error;

pub type SweepResult<T> = Result<T, SweepError>;

/// Error in sweep configuration or grid assembly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SweepError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("No sweep rows with nu_max = {nu_max}")]
    NoRows { nu_max: Real },

    #[error("Grid cell missing for tau = {tau}, kappa_max = {kappa_max}")]
    MissingCell { tau: Real, kappa_max: Real },

    #[error("Grid cell duplicated for tau = {tau}, kappa_max = {kappa_max}")]
    DuplicateCell { tau: Real, kappa_max: Real },
}
