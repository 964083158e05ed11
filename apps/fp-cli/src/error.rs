//! Error type for the command-line front end.

use fp_equilibrium::EquilibriumError;
use fp_model::ModelError;
use fp_project::{ProjectError, ValidationError};
use fp_sweeps::SweepError;

pub type AppResult<T> = Result<T, AppError>;

/// Failure of a CLI command, wrapping the library crate that raised it.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Equilibration failed: {0}")]
    Equilibrium(#[from] EquilibriumError),

    #[error("Sweep error: {0}")]
    Sweep(#[from] SweepError),

    #[error("Failed to write output: {path}")]
    OutputWrite {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to render output: {0}")]
    Render(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
