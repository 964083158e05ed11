//! Run configuration validation.

use crate::config::RunConfig;
use fp_equilibrium::EquilibriumError;
use fp_model::ModelError;
use fp_sweeps::SweepError;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} ({reason})")]
    InvalidValue { field: String, reason: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Equilibrium(#[from] EquilibriumError),

    #[error(transparent)]
    Sweep(#[from] SweepError),
}

pub fn validate_run_config(config: &RunConfig) -> Result<(), ValidationError> {
    let constants = config.constants.resolve()?;
    config.policy.validate(&constants)?;
    config.options.validate()?;

    let Some(sweeps) = &config.sweeps else {
        return Ok(());
    };
    for (name, def) in [
        ("sweeps.nu_max", &sweeps.nu_max),
        ("sweeps.allocation", &sweeps.allocation),
        ("sweeps.tau", &sweeps.tau),
        ("sweeps.kappa_max", &sweeps.kappa_max),
    ] {
        let Some(def) = def else { continue };
        def.validate().map_err(|e| ValidationError::InvalidValue {
            field: name.to_string(),
            reason: e.to_string(),
        })?;
        if def.start <= 0.0 || def.end <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: name.to_string(),
                reason: "bounds must be positive".to_string(),
            });
        }
    }

    if let Some(def) = &sweeps.allocation {
        let upper = constants.max_allocation();
        if def.start.max(def.end) > upper {
            return Err(ValidationError::InvalidValue {
                field: "sweeps.allocation".to_string(),
                reason: format!("allocation exceeds 1 - phi_o = {upper}"),
            });
        }
    }

    if sweeps.tau.is_some() != sweeps.kappa_max.is_some() {
        return Err(ValidationError::InvalidValue {
            field: "sweeps".to_string(),
            reason: "tau and kappa_max sweeps must be given together".to_string(),
        });
    }
    Ok(())
}
