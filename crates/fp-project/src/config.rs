//! Run configuration file.

use crate::constants_file::ConstantsFile;
use crate::validate::ValidationError;
use fp_equilibrium::{AllocationPolicy, EquilibrationOptions, EquilibriumConfig};
use fp_sweeps::SweepDefinition;
use serde::{Deserialize, Serialize};

/// Optional sweep ranges; each is run by the matching CLI subcommand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nu_max: Option<SweepDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation: Option<SweepDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tau: Option<SweepDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kappa_max: Option<SweepDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub constants: ConstantsFile,
    pub policy: AllocationPolicy,
    #[serde(default)]
    pub options: EquilibrationOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweeps: Option<SweepsConfig>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            constants: ConstantsFile::default(),
            policy: AllocationPolicy::dynamic(fp_sweeps::allocation::FLUX_PARITY_START),
            options: EquilibrationOptions::default(),
            sweeps: None,
        }
    }
}

impl RunConfig {
    /// Resolved constants paired with the policy.
    pub fn equilibrium_config(&self) -> Result<EquilibriumConfig, ValidationError> {
        let constants = self.constants.resolve()?;
        Ok(EquilibriumConfig::new(constants, self.policy))
    }
}
