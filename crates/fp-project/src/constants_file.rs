//! Rate-constant files.

use crate::validate::ValidationError;
use crate::{FileFormat, ProjectResult};
use fp_core::Real;
use fp_core::units::constants::{RIBOSOME_MASS_AA, TRANSLATION_SPEED_AA_PER_S};
use fp_model::{RateConstants, gamma_max_from_translation_speed};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Partial override of [`RateConstants`].
///
/// Absent fields keep the reference value. `gamma_max` may instead be derived
/// from an elongation speed and a ribosome mass; giving both forms is an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstantsFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamma_max: Option<Real>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nu_max: Option<Real>,
    #[serde(alias = "Kd_cpc", skip_serializing_if = "Option::is_none")]
    pub kd_cpc: Option<Real>,
    #[serde(alias = "Kd_TAA", skip_serializing_if = "Option::is_none")]
    pub kd_taa: Option<Real>,
    #[serde(alias = "Kd_TAA_star", skip_serializing_if = "Option::is_none")]
    pub kd_taa_star: Option<Real>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tau: Option<Real>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kappa_max: Option<Real>,
    #[serde(alias = "phi_O", skip_serializing_if = "Option::is_none")]
    pub phi_o: Option<Real>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charging_threshold: Option<Real>,
    /// Peptide elongation speed [AA/s]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_speed_aa_per_s: Option<Real>,
    /// Proteinaceous ribosome mass [AA]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ribosome_mass_aa: Option<Real>,
}

impl ConstantsFile {
    /// Overlay the overrides on the reference constants and validate.
    pub fn resolve(&self) -> Result<RateConstants, ValidationError> {
        let base = RateConstants::default();
        let derived = self.translation_speed_aa_per_s.is_some() || self.ribosome_mass_aa.is_some();
        let gamma_max = match (self.gamma_max, derived) {
            (Some(_), true) => {
                return Err(ValidationError::InvalidValue {
                    field: "gamma_max".to_string(),
                    reason: "given both directly and via translation speed".to_string(),
                });
            }
            (Some(g), false) => g,
            (None, true) => gamma_max_from_translation_speed(
                self.translation_speed_aa_per_s
                    .unwrap_or(TRANSLATION_SPEED_AA_PER_S),
                self.ribosome_mass_aa.unwrap_or(RIBOSOME_MASS_AA),
            ),
            (None, false) => base.gamma_max,
        };

        let constants = RateConstants {
            gamma_max,
            nu_max: self.nu_max.unwrap_or(base.nu_max),
            kd_cpc: self.kd_cpc.unwrap_or(base.kd_cpc),
            kd_taa: self.kd_taa.unwrap_or(base.kd_taa),
            kd_taa_star: self.kd_taa_star.unwrap_or(base.kd_taa_star),
            tau: self.tau.unwrap_or(base.tau),
            kappa_max: self.kappa_max.unwrap_or(base.kappa_max),
            phi_o: self.phi_o.unwrap_or(base.phi_o),
            charging_threshold: self.charging_threshold.unwrap_or(base.charging_threshold),
        };
        constants.validate()?;
        Ok(constants)
    }

    /// Every field written out explicitly.
    pub fn from_constants(c: &RateConstants) -> Self {
        ConstantsFile {
            gamma_max: Some(c.gamma_max),
            nu_max: Some(c.nu_max),
            kd_cpc: Some(c.kd_cpc),
            kd_taa: Some(c.kd_taa),
            kd_taa_star: Some(c.kd_taa_star),
            tau: Some(c.tau),
            kappa_max: Some(c.kappa_max),
            phi_o: Some(c.phi_o),
            charging_threshold: Some(c.charging_threshold),
            translation_speed_aa_per_s: None,
            ribosome_mass_aa: None,
        }
    }
}

/// Read a YAML or JSON constants file and resolve it.
pub fn load_constants(path: &Path) -> ProjectResult<RateConstants> {
    let content = std::fs::read_to_string(path)?;
    let file: ConstantsFile = match FileFormat::from_path(path)? {
        FileFormat::Yaml => serde_yaml::from_str(&content)?,
        FileFormat::Json => serde_json::from_str(&content)?,
    };
    Ok(file.resolve()?)
}
