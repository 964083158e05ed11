//! Physiological rate constants shared by every model calculation.

use crate::error::ModelResult;
use crate::kinetics::michaelis_menten;
use fp_core::units::{constants, translation_rate_per_hour};
use fp_core::{
    FpError, Real, Tolerances, ensure_finite, ensure_in_range, ensure_positive, nearly_equal,
};
use serde::{Deserialize, Serialize};

/// Rate constants for the allocation and flux-parity models.
///
/// Rates are per hour; concentrations are abundances relative to total
/// biomass. Loaded once per run and passed by reference afterwards.
///
/// Serde accepts the column names of the reference constants table
/// (`Kd_cpc`, `Kd_TAA`, `phi_O`, ...) as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateConstants {
    /// Maximum translation rate [hr⁻¹]
    pub gamma_max: Real,
    /// Maximum metabolic (nutrient uptake and charging) rate [hr⁻¹]
    pub nu_max: Real,
    /// Precursor half-saturation constant
    #[serde(alias = "Kd_cpc")]
    pub kd_cpc: Real,
    /// Uncharged transfer-molecule half-saturation constant
    #[serde(alias = "Kd_TAA")]
    pub kd_taa: Real,
    /// Charged transfer-molecule half-saturation constant
    #[serde(alias = "Kd_TAA_star")]
    pub kd_taa_star: Real,
    /// Allocation response time constant [hr]
    pub tau: Real,
    /// Transfer-molecule synthesis rate [abundance hr⁻¹]
    pub kappa_max: Real,
    /// Allocation towards "other" proteins
    #[serde(alias = "phi_O")]
    pub phi_o: Real,
    /// Charged/uncharged ratio at which the allocation sensor is half-maximal
    #[serde(default = "default_charging_threshold")]
    pub charging_threshold: Real,
}

fn default_charging_threshold() -> Real {
    1.0
}

/// Maximum translation rate [hr⁻¹] from an elongation speed [AA/s] and the
/// ribosome's proteinaceous mass [AA].
pub fn gamma_max_from_translation_speed(speed_aa_per_s: Real, ribosome_mass_aa: Real) -> Real {
    translation_rate_per_hour(speed_aa_per_s, ribosome_mass_aa)
}

impl Default for RateConstants {
    /// The reference parameter set used throughout the figures.
    fn default() -> Self {
        Self {
            gamma_max: gamma_max_from_translation_speed(
                constants::TRANSLATION_SPEED_AA_PER_S,
                constants::RIBOSOME_MASS_AA,
            ),
            nu_max: 4.5,
            kd_cpc: 0.03,
            kd_taa: 3e-5,
            kd_taa_star: 3e-5,
            tau: 1.0,
            kappa_max: 64.0 * 5.0 * 3600.0 / 1e9,
            phi_o: 0.55,
            charging_threshold: default_charging_threshold(),
        }
    }
}

impl RateConstants {
    /// Check every constant against its physiological domain.
    pub fn validate(&self) -> ModelResult<()> {
        ensure_positive(self.gamma_max, "gamma_max")?;
        ensure_positive(self.nu_max, "nu_max")?;
        ensure_positive(self.kd_cpc, "kd_cpc")?;
        ensure_positive(self.kd_taa, "kd_taa")?;
        ensure_positive(self.kd_taa_star, "kd_taa_star")?;
        ensure_positive(self.tau, "tau")?;
        ensure_positive(self.kappa_max, "kappa_max")?;
        ensure_positive(self.charging_threshold, "charging_threshold")?;
        ensure_in_range(self.phi_o, 0.0, 1.0, "phi_o", "[0, 1)")?;
        if self.phi_o >= 1.0 {
            return Err(FpError::OutOfRange {
                what: "phi_o",
                value: self.phi_o,
                range: "[0, 1)",
            }
            .into());
        }
        Ok(())
    }

    /// Check that `phi_rb` is an admissible ribosomal allocation.
    ///
    /// The upper bound `1 - phi_o` is matched within rounding, so `0.45` is
    /// accepted for `phi_o = 0.55`; such values come back clamped to
    /// [`max_allocation`](Self::max_allocation).
    pub fn validate_allocation(&self, phi_rb: Real) -> ModelResult<Real> {
        let upper = self.max_allocation();
        let phi_rb = ensure_finite(phi_rb, "phi_rb")?;
        if phi_rb > upper && nearly_equal(phi_rb, upper, Tolerances::default()) {
            return Ok(upper);
        }
        Ok(ensure_in_range(phi_rb, 0.0, upper, "phi_rb", "[0, 1 - phi_o]")?)
    }

    /// Largest allocation available to ribosomes and metabolism combined.
    #[inline]
    pub fn max_allocation(&self) -> Real {
        1.0 - self.phi_o
    }

    /// Realized translation rate for a charged pool `charged`.
    #[inline]
    pub fn translation_rate(&self, charged: Real) -> Real {
        michaelis_menten(self.gamma_max, charged, self.kd_taa_star)
    }

    /// Realized metabolic rate for an uncharged pool `uncharged`.
    #[inline]
    pub fn metabolic_rate(&self, uncharged: Real) -> Real {
        michaelis_menten(self.nu_max, uncharged, self.kd_taa)
    }

    pub fn with_nu_max(self, nu_max: Real) -> Self {
        Self { nu_max, ..self }
    }

    pub fn with_tau(self, tau: Real) -> Self {
        Self { tau, ..self }
    }

    pub fn with_kappa_max(self, kappa_max: Real) -> Self {
        Self { kappa_max, ..self }
    }

    pub fn with_phi_o(self, phi_o: Real) -> Self {
        Self { phi_o, ..self }
    }

    pub fn with_charging_threshold(self, charging_threshold: Real) -> Self {
        Self {
            charging_threshold,
            ..self
        }
    }
}
