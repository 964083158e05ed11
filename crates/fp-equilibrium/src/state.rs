//! Equilibrium state and derived fluxes.

use fp_core::{Real, guarded_div};
use fp_model::RateConstants;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Positional index of each state component.
pub mod idx {
    pub const TOTAL_BIOMASS: usize = 0;
    pub const RIBOSOMAL_BIOMASS: usize = 1;
    pub const METABOLIC_BIOMASS: usize = 2;
    pub const UNCHARGED_TAA: usize = 3;
    pub const CHARGED_TAA: usize = 4;
    /// Only present in dynamic-allocation model states.
    pub const ALLOCATION: usize = 5;
}

/// Metabolic and translational fluxes per unit biomass [hr⁻¹].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxBalance {
    /// Charging flux `ν M_Mb / M`
    pub metabolic: Real,
    /// Consumption flux `γ M_Rb / M`
    pub translational: Real,
}

/// Converged state of the flux-parity model.
///
/// Biomass entries are normalized so that `total_biomass == 1`. Positional
/// access through [`as_array`](Self::as_array) or indexing follows the order
/// `(total, ribosomal, metabolic, uncharged, charged)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumState {
    pub total_biomass: Real,
    pub ribosomal_biomass: Real,
    pub metabolic_biomass: Real,
    pub uncharged_taa: Real,
    pub charged_taa: Real,
    /// Ribosomal allocation in force at equilibrium
    pub phi_rb: Real,
    /// Rounds used
    pub iterations: usize,
    /// Scaled residual at exit
    pub residual: Real,
}

impl EquilibriumState {
    pub fn as_array(&self) -> [Real; 5] {
        [
            self.total_biomass,
            self.ribosomal_biomass,
            self.metabolic_biomass,
            self.uncharged_taa,
            self.charged_taa,
        ]
    }

    pub fn ribosomal_fraction(&self) -> Real {
        guarded_div(self.ribosomal_biomass, self.total_biomass)
    }

    pub fn metabolic_fraction(&self) -> Real {
        guarded_div(self.metabolic_biomass, self.total_biomass)
    }

    /// Charged over uncharged transfer molecules, `T*/T`.
    pub fn charging_balance(&self) -> Real {
        guarded_div(self.charged_taa, self.uncharged_taa)
    }

    /// Realized translation rate γ [hr⁻¹].
    pub fn translation_rate(&self, c: &RateConstants) -> Real {
        c.translation_rate(self.charged_taa)
    }

    /// Realized metabolic rate ν [hr⁻¹].
    pub fn metabolic_rate(&self, c: &RateConstants) -> Real {
        c.metabolic_rate(self.uncharged_taa)
    }

    /// Growth rate λ = γ M_Rb / M [hr⁻¹].
    pub fn growth_rate(&self, c: &RateConstants) -> Real {
        self.translation_rate(c) * self.ribosomal_fraction()
    }

    pub fn fluxes(&self, c: &RateConstants) -> FluxBalance {
        FluxBalance {
            metabolic: self.metabolic_rate(c) * self.metabolic_fraction(),
            translational: self.growth_rate(c),
        }
    }
}

impl Index<usize> for EquilibriumState {
    type Output = Real;

    fn index(&self, i: usize) -> &Real {
        match i {
            idx::TOTAL_BIOMASS => &self.total_biomass,
            idx::RIBOSOMAL_BIOMASS => &self.ribosomal_biomass,
            idx::METABOLIC_BIOMASS => &self.metabolic_biomass,
            idx::UNCHARGED_TAA => &self.uncharged_taa,
            idx::CHARGED_TAA => &self.charged_taa,
            _ => panic!("EquilibriumState index {} out of range 0..5", i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EquilibriumState {
        EquilibriumState {
            total_biomass: 1.0,
            ribosomal_biomass: 0.2,
            metabolic_biomass: 0.25,
            uncharged_taa: 1e-3,
            charged_taa: 4e-5,
            phi_rb: 0.2,
            iterations: 2,
            residual: 1e-7,
        }
    }

    #[test]
    fn positional_access_matches_fields() {
        let s = sample();
        let a = s.as_array();
        for (i, v) in a.iter().enumerate() {
            assert_eq!(s[i], *v);
        }
        assert_eq!(s[4], s.charged_taa);
    }

    #[test]
    #[should_panic]
    fn index_out_of_range_panics() {
        let _ = sample()[5];
    }

    #[test]
    fn derived_quantities() {
        let c = RateConstants::default();
        let s = sample();
        assert!((s.charging_balance() - 0.04).abs() < 1e-12);
        let gamma = s.translation_rate(&c);
        assert!(gamma > 0.0 && gamma < c.gamma_max);
        assert!((s.growth_rate(&c) - 0.2 * gamma).abs() < 1e-12);
        let f = s.fluxes(&c);
        assert_eq!(f.translational, s.growth_rate(&c));
        assert!(f.metabolic > 0.0);
    }
}
