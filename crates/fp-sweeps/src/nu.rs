//! Equilibrium allocation across nutrient qualities.

use crate::executor::{SweepOutcome, run_points};
use fp_core::Real;
use fp_equilibrium::{
    AllocationPolicy, EquilibrationOptions, EquilibriumConfig, EquilibriumState, equilibrate_fpm,
};
use fp_model::{RateConstants, optimal_allocation_over_nu};

/// Flux-parity allocation against the closed-form optimum over `nu_max`.
#[derive(Debug, Clone, PartialEq)]
pub struct NuMaxSweep {
    pub outcome: SweepOutcome<EquilibriumState>,
    /// Growth-optimal allocation at each `nu_max`
    pub optimal_phi_rb: Vec<Real>,
}

impl NuMaxSweep {
    pub fn nu_max(&self) -> &[Real] {
        &self.outcome.values
    }

    /// Equilibrium ribosomal allocation at each `nu_max`.
    pub fn phi_rb(&self) -> Vec<Option<Real>> {
        self.outcome.map(|s| s.ribosomal_fraction())
    }

    /// Equilibrium minus optimal allocation.
    pub fn difference(&self) -> Vec<Option<Real>> {
        self.phi_rb()
            .into_iter()
            .zip(&self.optimal_phi_rb)
            .map(|(phi, opt)| phi.map(|p| p - opt))
            .collect()
    }
}

/// Equilibrate once per `nu_max` value with everything else held fixed.
pub fn sweep_nu_max(
    constants: &RateConstants,
    policy: AllocationPolicy,
    nu_values: &[Real],
    options: &EquilibrationOptions,
) -> NuMaxSweep {
    let outcome = run_points(nu_values, |nu| {
        let cfg = EquilibriumConfig::new(constants.with_nu_max(nu), policy);
        equilibrate_fpm(&cfg, options)
    });
    NuMaxSweep {
        optimal_phi_rb: optimal_allocation_over_nu(constants, nu_values),
        outcome,
    }
}
