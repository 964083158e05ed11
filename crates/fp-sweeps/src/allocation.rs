//! Fixed-allocation ("tent") sweeps of metabolic and translational flux.

use crate::executor::{SweepOutcome, run_points};
use fp_core::Real;
use fp_equilibrium::{
    AllocationPolicy, EquilibrationOptions, EquilibriumConfig, EquilibriumResult, equilibrate_fpm,
};
use fp_model::{RateConstants, phi_rb_optimal_allocation, steady_state_growth_rate};
use serde::{Deserialize, Serialize};

/// Starting allocation for the regulated (flux-parity) reference point.
pub const FLUX_PARITY_START: Real = 0.1;

/// Equilibrium fluxes and pools at one fixed allocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TentPoint {
    /// `ν M_Mb / M` [hr⁻¹]
    pub metabolic_flux: Real,
    /// `γ M_Rb / M` [hr⁻¹]
    pub translational_flux: Real,
    pub uncharged_taa: Real,
    pub charged_taa: Real,
    /// `T*/T`
    pub balance: Real,
}

/// Tent diagram data: fluxes over `phi_rb` plus the reference allocations.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationSweep {
    pub outcome: SweepOutcome<TentPoint>,
    /// Allocation reached under regulation, if that equilibration succeeded
    pub flux_parity_phi_rb: Option<Real>,
    /// Growth-optimal allocation of the precursor model
    pub optimal_phi_rb: Real,
    /// Growth rate at the optimal allocation, for normalizing fluxes
    pub optimal_growth_rate: Real,
}

impl AllocationSweep {
    pub fn phi_rb(&self) -> &[Real] {
        &self.outcome.values
    }

    /// Metabolic flux relative to the optimal growth rate.
    pub fn relative_metabolic_flux(&self) -> Vec<Option<Real>> {
        let lam = self.optimal_growth_rate;
        self.outcome.map(|p| p.metabolic_flux / lam)
    }

    /// Translational flux relative to the optimal growth rate.
    pub fn relative_translational_flux(&self) -> Vec<Option<Real>> {
        let lam = self.optimal_growth_rate;
        self.outcome.map(|p| p.translational_flux / lam)
    }
}

fn tent_point(
    constants: &RateConstants,
    phi_rb: Real,
    options: &EquilibrationOptions,
) -> EquilibriumResult<TentPoint> {
    let cfg = EquilibriumConfig::new(*constants, AllocationPolicy::fixed(phi_rb));
    let state = equilibrate_fpm(&cfg, options)?;
    let fluxes = state.fluxes(constants);
    Ok(TentPoint {
        metabolic_flux: fluxes.metabolic,
        translational_flux: fluxes.translational,
        uncharged_taa: state.uncharged_taa,
        charged_taa: state.charged_taa,
        balance: state.charging_balance(),
    })
}

/// Equilibrate at each fixed `phi_rb`, and once under regulation.
pub fn sweep_allocation(
    constants: &RateConstants,
    phi_values: &[Real],
    options: &EquilibrationOptions,
) -> AllocationSweep {
    let outcome = run_points(phi_values, |phi| tent_point(constants, phi, options));

    let regulated = EquilibriumConfig::new(*constants, AllocationPolicy::dynamic(FLUX_PARITY_START));
    let flux_parity_phi_rb = equilibrate_fpm(&regulated, options)
        .ok()
        .map(|s| s.ribosomal_fraction());

    let c = constants;
    let optimal_phi_rb = phi_rb_optimal_allocation(c.gamma_max, c.nu_max, c.kd_cpc, c.phi_o);
    AllocationSweep {
        outcome,
        flux_parity_phi_rb,
        optimal_phi_rb,
        optimal_growth_rate: steady_state_growth_rate(
            c.gamma_max,
            optimal_phi_rb,
            c.nu_max,
            c.kd_cpc,
            c.phi_o,
        ),
    }
}
