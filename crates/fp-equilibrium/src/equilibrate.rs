//! Round-based equilibration of the flux-parity model.

use crate::error::{EquilibriumError, EquilibriumResult};
use crate::model::FluxParityModel;
use crate::options::{EquilibrationOptions, EquilibrationStrategy};
use crate::policy::AllocationPolicy;
use crate::state::{EquilibriumState, idx};
use fp_core::Real;
use fp_model::RateConstants;
use fp_sim::{SimOptions, run_sim};
use fp_solver::{
    NewtonConfig, Positivity, SolverResult, finite_difference_jacobian_with_floor, newton_solve,
};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, info, warn};

/// What to equilibrate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumConfig {
    pub constants: RateConstants,
    pub policy: AllocationPolicy,
}

impl EquilibriumConfig {
    pub fn new(constants: RateConstants, policy: AllocationPolicy) -> Self {
        Self { constants, policy }
    }

    pub fn validate(&self) -> EquilibriumResult<()> {
        self.constants.validate()?;
        self.policy.validate(&self.constants)?;
        Ok(())
    }
}

/// Integrate the flux-parity model to its self-consistent steady state.
///
/// Each round integrates `options.horizon` hours from the previous round's
/// end state, rescales biomass to unit total and measures the scaled
/// intensive residual. The first round whose residual falls below
/// `options.tolerance` is returned. Deterministic: identical inputs give
/// bit-identical states.
///
/// # Errors
///
/// - [`EquilibriumError::InvalidParameters`] before any integration if the
///   constants or allocation are out of domain
/// - [`EquilibriumError::ConvergenceFailure`] once `max_iter` rounds are spent
/// - [`EquilibriumError::NonPhysical`] if a round ends negative or non-finite
/// - [`EquilibriumError::Integration`] if a step fails even after cutback
pub fn equilibrate_fpm(
    config: &EquilibriumConfig,
    options: &EquilibrationOptions,
) -> EquilibriumResult<EquilibriumState> {
    config.validate()?;
    options.validate()?;

    let _span = debug_span!("equilibrate_fpm", policy = ?config.policy).entered();

    let mut model = FluxParityModel::new(
        config.constants,
        config.policy,
        options.initial_uncharged,
        options.initial_charged,
    );
    let sim_options = round_options(options);

    let mut residual = Real::INFINITY;
    for round in 1..=options.max_iter {
        let record = run_sim(&mut model, &sim_options)?;
        let end = record
            .last()
            .ok_or_else(|| EquilibriumError::NonPhysical {
                what: "integration produced no state".to_string(),
            })?;
        let mut x = model.normalize(end);
        check_physical(&x)?;
        residual = model.scaled_residual(&x);

        if options.strategy == EquilibrationStrategy::Newton && residual >= options.tolerance {
            if let Some(polished) = polish(&model, &x) {
                let polished_residual = model.scaled_residual(&polished);
                debug!(round, residual, polished_residual, "newton polish");
                if polished_residual < residual {
                    x = polished;
                    residual = polished_residual;
                }
            }
        }

        let phi_rb = model.phi_rb(&x);
        debug!(round, residual, phi_rb, "equilibration round");

        if residual < options.tolerance {
            info!(rounds = round, residual, phi_rb, "flux-parity equilibrium reached");
            return Ok(to_state(&x, phi_rb, round, residual));
        }
        model.restart_from(x);
    }

    warn!(
        rounds = options.max_iter,
        residual, "equilibration did not converge"
    );
    Err(EquilibriumError::ConvergenceFailure {
        iterations: options.max_iter,
        residual,
    })
}

fn round_options(options: &EquilibrationOptions) -> SimOptions {
    SimOptions {
        dt: options.dt,
        t_end: options.horizon,
        max_steps: 1_000_000,
        // Only the end state of a round is used
        record_every: usize::MAX,
        integrator: options.integrator,
        min_dt: 1e-12,
        max_retries: options.max_cutbacks,
        cutback_factor: 0.5,
        grow_factor: 2.0,
    }
}

fn check_physical(x: &DVector<Real>) -> EquilibriumResult<()> {
    if let Some((i, v)) = x.iter().enumerate().find(|(_, v)| !v.is_finite() || **v < 0.0) {
        return Err(EquilibriumError::NonPhysical {
            what: format!("state component {} = {}", i, v),
        });
    }
    Ok(())
}

/// Newton on the intensive steady-state equations, started from `x`.
///
/// Returns the polished extensive state, or `None` if Newton fails or leaves
/// the physical domain.
fn polish(model: &FluxParityModel, x: &DVector<Real>) -> Option<DVector<Real>> {
    let y0 = model.to_intensive(x);
    let bounded = (0..y0.len()).filter(|&i| y0[i] > 0.0).collect();
    let config = NewtonConfig {
        max_iterations: 50,
        abs_tol: 1e-14,
        rel_tol: 1e-10,
        positivity: Positivity::Indices(bounded),
        ..Default::default()
    };

    let residual = |y: &DVector<Real>| -> SolverResult<DVector<Real>> {
        Ok(model.intensive_derivative(&model.from_intensive(y)))
    };
    let jacobian =
        |y: &DVector<Real>| finite_difference_jacobian_with_floor(y, &residual, 1e-7, 1e-6);

    match newton_solve(y0, &residual, jacobian, &config) {
        Ok(result) => {
            let polished = model.from_intensive(&result.x);
            check_physical(&polished).ok().map(|_| polished)
        }
        Err(e) => {
            debug!(error = %e, "newton polish rejected");
            None
        }
    }
}

fn to_state(x: &DVector<Real>, phi_rb: Real, iterations: usize, residual: Real) -> EquilibriumState {
    EquilibriumState {
        total_biomass: x[idx::TOTAL_BIOMASS],
        ribosomal_biomass: x[idx::RIBOSOMAL_BIOMASS],
        metabolic_biomass: x[idx::METABOLIC_BIOMASS],
        uncharged_taa: x[idx::UNCHARGED_TAA],
        charged_taa: x[idx::CHARGED_TAA],
        phi_rb,
        iterations,
        residual,
    }
}
