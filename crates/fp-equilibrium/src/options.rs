//! Equilibration controls.

use crate::error::{EquilibriumError, EquilibriumResult};
use fp_core::Real;
use fp_sim::IntegratorType;
use serde::{Deserialize, Serialize};

/// How each round refines the state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquilibrationStrategy {
    /// Integrate the dynamics only.
    #[default]
    Relaxation,
    /// Integrate, then polish the round's end state with Newton on the
    /// steady-state equations.
    Newton,
}

/// Controls for [`equilibrate_fpm`](crate::equilibrate_fpm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquilibrationOptions {
    /// Maximum refinement rounds
    pub max_iter: usize,
    /// Convergence threshold on the scaled intensive derivative [hr⁻¹]
    pub tolerance: Real,
    /// Integration horizon per round [hr]
    pub horizon: Real,
    /// Nominal integration step [hr]
    pub dt: Real,
    pub integrator: IntegratorType,
    pub strategy: EquilibrationStrategy,
    /// Initial uncharged transfer-molecule abundance
    pub initial_uncharged: Real,
    /// Initial charged transfer-molecule abundance
    pub initial_charged: Real,
    /// Step halvings allowed before a failed step is fatal
    pub max_cutbacks: usize,
}

impl Default for EquilibrationOptions {
    fn default() -> Self {
        Self {
            max_iter: 10,
            tolerance: 1e-6,
            horizon: 10.0,
            dt: 0.05,
            integrator: IntegratorType::BackwardEuler,
            strategy: EquilibrationStrategy::Relaxation,
            initial_uncharged: 2e-4,
            initial_charged: 2e-4,
            max_cutbacks: 30,
        }
    }
}

impl EquilibrationOptions {
    pub fn with_max_iter(self, max_iter: usize) -> Self {
        Self { max_iter, ..self }
    }

    pub fn with_strategy(self, strategy: EquilibrationStrategy) -> Self {
        Self { strategy, ..self }
    }

    pub fn validate(&self) -> EquilibriumResult<()> {
        let invalid = |what| Err(EquilibriumError::InvalidOptions { what });
        if self.max_iter == 0 {
            return invalid("max_iter must be at least 1");
        }
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return invalid("tolerance must be positive");
        }
        if !(self.horizon > 0.0 && self.horizon.is_finite()) {
            return invalid("horizon must be positive");
        }
        if !(self.dt > 0.0 && self.dt <= self.horizon) {
            return invalid("dt must lie in (0, horizon]");
        }
        if !(self.initial_uncharged > 0.0 && self.initial_charged > 0.0) {
            return invalid("initial pools must be positive");
        }
        if !(self.initial_uncharged.is_finite() && self.initial_charged.is_finite()) {
            return invalid("initial pools must be finite");
        }
        Ok(())
    }
}
