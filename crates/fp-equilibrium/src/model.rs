//! Flux-parity dynamics.
//!
//! Extensive state `[M, M_Rb, M_Mb, T, T*]`, plus `φ_Rb` under a dynamic
//! allocation policy:
//!
//! ```text
//! γ = γ_max T*/(T* + K*)      ν = ν_max T/(T + K_T)      λ = γ M_Rb / M
//! dM/dt    = γ M_Rb
//! dM_Rb/dt = φ_Rb dM/dt
//! dM_Mb/dt = (1 - φ_O - φ_Rb) dM/dt
//! dT*/dt   = ν M_Mb/M - λ (1 + T*)
//! dT/dt    = κ_max + λ - ν M_Mb/M - λ T
//! dφ_Rb/dt = (φ* - φ_Rb) / τ,   φ* = (1 - φ_O) r / (r + r_half),  r = T*/T
//! ```

use crate::policy::AllocationPolicy;
use crate::state::idx;
use fp_core::{EPS, Real, guarded_div};
use fp_model::RateConstants;
use fp_sim::{SimResult, TransientModel};
use fp_solver::Positivity;
use nalgebra::DVector;

/// Intensive components checked for convergence.
const INTENSIVE_DIM: usize = 4;

/// The flux-parity growth model as a [`TransientModel`].
#[derive(Debug, Clone)]
pub struct FluxParityModel {
    constants: RateConstants,
    policy: AllocationPolicy,
    start: DVector<Real>,
}

impl FluxParityModel {
    /// Model starting from unit biomass split according to the policy's
    /// initial allocation, with the given transfer-molecule pools.
    pub fn new(
        constants: RateConstants,
        policy: AllocationPolicy,
        uncharged: Real,
        charged: Real,
    ) -> Self {
        let policy = policy.clamped(constants.max_allocation());
        let phi = policy.initial_phi_rb();
        let mut start = vec![1.0, phi, constants.max_allocation() - phi, uncharged, charged];
        if policy.is_dynamic() {
            start.push(phi);
        }
        Self {
            constants,
            policy,
            start: DVector::from_vec(start),
        }
    }

    pub fn constants(&self) -> &RateConstants {
        &self.constants
    }

    pub fn policy(&self) -> &AllocationPolicy {
        &self.policy
    }

    /// Number of state components.
    pub fn dim(&self) -> usize {
        self.start.len()
    }

    /// Continue the next integration from `state`.
    pub fn restart_from(&mut self, state: DVector<Real>) {
        self.start = state;
    }

    /// Allocation in force for `x`.
    pub fn phi_rb(&self, x: &DVector<Real>) -> Real {
        match self.policy {
            AllocationPolicy::Fixed { phi_rb } => phi_rb,
            AllocationPolicy::Dynamic { .. } => x[idx::ALLOCATION],
        }
    }

    /// Allocation signalled by the charging balance `T*/T`.
    pub fn allocation_target(&self, uncharged: Real, charged: Real) -> Real {
        let r = guarded_div(charged, uncharged).max(0.0);
        self.constants.max_allocation() * r / (r + self.constants.charging_threshold)
    }

    /// Time derivative of the extensive state.
    pub fn derivative(&self, x: &DVector<Real>) -> DVector<Real> {
        let c = &self.constants;
        let total = x[idx::TOTAL_BIOMASS];
        let uncharged = x[idx::UNCHARGED_TAA];
        let charged = x[idx::CHARGED_TAA];
        let phi = self.phi_rb(x);

        let gamma = c.translation_rate(charged);
        let nu = c.metabolic_rate(uncharged);
        let d_total = gamma * x[idx::RIBOSOMAL_BIOMASS];
        let lambda = guarded_div(d_total, total);
        let charging = nu * guarded_div(x[idx::METABOLIC_BIOMASS], total);

        let mut dx = DVector::zeros(x.len());
        dx[idx::TOTAL_BIOMASS] = d_total;
        dx[idx::RIBOSOMAL_BIOMASS] = phi * d_total;
        dx[idx::METABOLIC_BIOMASS] = (c.max_allocation() - phi) * d_total;
        dx[idx::UNCHARGED_TAA] = c.kappa_max + lambda - charging - lambda * uncharged;
        dx[idx::CHARGED_TAA] = charging - lambda * (1.0 + charged);
        if self.policy.is_dynamic() {
            dx[idx::ALLOCATION] = (self.allocation_target(uncharged, charged) - phi) / c.tau;
        }
        dx
    }

    /// Extensive state to intensive `[M_Rb/M, M_Mb/M, T, T*, (φ_Rb)]`.
    pub fn to_intensive(&self, x: &DVector<Real>) -> DVector<Real> {
        let total = x[idx::TOTAL_BIOMASS];
        let mut y = DVector::zeros(x.len() - 1);
        y[0] = guarded_div(x[idx::RIBOSOMAL_BIOMASS], total);
        y[1] = guarded_div(x[idx::METABOLIC_BIOMASS], total);
        y[2] = x[idx::UNCHARGED_TAA];
        y[3] = x[idx::CHARGED_TAA];
        if self.policy.is_dynamic() {
            y[INTENSIVE_DIM] = x[idx::ALLOCATION];
        }
        y
    }

    /// Intensive state back to extensive form with unit total biomass.
    pub fn from_intensive(&self, y: &DVector<Real>) -> DVector<Real> {
        let mut x = DVector::zeros(y.len() + 1);
        x[idx::TOTAL_BIOMASS] = 1.0;
        x.rows_mut(1, y.len()).copy_from(y);
        x
    }

    /// Rescale biomass so that `M = 1`; pools and allocation are unchanged.
    pub fn normalize(&self, x: &DVector<Real>) -> DVector<Real> {
        self.from_intensive(&self.to_intensive(x))
    }

    /// Time derivative of the intensive state.
    ///
    /// Biomass fractions obey `d(M_i/M)/dt = (dM_i/dt)/M - (M_i/M) λ`. Zero
    /// exactly at a steady state of the intensive dynamics.
    pub fn intensive_derivative(&self, x: &DVector<Real>) -> DVector<Real> {
        let dx = self.derivative(x);
        let total = x[idx::TOTAL_BIOMASS];
        let lambda = guarded_div(dx[idx::TOTAL_BIOMASS], total);
        let y = self.to_intensive(x);

        let mut dy = DVector::zeros(y.len());
        dy[0] = guarded_div(dx[idx::RIBOSOMAL_BIOMASS], total) - y[0] * lambda;
        dy[1] = guarded_div(dx[idx::METABOLIC_BIOMASS], total) - y[1] * lambda;
        dy[2] = dx[idx::UNCHARGED_TAA];
        dy[3] = dx[idx::CHARGED_TAA];
        if self.policy.is_dynamic() {
            dy[INTENSIVE_DIM] = dx[idx::ALLOCATION];
        }
        dy
    }

    /// Largest relative rate of change among the intensive components,
    /// `max_i |dy_i/dt| / (|y_i| + ε)` [hr⁻¹].
    pub fn scaled_residual(&self, x: &DVector<Real>) -> Real {
        let y = self.to_intensive(x);
        let dy = self.intensive_derivative(x);
        dy.iter()
            .zip(y.iter())
            .map(|(d, v)| d.abs() / (v.abs() + EPS))
            .fold(0.0, Real::max)
    }
}

impl TransientModel for FluxParityModel {
    type State = DVector<Real>;

    fn initial_state(&self) -> Self::State {
        self.start.clone()
    }

    fn rhs(&mut self, _t: f64, x: &Self::State) -> SimResult<Self::State> {
        Ok(self.derivative(x))
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        a + b
    }

    fn scale(&self, a: &Self::State, scale: f64) -> Self::State {
        a * scale
    }

    /// Pools, and every biomass component that can grow, stay positive.
    fn positivity(&self) -> Positivity {
        let bounded = (idx::RIBOSOMAL_BIOMASS..=idx::CHARGED_TAA)
            .filter(|&i| self.start[i] > 0.0)
            .collect();
        Positivity::Indices(bounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(policy: AllocationPolicy) -> FluxParityModel {
        FluxParityModel::new(RateConstants::default(), policy, 2e-4, 2e-4)
    }

    #[test]
    fn initial_state_layout() {
        let m = model(AllocationPolicy::fixed(0.2));
        let x = m.initial_state();
        assert_eq!(x.len(), 5);
        assert_eq!(x[idx::TOTAL_BIOMASS], 1.0);
        assert!((x[idx::METABOLIC_BIOMASS] - 0.25).abs() < 1e-12);

        let m = model(AllocationPolicy::dynamic(0.1));
        assert_eq!(m.dim(), 6);
        assert_eq!(m.initial_state()[idx::ALLOCATION], 0.1);
    }

    #[test]
    fn upper_bound_allocation_leaves_empty_metabolic_pool() {
        let m = model(AllocationPolicy::fixed(0.45));
        let x = m.initial_state();
        assert_eq!(x[idx::RIBOSOMAL_BIOMASS], m.constants().max_allocation());
        assert_eq!(x[idx::METABOLIC_BIOMASS], 0.0);
        assert!(m.derivative(&x)[idx::METABOLIC_BIOMASS] >= 0.0);
    }

    #[test]
    fn biomass_split_follows_allocation() {
        let m = model(AllocationPolicy::fixed(0.2));
        let dx = m.derivative(&m.initial_state());
        assert!(dx[idx::TOTAL_BIOMASS] > 0.0);
        assert!((dx[idx::RIBOSOMAL_BIOMASS] - 0.2 * dx[idx::TOTAL_BIOMASS]).abs() < 1e-15);
        let split = dx[idx::RIBOSOMAL_BIOMASS] + dx[idx::METABOLIC_BIOMASS];
        assert!((split - 0.45 * dx[idx::TOTAL_BIOMASS]).abs() < 1e-15);
    }

    #[test]
    fn intensive_round_trip() {
        let m = model(AllocationPolicy::dynamic(0.1));
        let mut x = m.initial_state();
        x *= 3.0;
        x[idx::UNCHARGED_TAA] = 1e-3;
        let n = m.normalize(&x);
        assert_eq!(n[idx::TOTAL_BIOMASS], 1.0);
        assert!((n[idx::RIBOSOMAL_BIOMASS] - 0.1).abs() < 1e-12);
        assert_eq!(n[idx::UNCHARGED_TAA], 1e-3);
        assert_eq!(n[idx::ALLOCATION], x[idx::ALLOCATION]);
    }

    #[test]
    fn residual_is_scale_invariant_in_biomass() {
        let m = model(AllocationPolicy::fixed(0.2));
        let x = m.initial_state();
        let mut big = x.clone();
        for i in idx::TOTAL_BIOMASS..=idx::METABOLIC_BIOMASS {
            big[i] *= 5.0;
        }
        let a = m.scaled_residual(&x);
        let b = m.scaled_residual(&big);
        assert!((a - b).abs() <= 1e-9 * a.max(1.0));
    }

    #[test]
    fn target_rises_with_charging() {
        let m = model(AllocationPolicy::dynamic(0.1));
        let low = m.allocation_target(1e-3, 1e-5);
        let high = m.allocation_target(1e-5, 1e-3);
        assert!(low < high);
        assert!(high < RateConstants::default().max_allocation());
        assert_eq!(m.allocation_target(1e-3, 0.0), 0.0);
    }

    #[test]
    fn empty_compartments_are_unbounded() {
        let m = model(AllocationPolicy::fixed(0.0));
        assert_eq!(
            m.positivity(),
            Positivity::Indices(vec![
                idx::METABOLIC_BIOMASS,
                idx::UNCHARGED_TAA,
                idx::CHARGED_TAA
            ])
        );
    }
}
