//! Normalized steady-state profiles over a range of ribosomal allocations.

use crate::constants::RateConstants;
use crate::vectorize::{gamma_over_phi_rb, growth_rate_over_phi_rb, precursors_over_phi_rb};
use fp_core::{Real, guarded_div, linspace};
use serde::{Deserialize, Serialize};

/// Margin kept between a sampled allocation range and its closed bounds.
const RANGE_MARGIN: Real = 1e-3;

/// `n` allocations spanning the open interval `(0, 1 - phi_o)`.
pub fn allocation_range(phi_o: Real, n: usize) -> Vec<Real> {
    linspace(RANGE_MARGIN, 1.0 - phi_o - RANGE_MARGIN, n)
}

/// Aligned columns describing the steady state along `phi_rb`.
///
/// `relative_growth` is normalized to the largest growth rate in the
/// profile, `relative_precursors` to `kd_cpc` and `relative_gamma` to
/// `gamma_max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteadyStateProfile {
    pub phi_rb: Vec<Real>,
    pub growth_rate: Vec<Real>,
    pub relative_growth: Vec<Real>,
    pub relative_precursors: Vec<Real>,
    pub relative_gamma: Vec<Real>,
}

impl SteadyStateProfile {
    pub fn compute(c: &RateConstants, phi_rb: &[Real]) -> Self {
        let growth_rate = growth_rate_over_phi_rb(c, phi_rb);
        let lam_max = growth_rate.iter().copied().fold(0.0, Real::max);
        let relative_growth = growth_rate
            .iter()
            .map(|&lam| guarded_div(lam, lam_max))
            .collect();
        let relative_precursors = precursors_over_phi_rb(c, phi_rb)
            .into_iter()
            .map(|c_pc| c_pc / c.kd_cpc)
            .collect();
        let relative_gamma = gamma_over_phi_rb(c, phi_rb)
            .into_iter()
            .map(|gamma| gamma / c.gamma_max)
            .collect();

        Self {
            phi_rb: phi_rb.to_vec(),
            growth_rate,
            relative_growth,
            relative_precursors,
            relative_gamma,
        }
    }

    /// Profile over `n` evenly spaced allocations of the admissible range.
    pub fn over_range(c: &RateConstants, n: usize) -> Self {
        Self::compute(c, &allocation_range(c.phi_o, n))
    }

    pub fn len(&self) -> usize {
        self.phi_rb.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phi_rb.is_empty()
    }

    /// Allocation with the largest growth rate among the sampled points.
    pub fn best_sample(&self) -> Option<Real> {
        self.growth_rate
            .iter()
            .zip(&self.phi_rb)
            .max_by(|a, b| a.0.total_cmp(b.0))
            .map(|(_, &phi)| phi)
    }
}
