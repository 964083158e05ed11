//! Closed-form steady state of the precursor allocation model.
//!
//! Ribosomes (allocation `phi_rb`) consume a precursor pool that metabolic
//! proteins (allocation `1 - phi_o - phi_rb`) replenish. At steady state the
//! translation rate saturates on the precursor concentration and the growth
//! rate is the smaller root of
//!
//! ```text
//! (1 - Kd) λ² - (N + G) λ + N G = 0,   N = ν_max (1 - φ_Rb - φ_O),  G = γ_max φ_Rb
//! ```

use crate::kinetics::michaelis_menten;
use fp_core::{Real, guarded_div};

/// Metabolic and translational capacities `(N, G)` of an allocation.
#[inline]
fn capacities(gamma_max: Real, phi_rb: Real, nu_max: Real, phi_o: Real) -> (Real, Real) {
    let n = nu_max * (1.0 - phi_rb - phi_o);
    let g = gamma_max * phi_rb;
    (n.max(0.0), g.max(0.0))
}

/// Discriminant of the growth-rate quadratic written as a sum of
/// non-negative terms, `(N - G)² + 4 Kd N G`.
#[inline]
fn discriminant(n: Real, g: Real, kd_cpc: Real) -> Real {
    let d = n - g;
    (d * d + 4.0 * kd_cpc * n * g).max(0.0)
}

/// Steady-state growth rate λ [hr⁻¹].
///
/// Evaluated as `2NG / ((N + G) + sqrt(disc))`, which avoids the
/// cancellation of the textbook root when `N G` is small. Zero when either
/// capacity vanishes, in particular at `phi_rb = 0`.
pub fn steady_state_growth_rate(
    gamma_max: Real,
    phi_rb: Real,
    nu_max: Real,
    kd_cpc: Real,
    phi_o: Real,
) -> Real {
    let (n, g) = capacities(gamma_max, phi_rb, nu_max, phi_o);
    if n <= 0.0 || g <= 0.0 {
        return 0.0;
    }
    let den = (n + g) + discriminant(n, g, kd_cpc).sqrt();
    2.0 * n * g / den
}

/// Steady-state precursor concentration `c_pc`.
///
/// Non-negative. Tends to zero as `nu_max -> 0`; the `phi_rb -> 0` boundary
/// is floored so the result stays finite.
pub fn steady_state_precursors(
    gamma_max: Real,
    phi_rb: Real,
    nu_max: Real,
    kd_cpc: Real,
    phi_o: Real,
) -> Real {
    let (n, g) = capacities(gamma_max, phi_rb, nu_max, phi_o);
    let root = n + g + discriminant(n, g, kd_cpc).sqrt();
    (guarded_div(root, 2.0 * g) - 1.0).max(0.0)
}

/// Steady-state translation rate γ [hr⁻¹], in `[0, gamma_max]`.
pub fn steady_state_gamma(
    gamma_max: Real,
    phi_rb: Real,
    nu_max: Real,
    kd_cpc: Real,
    phi_o: Real,
) -> Real {
    let c_pc = steady_state_precursors(gamma_max, phi_rb, nu_max, kd_cpc, phi_o);
    // Saturated pools can round a hair above gamma_max
    michaelis_menten(gamma_max, c_pc, kd_cpc).min(gamma_max)
}

/// Ribosomal allocation that maximizes the steady-state growth rate.
///
/// Lies in `(0, 1 - phi_o)` for positive rates and `0 < kd_cpc < 1`.
pub fn phi_rb_optimal_allocation(gamma_max: Real, nu_max: Real, kd_cpc: Real, phi_o: Real) -> Real {
    let (g, nu, k) = (gamma_max, nu_max, kd_cpc);
    let num = nu * (-2.0 * k * g + g + nu) + (k * g * nu).sqrt() * (g - nu);
    let sum = g + nu;
    let den = sum * sum - 4.0 * k * g * nu;
    (1.0 - phi_o) * guarded_div(num, den)
}
