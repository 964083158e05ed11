//! Sequence forms of the scalar steady-state functions.
//!
//! Each helper maps one scalar function over a slice and returns a vector
//! aligned with its input. No broadcasting: the varied argument is the slice,
//! everything else comes from `RateConstants`.

use crate::allocation::{
    phi_rb_optimal_allocation, steady_state_gamma, steady_state_growth_rate,
    steady_state_precursors,
};
use crate::constants::RateConstants;
use fp_core::Real;

/// Apply `f` to every value, preserving order.
pub fn map_over<F>(values: &[Real], f: F) -> Vec<Real>
where
    F: Fn(Real) -> Real,
{
    values.iter().map(|&v| f(v)).collect()
}

/// Optimal ribosomal allocation for each `nu_max`.
pub fn optimal_allocation_over_nu(c: &RateConstants, nu_max: &[Real]) -> Vec<Real> {
    map_over(nu_max, |nu| {
        phi_rb_optimal_allocation(c.gamma_max, nu, c.kd_cpc, c.phi_o)
    })
}

/// Steady-state growth rate for each ribosomal allocation.
pub fn growth_rate_over_phi_rb(c: &RateConstants, phi_rb: &[Real]) -> Vec<Real> {
    map_over(phi_rb, |phi| {
        steady_state_growth_rate(c.gamma_max, phi, c.nu_max, c.kd_cpc, c.phi_o)
    })
}

/// Steady-state precursor concentration for each ribosomal allocation.
pub fn precursors_over_phi_rb(c: &RateConstants, phi_rb: &[Real]) -> Vec<Real> {
    map_over(phi_rb, |phi| {
        steady_state_precursors(c.gamma_max, phi, c.nu_max, c.kd_cpc, c.phi_o)
    })
}

/// Steady-state translation rate for each ribosomal allocation.
pub fn gamma_over_phi_rb(c: &RateConstants, phi_rb: &[Real]) -> Vec<Real> {
    map_over(phi_rb, |phi| {
        steady_state_gamma(c.gamma_max, phi, c.nu_max, c.kd_cpc, c.phi_o)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_length_and_order() {
        let c = RateConstants::default();
        let nus = [0.5, 4.5, 20.0];
        let opts = optimal_allocation_over_nu(&c, &nus);
        assert_eq!(opts.len(), nus.len());
        for (nu, opt) in nus.iter().zip(&opts) {
            assert_eq!(
                *opt,
                phi_rb_optimal_allocation(c.gamma_max, *nu, c.kd_cpc, c.phi_o)
            );
        }
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let c = RateConstants::default();
        assert!(growth_rate_over_phi_rb(&c, &[]).is_empty());
        assert!(map_over(&[], |x| x * 2.0).is_empty());
    }

    #[test]
    fn wrappers_agree_with_scalars() {
        let c = RateConstants::default();
        let phis = [0.0, 0.1, 0.2, 0.3];
        let lam = growth_rate_over_phi_rb(&c, &phis);
        let cpc = precursors_over_phi_rb(&c, &phis);
        let gam = gamma_over_phi_rb(&c, &phis);
        assert_eq!(lam[0], 0.0);
        for i in 0..phis.len() {
            assert!(gam[i] <= c.gamma_max);
            assert!(cpc[i] >= 0.0);
        }
    }
}
