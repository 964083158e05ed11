//! Saturating rate laws.

use fp_core::Real;

/// Simple Michaelis-Menten kinetics
///
/// rate = rate_max * S / (S + Kd)
///
/// Returns zero when `S + Kd` is not positive, so an empty pool never yields
/// NaN.
#[inline]
pub fn michaelis_menten(rate_max: Real, s: Real, kd: Real) -> Real {
    let den = s + kd;
    if den > 0.0 { rate_max * s / den } else { 0.0 }
}
