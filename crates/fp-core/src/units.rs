// fp-core/src/units.rs

use uom::si::f64::Time;
use uom::si::time::{hour, second};

/// Duration of `v` hours.
#[inline]
pub fn hr(v: f64) -> Time {
    Time::new::<hour>(v)
}

/// Convert a per-second rate into a per-hour rate.
#[inline]
pub fn per_second_to_per_hour(rate_per_s: f64) -> f64 {
    rate_per_s * hr(1.0).get::<second>()
}

/// Maximum translation rate in hr⁻¹ from a peptide elongation speed.
///
/// A ribosome of `ribosome_mass_aa` amino acids polymerizing at
/// `speed_aa_per_s` doubles its own mass every `ribosome_mass_aa / speed`
/// seconds.
#[inline]
pub fn translation_rate_per_hour(speed_aa_per_s: f64, ribosome_mass_aa: f64) -> f64 {
    per_second_to_per_hour(speed_aa_per_s) / ribosome_mass_aa
}

pub mod constants {
    /// Elongation speed used by the reference parameter set [AA/s].
    pub const TRANSLATION_SPEED_AA_PER_S: f64 = 20.0;
    /// Proteinaceous mass of one ribosome [AA].
    pub const RIBOSOME_MASS_AA: f64 = 7459.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_is_3600_seconds() {
        assert!((hr(1.0).get::<second>() - 3600.0).abs() < 1e-9);
        assert!((per_second_to_per_hour(1.0) - 3600.0).abs() < 1e-9);
    }

    #[test]
    fn reference_translation_rate() {
        let gamma_max = translation_rate_per_hour(
            constants::TRANSLATION_SPEED_AA_PER_S,
            constants::RIBOSOME_MASS_AA,
        );
        assert!((gamma_max - 20.0 * 3600.0 / 7459.0).abs() < 1e-9);
    }
}
