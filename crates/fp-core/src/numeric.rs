use crate::FpError;

/// Floating point type used throughout system
pub type Real = f64;

/// Floor applied to denominators that can reach zero at domain boundaries.
pub const EPS: Real = 1e-12;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, FpError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FpError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, FpError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(FpError::OutOfRange {
            what,
            value: v,
            range: "(0, inf)",
        })
    }
}

/// Finite and inside the closed interval `[lo, hi]`.
pub fn ensure_in_range(
    v: Real,
    lo: Real,
    hi: Real,
    what: &'static str,
    range: &'static str,
) -> Result<Real, FpError> {
    let v = ensure_finite(v, what)?;
    if v >= lo && v <= hi {
        Ok(v)
    } else {
        Err(FpError::OutOfRange {
            what,
            value: v,
            range,
        })
    }
}

/// `num / den` with the magnitude of `den` floored at [`EPS`].
///
/// The sign of `den` is kept, a zero denominator is treated as positive.
#[inline]
pub fn guarded_div(num: Real, den: Real) -> Real {
    if den.abs() >= EPS {
        num / den
    } else if den < 0.0 {
        num / -EPS
    } else {
        num / EPS
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let delta = (end - start) / (n - 1) as Real;
            let mut points: Vec<Real> = (0..n).map(|i| start + i as Real * delta).collect();
            // Ensure exact endpoint
            points[n - 1] = end;
            points
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert!(ensure_positive(1e-9, "k").is_ok());
        assert!(ensure_positive(0.0, "k").is_err());
        assert!(ensure_positive(-1.0, "k").is_err());
        assert!(ensure_positive(Real::INFINITY, "k").is_err());
    }

    #[test]
    fn ensure_in_range_bounds_are_inclusive() {
        assert!(ensure_in_range(0.0, 0.0, 1.0, "phi", "[0, 1]").is_ok());
        assert!(ensure_in_range(1.0, 0.0, 1.0, "phi", "[0, 1]").is_ok());
        let err = ensure_in_range(1.5, 0.0, 1.0, "phi", "[0, 1]").unwrap_err();
        assert!(err.to_string().contains("[0, 1]"));
    }

    #[test]
    fn linspace_endpoints() {
        let pts = linspace(0.5, 20.0, 200);
        assert_eq!(pts.len(), 200);
        assert_eq!(pts[0], 0.5);
        assert_eq!(pts[199], 20.0);
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
    }

    #[test]
    fn guarded_div_never_returns_nan() {
        assert_eq!(guarded_div(1.0, 2.0), 0.5);
        assert!(guarded_div(1.0, 0.0).is_finite());
        assert!(guarded_div(0.0, 0.0).is_finite());
        assert!(guarded_div(1.0, -0.0).is_finite());
        assert!(guarded_div(1.0, -1e-20) < 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn guarded_div_is_finite(num in -1e6_f64..1e6_f64, den in -1.0_f64..1.0_f64) {
            prop_assert!(guarded_div(num, den).is_finite());
        }

        #[test]
        fn nearly_equal_is_symmetric(a in -1e3_f64..1e3_f64, b in -1e3_f64..1e3_f64) {
            let tol = Tolerances::default();
            prop_assert_eq!(nearly_equal(a, b, tol), nearly_equal(b, a, tol));
        }
    }
}
