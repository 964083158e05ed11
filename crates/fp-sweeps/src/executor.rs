//! Parallel evaluation of sweep points.

use fp_core::Real;
use rayon::prelude::*;
use std::fmt::Display;
use tracing::debug;

/// Values of a swept parameter and what each produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepOutcome<T> {
    /// Independent variable values (the sweep parameter)
    pub values: Vec<Real>,
    /// Per-point results (None for failed points)
    pub states: Vec<Option<T>>,
    pub num_successful: usize,
    pub num_failed: usize,
}

impl<T> SweepOutcome<T> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Independent values whose point succeeded.
    pub fn successful_values(&self) -> Vec<Real> {
        self.values
            .iter()
            .zip(&self.states)
            .filter_map(|(val, state)| state.as_ref().map(|_| *val))
            .collect()
    }

    /// Map each successful state, keeping failures as `None`.
    pub fn map<U, F>(&self, f: F) -> Vec<Option<U>>
    where
        F: Fn(&T) -> U,
    {
        self.states.iter().map(|s| s.as_ref().map(&f)).collect()
    }
}

/// Evaluate `f` at every value in parallel.
///
/// Output order matches `values`. Errors are logged and recorded as `None`.
pub fn run_points<T, E, F>(values: &[Real], f: F) -> SweepOutcome<T>
where
    T: Send,
    E: Display,
    F: Fn(Real) -> Result<T, E> + Sync,
{
    let states: Vec<Option<T>> = values
        .par_iter()
        .map(|&v| match f(v) {
            Ok(state) => Some(state),
            Err(e) => {
                debug!(value = v, error = %e, "sweep point failed");
                None
            }
        })
        .collect();

    let num_successful = states.iter().filter(|s| s.is_some()).count();
    SweepOutcome {
        values: values.to_vec(),
        num_failed: states.len() - num_successful,
        num_successful,
        states,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_order_and_counts_failures() {
        let values: Vec<Real> = (0..100).map(|i| i as Real).collect();
        let out = run_points(&values, |v| {
            if v as usize % 10 == 3 {
                Err("multiple of ten plus three")
            } else {
                Ok(2.0 * v)
            }
        });
        assert_eq!(out.len(), 100);
        assert_eq!(out.num_failed, 10);
        assert_eq!(out.num_successful, 90);
        assert_eq!(out.states[4], Some(8.0));
        assert_eq!(out.states[13], None);
        assert_eq!(out.successful_values().len(), 90);
        assert_eq!(out.map(|s| s + 1.0)[5], Some(11.0));
    }

    #[test]
    fn empty_sweep() {
        let out = run_points(&[], |v| Ok::<_, String>(v));
        assert!(out.is_empty());
        assert_eq!(out.num_failed, 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn matches_sequential_map(values in prop::collection::vec(-1e3f64..1e3, 0..200)) {
                let f = |v: Real| if v < 0.0 { Err("negative") } else { Ok(v.sqrt()) };
                let out = run_points(&values, f);

                prop_assert_eq!(&out.values, &values);
                let expected: Vec<Option<Real>> = values.iter().map(|&v| f(v).ok()).collect();
                prop_assert_eq!(&out.states, &expected);
                prop_assert_eq!(out.num_successful + out.num_failed, values.len());
                prop_assert_eq!(out.num_failed, values.iter().filter(|&&v| v < 0.0).count());
            }
        }
    }
}
