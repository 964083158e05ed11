//! Accuracy and stability of the fixed-step integrators.

use fp_sim::{IntegratorType, SimOptions, SimResult, TransientModel, run_sim};
use fp_solver::Positivity;
use nalgebra::DVector;

/// Logistic growth x' = r x (1 - x) coupled to a fast relaxing y' = -k (y - x).
struct LogisticFollower {
    r: f64,
    k: f64,
}

impl TransientModel for LogisticFollower {
    type State = DVector<f64>;

    fn initial_state(&self) -> Self::State {
        DVector::from_vec(vec![0.1, 0.0])
    }

    fn rhs(&mut self, _t: f64, x: &Self::State) -> SimResult<Self::State> {
        Ok(DVector::from_vec(vec![
            self.r * x[0] * (1.0 - x[0]),
            -self.k * (x[1] - x[0]),
        ]))
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        a + b
    }

    fn scale(&self, a: &Self::State, scale: f64) -> Self::State {
        a * scale
    }

    fn positivity(&self) -> Positivity {
        Positivity::Indices(vec![0])
    }
}

fn logistic(t: f64) -> f64 {
    let x0: f64 = 0.1;
    x0 / (x0 + (1.0 - x0) * (-t).exp())
}

fn run(integrator: IntegratorType, dt: f64, k: f64) -> DVector<f64> {
    let mut model = LogisticFollower { r: 1.0, k };
    let opts = SimOptions {
        dt,
        t_end: 5.0,
        integrator,
        record_every: 1000,
        ..Default::default()
    };
    let record = run_sim(&mut model, &opts).unwrap();
    record.last().unwrap().clone()
}

#[test]
fn rk4_tracks_logistic_solution() {
    let x = run(IntegratorType::RK4, 0.01, 1.0);
    assert!((x[0] - logistic(5.0)).abs() < 1e-8, "x = {}", x[0]);
}

#[test]
fn euler_variants_are_first_order() {
    let exact = logistic(5.0);
    let fe_coarse = (run(IntegratorType::ForwardEuler, 0.02, 1.0)[0] - exact).abs();
    let fe_fine = (run(IntegratorType::ForwardEuler, 0.01, 1.0)[0] - exact).abs();
    let be_coarse = (run(IntegratorType::BackwardEuler, 0.02, 1.0)[0] - exact).abs();
    let be_fine = (run(IntegratorType::BackwardEuler, 0.01, 1.0)[0] - exact).abs();

    // Halving dt roughly halves the error
    assert!(fe_fine < 0.6 * fe_coarse && fe_fine > 0.4 * fe_coarse);
    assert!(be_fine < 0.6 * be_coarse && be_fine > 0.4 * be_coarse);
}

#[test]
fn backward_euler_handles_stiff_follower() {
    // k * dt = 500: far outside the explicit stability region
    let x = run(IntegratorType::BackwardEuler, 0.05, 1e4);
    assert!(x.iter().all(|v| v.is_finite()));
    assert!((x[1] - x[0]).abs() < 1e-3);
    assert!((x[0] - logistic(5.0)).abs() < 1e-2);
}

#[test]
fn record_ends_at_t_end() {
    let mut model = LogisticFollower { r: 1.0, k: 1.0 };
    let opts = SimOptions {
        dt: 0.3,
        t_end: 1.0,
        record_every: 1,
        ..Default::default()
    };
    let record = run_sim(&mut model, &opts).unwrap();
    assert_eq!(record.t.len(), record.x.len());
    assert!((record.t.last().unwrap() - 1.0).abs() < 1e-12);
    assert!(record.t.windows(2).all(|w| w[1] > w[0]));
}

/// Scalar logistic growth with a configurable rate and start.
struct Logistic {
    r: f64,
    x0: f64,
}

impl TransientModel for Logistic {
    type State = f64;

    fn initial_state(&self) -> f64 {
        self.x0
    }

    fn rhs(&mut self, _t: f64, x: &f64) -> SimResult<f64> {
        Ok(self.r * x * (1.0 - x))
    }

    fn add(&self, a: &f64, b: &f64) -> f64 {
        a + b
    }

    fn scale(&self, a: &f64, scale: f64) -> f64 {
        a * scale
    }
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn rk4_matches_analytic_logistic(r in 0.2f64..2.0, x0 in 0.01f64..0.9) {
            let mut model = Logistic { r, x0 };
            let opts = SimOptions {
                dt: 0.01,
                t_end: 3.0,
                integrator: IntegratorType::RK4,
                record_every: 50,
                ..Default::default()
            };
            let record = run_sim(&mut model, &opts).unwrap();
            for (&t, &x) in record.t.iter().zip(&record.x) {
                let exact = x0 / (x0 + (1.0 - x0) * (-r * t).exp());
                prop_assert!((x - exact).abs() < 1e-7, "t = {}: {} vs {}", t, x, exact);
            }
            // Trajectory rises monotonically toward the carrying capacity
            prop_assert!(record.x.windows(2).all(|w| w[1] >= w[0] && w[1] < 1.0));
        }
    }
}
