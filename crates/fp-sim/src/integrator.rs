//! Fixed-step time integrators.

use crate::error::{SimError, SimResult};
use crate::model::{TransientModel, VectorState};
use fp_solver::{
    NewtonConfig, SolverError, SolverResult, finite_difference_jacobian_with_floor, newton_solve,
};
use nalgebra::DVector;
use std::cell::RefCell;

/// Trait for time integrators.
pub trait Integrator {
    /// Advance state by one time step using the transient model.
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State>;
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let k1 = model.rhs(t, x)?;

        let x2 = model.add(x, &model.scale(&k1, 0.5 * dt));
        let k2 = model.rhs(t + 0.5 * dt, &x2)?;

        let x3 = model.add(x, &model.scale(&k2, 0.5 * dt));
        let k3 = model.rhs(t + 0.5 * dt, &x3)?;

        let x4 = model.add(x, &model.scale(&k3, dt));
        let k4 = model.rhs(t + dt, &x4)?;

        // Combine: x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = model.add(
            &model.add(&k1, &model.scale(&k2, 2.0)),
            &model.add(&model.scale(&k3, 2.0), &k4),
        );

        Ok(model.add(x, &model.scale(&k_sum, dt / 6.0)))
    }
}

/// Forward Euler (explicit, 1st order).
/// Calls rhs() once per step instead of 4 times (RK4).
#[derive(Clone, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let xdot = model.rhs(t, x)?;
        Ok(model.add(x, &model.scale(&xdot, dt)))
    }
}

/// Backward Euler (implicit, 1st order, L-stable).
///
/// Solves `y - x - dt * f(t + dt, y) = 0` for `y` with Newton and a
/// forward-difference Jacobian. The model's positivity constraints are
/// enforced by the line search; a failed solve surfaces as a retryable
/// [`SimError::Solver`].
#[derive(Clone, Debug)]
pub struct BackwardEuler {
    pub newton: NewtonConfig,
    /// Relative perturbation for Jacobian columns
    pub jacobian_epsilon: f64,
    /// Smallest magnitude the perturbation is scaled by
    pub jacobian_floor: f64,
}

impl Default for BackwardEuler {
    fn default() -> Self {
        Self {
            newton: NewtonConfig {
                max_iterations: 50,
                abs_tol: 1e-14,
                rel_tol: 1e-10,
                ..Default::default()
            },
            jacobian_epsilon: 1e-7,
            jacobian_floor: 1e-6,
        }
    }
}

impl Integrator for BackwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let config = NewtonConfig {
            positivity: model.positivity(),
            ..self.newton.clone()
        };
        let x0 = x.to_vector();
        let t_new = t + dt;

        let model = RefCell::new(model);
        let rhs_error: RefCell<Option<SimError>> = RefCell::new(None);

        let residual = |y: &DVector<f64>| -> SolverResult<DVector<f64>> {
            let state = M::State::from_vector(y);
            let f = model
                .borrow_mut()
                .rhs(t_new, &state)
                .map_err(|e| {
                    let what = e.to_string();
                    *rhs_error.borrow_mut() = Some(e);
                    SolverError::InvalidState { what }
                })?
                .to_vector();
            Ok(y - &x0 - dt * f)
        };
        let jacobian = |y: &DVector<f64>| {
            finite_difference_jacobian_with_floor(
                y,
                &residual,
                self.jacobian_epsilon,
                self.jacobian_floor,
            )
        };

        match newton_solve(x0.clone(), &residual, jacobian, &config) {
            Ok(result) => Ok(M::State::from_vector(&result.x)),
            Err(solver_err) => match rhs_error.into_inner() {
                // Model errors keep their own classification
                Some(e) => Err(e),
                None => Err(SimError::Solver(solver_err)),
            },
        }
    }
}
