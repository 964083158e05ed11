//! TransientModel trait for pluggable dynamic systems.

use crate::error::SimResult;
use fp_solver::Positivity;
use nalgebra::DVector;

/// States that can be flattened for implicit solves.
pub trait VectorState: Clone {
    fn to_vector(&self) -> DVector<f64>;
    fn from_vector(v: &DVector<f64>) -> Self;
}

impl VectorState for f64 {
    fn to_vector(&self) -> DVector<f64> {
        DVector::from_element(1, *self)
    }

    fn from_vector(v: &DVector<f64>) -> Self {
        v[0]
    }
}

impl VectorState for DVector<f64> {
    fn to_vector(&self) -> DVector<f64> {
        self.clone()
    }

    fn from_vector(v: &DVector<f64>) -> Self {
        v.clone()
    }
}

impl VectorState for Vec<f64> {
    fn to_vector(&self) -> DVector<f64> {
        DVector::from_column_slice(self)
    }

    fn from_vector(v: &DVector<f64>) -> Self {
        v.iter().copied().collect()
    }
}

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State type (flattenable, for snapshots and implicit steps)
/// - Initial state
/// - RHS (right-hand side) computation: x_dot = f(t, x)
/// - Scalar field arithmetic for integration: add states, scale by scalar
pub trait TransientModel {
    /// State type.
    type State: VectorState;

    /// Return the initial state at t=0.
    fn initial_state(&self) -> Self::State;

    /// Compute state derivative dxdt = f(t, x).
    ///
    /// Takes &mut self to allow models to cache intermediate quantities.
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = scale * a.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;

    /// State components an implicit step must keep strictly positive.
    fn positivity(&self) -> Positivity {
        Positivity::Unconstrained
    }
}
