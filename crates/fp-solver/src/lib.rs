//! Nonlinear solver building blocks.
//!
//! A damped Newton iteration with positivity-preserving line search and
//! finite-difference Jacobians. Used by the implicit integrator in `fp-sim`
//! and by the steady-state polish in `fp-equilibrium`.

pub mod error;
pub mod jacobian;
pub mod newton;

pub use error::{SolverError, SolverResult};
pub use jacobian::{
    central_difference_jacobian, finite_difference_jacobian, finite_difference_jacobian_with_floor,
};
pub use newton::{NewtonConfig, NewtonResult, Positivity, newton_solve};
