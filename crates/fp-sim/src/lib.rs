//! Transient simulation framework.
//!
//! Provides:
//! - `TransientModel`, the trait dynamic systems implement
//! - Fixed-step integrators: RK4, forward Euler, backward Euler (Newton per step)
//! - `run_sim` with step cutback on retryable failures

pub mod error;
pub mod integrator;
pub mod model;
pub mod sim;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use integrator::{BackwardEuler, ForwardEuler, Integrator, RK4};
pub use model::{TransientModel, VectorState};
pub use sim::{IntegratorType, SimOptions, SimRecord, run_sim};
