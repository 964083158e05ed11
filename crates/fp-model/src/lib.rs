//! fp-model: steady-state allocation and kinetics for the growth model.
//!
//! Provides:
//! - `RateConstants`, the validated physiological parameter set
//! - Michaelis-Menten rate laws for translation and metabolism
//! - Closed-form steady state of the precursor allocation model (growth rate,
//!   precursor concentration, translation rate, optimal ribosomal allocation)
//! - Sequence wrappers that map those scalar functions over sweeps
//!
//! Everything here is pure: same input, same output, no state. The only
//! fallible entry point is [`RateConstants::validate`].
//!
//! # Example
//!
//! ```
//! use fp_model::{RateConstants, phi_rb_optimal_allocation, steady_state_growth_rate};
//!
//! let c = RateConstants::default();
//! let phi_opt = phi_rb_optimal_allocation(c.gamma_max, c.nu_max, c.kd_cpc, c.phi_o);
//! let lam = steady_state_growth_rate(c.gamma_max, phi_opt, c.nu_max, c.kd_cpc, c.phi_o);
//! assert!(lam > 0.0);
//! ```

pub mod allocation;
pub mod constants;
pub mod error;
pub mod kinetics;
pub mod profile;
pub mod vectorize;

// Re-exports for ergonomics
pub use allocation::{
    phi_rb_optimal_allocation, steady_state_gamma, steady_state_growth_rate,
    steady_state_precursors,
};
pub use constants::{RateConstants, gamma_max_from_translation_speed};
pub use error::{ModelError, ModelResult};
pub use kinetics::michaelis_menten;
pub use profile::{SteadyStateProfile, allocation_range};
pub use vectorize::{
    gamma_over_phi_rb, growth_rate_over_phi_rb, map_over, optimal_allocation_over_nu,
    precursors_over_phi_rb,
};
