//! Parameter sweeps over the allocation and flux-parity models.
//!
//! Each sweep point is an independent, pure computation, so points are
//! evaluated in parallel with rayon. Results stay aligned with the input
//! order. A point whose equilibration fails is kept as `None` and counted.

pub mod allocation;
pub mod definition;
pub mod error;
pub mod executor;
pub mod grid;
pub mod nu;

pub use allocation::{AllocationSweep, TentPoint, sweep_allocation};
pub use definition::{SweepDefinition, SweepType};
pub use error::{SweepError, SweepResult};
pub use executor::{SweepOutcome, run_points};
pub use grid::{ParameterGrid, ParameterSweepRow, TauKappaSweep, sweep_tau_kappa};
pub use nu::{NuMaxSweep, sweep_nu_max};
