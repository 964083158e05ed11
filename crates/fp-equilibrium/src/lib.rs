//! fp-equilibrium: self-consistent steady state of the flux-parity model.
//!
//! The flux-parity model tracks total, ribosomal and metabolic biomass
//! together with the uncharged and charged transfer-molecule pools.
//! Metabolic proteins charge transfer molecules, ribosomes consume the
//! charged pool, and growth dilutes both. [`equilibrate_fpm`] integrates
//! the dynamics in bounded rounds until the intensive state stops moving.
//!
//! Under [`AllocationPolicy::Dynamic`] the ribosomal allocation itself
//! relaxes toward the value signalled by the charging balance `T*/T`, which
//! lands close to the growth-optimal allocation.

pub mod equilibrate;
pub mod error;
pub mod model;
pub mod options;
pub mod policy;
pub mod state;

pub use equilibrate::{EquilibriumConfig, equilibrate_fpm};
pub use error::{EquilibriumError, EquilibriumResult};
pub use model::FluxParityModel;
pub use options::{EquilibrationOptions, EquilibrationStrategy};
pub use policy::AllocationPolicy;
pub use state::{EquilibriumState, FluxBalance};
