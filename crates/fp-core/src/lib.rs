//! fp-core: stable foundation for fluxparity.
//!
//! Contains:
//! - units (uom time types + rate conversions)
//! - numeric (Real + tolerances + guarded float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{FpError, FpResult};
pub use numeric::*;
pub use units::*;
