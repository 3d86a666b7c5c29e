//! Benchmark support crate for fractanet.
//!
//! Provides synthetic networks and parameter types used by the Criterion
//! benchmarks for box covering, scaling-curve measurement and
//! renormalisation.

pub mod error;
pub mod params;
pub mod source;
