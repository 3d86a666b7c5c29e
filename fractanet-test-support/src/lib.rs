//! Shared test utilities used across fractanet crates.
//!
//! - [`tracing`] captures spans and events for instrumentation assertions.
//! - [`ci`] reads environment overrides for property-test runs.
//! - [`graphs`] builds deterministic edge-list fixtures.

pub mod ci;
pub mod graphs;
pub mod tracing;
