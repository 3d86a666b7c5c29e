//! Optional counters emitted through the `metrics` facade.
//!
//! With the `metrics` feature disabled every helper compiles to a no-op.

/// Excluded-mass evaluations performed by the MEMB engines.
pub(crate) const MEMB_MASS_EVALUATIONS: &str = "memb_mass_evaluations";
/// Completed renormalisation steps.
pub(crate) const RENORMALISATION_STEPS: &str = "renormalisation_steps";
/// Cells scored by the grid-search fitter.
pub(crate) const GRID_SEARCH_CELLS: &str = "grid_search_cells";

#[cfg(feature = "metrics")]
pub(crate) fn increment(name: &'static str, value: u64) {
    metrics::counter!(name).increment(value);
}

#[cfg(not(feature = "metrics"))]
pub(crate) fn increment(_name: &'static str, _value: u64) {}
