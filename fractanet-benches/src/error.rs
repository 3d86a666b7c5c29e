//! Benchmark setup error type.
//!
//! Lets setup helpers propagate failures with `?`; bench bodies convert them
//! to a single `expect` at the call site.

use fractanet_core::FractalError;

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic network generation failed.
    #[error("synthetic network generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// A core operation failed while preparing inputs.
    #[error("core operation failed: {0}")]
    Core(#[from] FractalError),
}
