//! Command-line interface orchestration for fractanet.
//!
//! Every command loads a whitespace-delimited edge list, runs one analysis
//! from `fractanet-core` and returns an [`ExecutionSummary`] that
//! [`render_summary`] prints as text or JSON.

mod commands;
mod input;

pub use commands::{
    Algorithm, AlgorithmArgs, Cli, CliError, ClassifyCommand, Command, CoverCommand,
    CoverSummary, CurveArgs, CurveCommand, CurveSummary, EXIT_FIT, EXIT_INPUT, ExecutionSummary,
    GraphArgs, Order,
    RenormaliseCommand, RenormaliseSummary, render_summary, run_cli,
};
pub use input::{EdgeListError, LabelledGraph, parse_edge_list};

#[cfg(test)]
mod test_helpers;
