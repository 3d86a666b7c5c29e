//! `fractanet` binary.
//!
//! Installs logging, runs one analysis command and prints its summary on
//! stdout. Failures are logged with their machine-readable codes and turned
//! into a non-zero exit status via [`CliError::exit_code`].

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, field};

use fractanet_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};

fn main() -> ExitCode {
    match logging::init_logging() {
        Ok(status) => debug!(%status, "logging ready"),
        Err(err) => {
            report_logging_init_error(&err);
            return ExitCode::FAILURE;
        }
    }

    match execute(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let failure = err.downcast_ref::<CliError>();
            let analysis = failure.and_then(|cli_error| match cli_error {
                CliError::Core(source) => Some(source),
                _ => None,
            });
            error!(
                error = %err,
                code = analysis.map(|source| field::display(source.code().as_str())),
                fit_code = analysis
                    .and_then(|source| source.fit_code())
                    .map(|fit| field::display(fit.as_str())),
                "command failed"
            );
            ExitCode::from(failure.map_or(1, CliError::exit_code))
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    let json = cli.json;
    let summary = run_cli(cli).context("command failed")?;
    let mut out = BufWriter::new(io::stdout().lock());
    render_summary(&summary, json, &mut out).context("failed to render summary")?;
    out.flush().context("failed to flush stdout")
}

#[expect(
    clippy::print_stderr,
    reason = "tracing is not available until logging is installed"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("fractanet: cannot configure logging: {err}");
}
