//! Small helpers shared across CLI tests.
//!
//! The CLI unit tests write temporary edge lists and assert error handling
//! behaviour. These helpers keep the test cases concise and consistent.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::TempDir;

use super::{Algorithm, AlgorithmArgs, Cli, CliError, Command, GraphArgs, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_text_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

/// Edge list of a path over labels `0..vertex_count`.
pub(super) fn path_edges(vertex_count: usize) -> String {
    (1..vertex_count)
        .map(|vertex| format!("{} {vertex}\n", vertex - 1))
        .collect()
}

pub(super) fn graph_args(path: PathBuf) -> GraphArgs {
    GraphArgs {
        path,
        largest_component: false,
    }
}

pub(super) fn algorithm(algorithm: Algorithm) -> AlgorithmArgs {
    AlgorithmArgs {
        algorithm,
        random_ties: false,
        seed: 0,
    }
}

pub(super) fn cli(command: Command) -> Cli {
    Cli {
        json: false,
        command,
    }
}

pub(super) fn run_cli_expecting_error(command: Command, panic_msg: &str) -> CliError {
    match run_cli(cli(command)) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
