//! Command implementations and argument parsing for the fractanet CLI.

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use fractanet_core::{
    BoxCovering, BoxDiameter, ClassifierConfig, CoveringAlgorithm, CurveConfig, FitError,
    FractalError, FractalityReport, Renormaliser, ScalingCurve, TieBreak, VertexOrder, classify,
    scaling_curve,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::input::{EdgeListError, LabelledGraph, parse_edge_list};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "fractanet",
    about = "Box-covering, renormalisation and fractality analysis of networks."
)]
pub struct Cli {
    /// Emit results as JSON instead of plain text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cover the network with boxes of one diameter.
    Cover(CoverCommand),
    /// Measure the box-count scaling curve.
    Curve(CurveCommand),
    /// Decide whether the network scales like a fractal.
    Classify(ClassifyCommand),
    /// Repeatedly collapse boxes into supernodes until one vertex remains.
    Renormalise(RenormaliseCommand),
}

/// Edge-list input shared by every command.
#[derive(Debug, Args, Clone)]
pub struct GraphArgs {
    /// Whitespace-delimited edge list, one `left right` pair per line.
    pub path: PathBuf,

    /// Analyse only the largest connected component.
    #[arg(long)]
    pub largest_component: bool,
}

/// Covering engine selection.
#[derive(Debug, Args, Clone)]
pub struct AlgorithmArgs {
    /// Covering engine.
    #[arg(long, value_enum, default_value_t = Algorithm::Auto)]
    pub algorithm: Algorithm,

    /// Break equal-mass ties at random instead of by lowest vertex id.
    #[arg(long)]
    pub random_ties: bool,

    /// Seed for random tie-breaking and random sequential covering.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

impl AlgorithmArgs {
    /// Maps the flags onto a core covering algorithm.
    #[must_use]
    pub fn covering(&self) -> CoveringAlgorithm {
        let tie_break = if self.random_ties {
            TieBreak::Random { seed: self.seed }
        } else {
            TieBreak::Lowest
        };
        match self.algorithm {
            Algorithm::Naive => CoveringAlgorithm::Naive(tie_break),
            Algorithm::Cached => CoveringAlgorithm::Cached(tie_break),
            Algorithm::Accelerated => CoveringAlgorithm::Accelerated,
            Algorithm::Matrix => CoveringAlgorithm::Matrix(tie_break),
            Algorithm::RandomSequential => CoveringAlgorithm::RandomSequential { seed: self.seed },
            Algorithm::Auto => CoveringAlgorithm::Auto,
        }
    }
}

/// Covering engines exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// Fresh bounded searches every round.
    Naive,
    /// Precomputed neighbourhoods.
    Cached,
    /// Lazy max-heap of excluded masses.
    Accelerated,
    /// Thresholded all-pairs distance matrix.
    Matrix,
    /// Random sequential selection.
    RandomSequential,
    /// Matrix for small dense graphs, accelerated otherwise.
    Auto,
}

/// Options accepted by the `cover` command.
#[derive(Debug, Args, Clone)]
pub struct CoverCommand {
    /// Input graph.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Box diameter `lB`.
    #[arg(long)]
    pub lb: usize,

    /// Covering engine.
    #[command(flatten)]
    pub algorithm: AlgorithmArgs,
}

/// Vertex orders for the colouring covering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Order {
    /// Ascending vertex id.
    Index,
    /// Smallest-last degeneracy order.
    SmallestLast,
}

/// Scaling-curve options shared by `curve` and `classify`.
#[derive(Debug, Args, Clone)]
pub struct CurveArgs {
    /// Smallest box diameter.
    #[arg(long, default_value_t = 2)]
    pub lb_min: usize,

    /// Largest box diameter (defaults to the graph diameter plus one).
    #[arg(long)]
    pub lb_max: Option<usize>,

    /// Vertex order for the colouring covering of even diameters.
    #[arg(long, value_enum, default_value_t = Order::Index)]
    pub order: Order,
}

impl CurveArgs {
    fn config(&self) -> Result<CurveConfig, FractalError> {
        let order = match self.order {
            Order::Index => VertexOrder::Index,
            Order::SmallestLast => VertexOrder::SmallestLast,
        };
        let config = CurveConfig::new().with_lb_min(self.lb_min)?.with_order(order);
        match self.lb_max {
            Some(lb_max) => config.with_lb_max(lb_max),
            None => Ok(config),
        }
    }
}

/// Options accepted by the `curve` command.
#[derive(Debug, Args, Clone)]
pub struct CurveCommand {
    /// Input graph.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Curve range and colouring order.
    #[command(flatten)]
    pub curve: CurveArgs,

    /// Report box counts divided by the vertex count.
    #[arg(long)]
    pub normalise: bool,
}

/// Options accepted by the `classify` command.
#[derive(Debug, Args, Clone)]
pub struct ClassifyCommand {
    /// Input graph.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Treat the input as an `lb,nb` table written by `curve`.
    #[arg(long, conflicts_with = "largest_component")]
    pub table: bool,

    /// Curve range and colouring order.
    #[command(flatten)]
    pub curve: CurveArgs,

    /// Window fractions tried when estimating the dimension.
    #[arg(long = "window-fraction", default_values_t = [1.0])]
    pub window_fractions: Vec<f64>,
}

/// Options accepted by the `renormalise` command.
#[derive(Debug, Args, Clone)]
pub struct RenormaliseCommand {
    /// Input graph.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Box diameter `lB` (at least 3).
    #[arg(long)]
    pub lb: usize,

    /// Covering engine.
    #[command(flatten)]
    pub algorithm: AlgorithmArgs,

    /// Directory receiving per-step box tables and edge lists. Must not
    /// exist yet.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The input edge list could not be parsed.
    #[error("failed to load `{path}`: {source}")]
    EdgeList {
        /// Path of the edge list.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: EdgeListError,
    },
    /// The renormalisation output directory already exists.
    #[error("output directory `{path}` already exists")]
    OutputExists {
        /// The existing directory.
        path: PathBuf,
    },
    /// Core analysis failed.
    #[error(transparent)]
    Core(#[from] FractalError),
}

/// Exit status for failures to read inputs or write artifacts.
pub const EXIT_INPUT: u8 = 2;
/// Exit status for curves that could not be fitted.
pub const EXIT_FIT: u8 = 3;

impl CliError {
    /// Process exit status for this failure.
    ///
    /// Analysis failures exit with 1, unusable inputs or outputs with
    /// [`EXIT_INPUT`], and curves the fitter rejects with [`EXIT_FIT`].
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Io { .. } | Self::EdgeList { .. } | Self::OutputExists { .. } => EXIT_INPUT,
            Self::Core(core) if core.fit_code().is_some() => EXIT_FIT,
            Self::Core(_) => 1,
        }
    }
}

impl From<FitError> for CliError {
    fn from(source: FitError) -> Self {
        Self::Core(FractalError::from(source))
    }
}

/// Centres selected by `cover`, reported by their original labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverSummary {
    /// Covering engine that ran.
    pub algorithm: &'static str,
    /// Box diameter.
    pub lb: usize,
    /// Number of vertices analysed.
    pub vertices: usize,
    /// Number of boxes.
    pub box_count: usize,
    /// Centre labels in selection order.
    pub centres: Vec<i64>,
}

/// Scaling curve measured by `curve`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveSummary {
    /// Number of vertices analysed.
    pub vertices: usize,
    /// Measured `(lB, NB)` points.
    pub curve: ScalingCurve,
    /// `NB / N` per point when normalisation was requested.
    pub normalised: Option<Vec<(usize, f64)>>,
}

/// Vertex counts produced by `renormalise`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenormaliseSummary {
    /// Box diameter.
    pub lb: usize,
    /// Vertex count before the first step and after each step.
    pub vertex_counts: Vec<usize>,
    /// Directory holding the per-step artifacts, if written.
    pub output: Option<PathBuf>,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ExecutionSummary {
    /// Result of `cover`.
    Cover(CoverSummary),
    /// Result of `curve`.
    Curve(CurveSummary),
    /// Result of `classify`.
    Classify(FractalityReport),
    /// Result of `renormalise`.
    Renormalise(RenormaliseSummary),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading or analysis fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use fractanet_cli::cli::{
/// #     AlgorithmArgs, Algorithm, Cli, Command, CoverCommand, ExecutionSummary, GraphArgs, run_cli,
/// # };
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "0 1\n1 2\n2 3\n3 4\n")?;
/// let cli = Cli {
///     json: false,
///     command: Command::Cover(CoverCommand {
///         graph: GraphArgs { path: file.path().to_path_buf(), largest_component: false },
///         lb: 3,
///         algorithm: AlgorithmArgs { algorithm: Algorithm::Accelerated, random_ties: false, seed: 0 },
///     }),
/// };
/// let ExecutionSummary::Cover(summary) = run_cli(cli)? else { unreachable!() };
/// assert_eq!(summary.centres, vec![1, 3]);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Cover(command) => {
            span.record("command", field::display("cover"));
            run_cover(command).map(ExecutionSummary::Cover)
        }
        Command::Curve(command) => {
            span.record("command", field::display("curve"));
            run_curve(command).map(ExecutionSummary::Curve)
        }
        Command::Classify(command) => {
            span.record("command", field::display("classify"));
            run_classify(command).map(ExecutionSummary::Classify)
        }
        Command::Renormalise(command) => {
            span.record("command", field::display("renormalise"));
            run_renormalise(command).map(ExecutionSummary::Renormalise)
        }
    }
}

#[instrument(
    name = "cli.cover",
    err,
    skip(command),
    fields(lb = command.lb, algorithm = field::Empty),
)]
pub(super) fn run_cover(command: CoverCommand) -> Result<CoverSummary, CliError> {
    let loaded = load_graph(&command.graph)?;
    let algorithm = command.algorithm.covering().resolve(loaded.graph());
    Span::current().record("algorithm", field::display(algorithm.name()));

    let centres = algorithm.cover(loaded.graph(), BoxDiameter::new(command.lb)?)?;
    let labels: Vec<i64> = centres
        .iter()
        .filter_map(|centre| loaded.label_of(centre))
        .collect();
    info!(boxes = centres.box_count(), "cover completed");
    Ok(CoverSummary {
        algorithm: algorithm.name(),
        lb: command.lb,
        vertices: loaded.graph().vertex_count(),
        box_count: centres.box_count(),
        centres: labels,
    })
}

#[instrument(name = "cli.curve", err, skip(command), fields(lb_min = command.curve.lb_min))]
pub(super) fn run_curve(command: CurveCommand) -> Result<CurveSummary, CliError> {
    let loaded = load_graph(&command.graph)?;
    let vertices = loaded.graph().vertex_count();
    let curve = scaling_curve(loaded.graph(), &command.curve.config()?)?;
    let normalised = command.normalise.then(|| curve.normalised(vertices));
    info!(points = curve.len(), "curve completed");
    Ok(CurveSummary {
        vertices,
        curve,
        normalised,
    })
}

#[instrument(name = "cli.classify", err, skip(command), fields(table = command.table))]
pub(super) fn run_classify(command: ClassifyCommand) -> Result<FractalityReport, CliError> {
    let curve = if command.table {
        read_curve_table(&command.graph.path)?
    } else {
        let loaded = load_graph(&command.graph)?;
        scaling_curve(loaded.graph(), &command.curve.config()?)?
    };
    let config = ClassifierConfig::new().with_window_fractions(command.window_fractions)?;
    let report = classify(&curve, &config)?;
    info!(is_fractal = report.is_fractal, "classify completed");
    Ok(report)
}

#[instrument(
    name = "cli.renormalise",
    err,
    skip(command),
    fields(lb = command.lb, output = field::Empty),
)]
pub(super) fn run_renormalise(command: RenormaliseCommand) -> Result<RenormaliseSummary, CliError> {
    if let Some(output) = &command.output {
        Span::current().record("output", field::display(output.display()));
        if output.exists() {
            return Err(CliError::OutputExists {
                path: output.clone(),
            });
        }
    }

    let loaded = load_graph(&command.graph)?;
    let flow = Renormaliser::new(command.lb)?
        .with_algorithm(command.algorithm.covering())
        .with_rng_seed(command.algorithm.seed)
        .run(loaded.graph())?;

    if let Some(output) = &command.output {
        fs::create_dir_all(output).map_err(|source| CliError::Io {
            path: output.clone(),
            source,
        })?;
        write_artifact(&output.join("step-000.edges"), |writer| {
            loaded.graph().write_edge_list(writer)
        })?;
        for (index, step) in flow.steps().iter().enumerate() {
            let step_number = index + 1;
            write_artifact(&output.join(format!("step-{step_number:03}.boxes.csv")), |writer| {
                step.assignment().write_table(writer)
            })?;
            write_artifact(&output.join(format!("step-{step_number:03}.edges")), |writer| {
                step.graph().write_edge_list(writer)
            })?;
        }
    }

    info!(steps = flow.len(), "renormalise completed");
    Ok(RenormaliseSummary {
        lb: command.lb,
        vertex_counts: flow.vertex_counts(),
        output: command.output,
    })
}

#[instrument(
    name = "cli.load_graph",
    err,
    skip(args),
    fields(path = %args.path.display(), vertices = field::Empty),
)]
pub(super) fn load_graph(args: &GraphArgs) -> Result<LabelledGraph, CliError> {
    let reader = open_reader(&args.path)?;
    let loaded = parse_edge_list(reader).map_err(|source| CliError::EdgeList {
        path: args.path.clone(),
        source,
    })?;
    let loaded = if args.largest_component {
        loaded.into_largest_component()?
    } else {
        loaded
    };
    Span::current().record("vertices", loaded.graph().vertex_count());
    Ok(loaded)
}

fn read_curve_table(path: &Path) -> Result<ScalingCurve, CliError> {
    ScalingCurve::read_table(open_reader(path)?).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn open_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

fn write_artifact<F>(path: &Path, write: F) -> Result<(), CliError>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    write(&mut writer).map_err(io_error)?;
    writer.flush().map_err(io_error)
}

/// Renders `summary` to `writer`, as JSON when `json` is set and as plain
/// text otherwise.
///
/// # Errors
/// Returns [`io::Error`] if serialisation or writing fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use fractanet_cli::cli::{ExecutionSummary, RenormaliseSummary, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary::Renormalise(RenormaliseSummary {
///     lb: 3,
///     vertex_counts: vec![9, 3, 1],
///     output: None,
/// });
/// let mut buffer = Vec::new();
/// render_summary(&summary, false, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "steps: 2\nvertex counts: 9 3 1\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(
    summary: &ExecutionSummary,
    json: bool,
    mut writer: impl Write,
) -> io::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut writer, summary)?;
        return writeln!(writer);
    }

    match summary {
        ExecutionSummary::Cover(cover) => {
            writeln!(writer, "algorithm: {}", cover.algorithm)?;
            writeln!(writer, "boxes: {}", cover.box_count)?;
            writeln!(writer, "centres: {}", join(&cover.centres))
        }
        ExecutionSummary::Curve(curve) => match &curve.normalised {
            Some(points) => {
                writeln!(writer, "lb,nb")?;
                for (lb, nb) in points {
                    writeln!(writer, "{lb},{nb}")?;
                }
                Ok(())
            }
            None => curve.curve.write_table(writer),
        },
        ExecutionSummary::Classify(report) => {
            writeln!(writer, "fractal: {}", report.is_fractal)?;
            writeln!(writer, "power law r2: {:.6}", report.power_law.r_squared)?;
            writeln!(writer, "exponential r2: {:.6}", report.exponential.r_squared)?;
            match &report.dimension {
                Some(estimate) => writeln!(writer, "dimension: {:.4}", estimate.dimension),
                None => Ok(()),
            }
        }
        ExecutionSummary::Renormalise(renormalise) => {
            writeln!(
                writer,
                "steps: {}",
                renormalise.vertex_counts.len().saturating_sub(1)
            )?;
            writeln!(writer, "vertex counts: {}", join(&renormalise.vertex_counts))
        }
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
