//! Command implementations and argument parsing for the `quickshift` CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use quickshift_core::{
    ClusteringResult, ClusteringStrategy, DEFAULT_SAMPLING_SEED, DEFAULT_SCALED_THRESHOLD, Dataset,
    ExtensionFallback, ExtensionRule, QuickShift, QuickShiftBuilder, QuickShiftError,
};
use quickshift_providers_dense::{
    DenseIngestError, GaussianBlobs, load_parquet_reader, load_text_matrix,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "quickshift", about = "Cluster dense points by QuickShift mode seeking.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cluster a dataset and print one label per point.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Fixed neighbourhood size; derived from the dataset size when omitted.
    #[arg(long)]
    pub neighbours: Option<usize>,

    /// Clustering path.
    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    pub strategy: StrategyArg,

    /// Dataset size from which `auto` switches to the sampled path.
    #[arg(long = "scaled-threshold", default_value_t = DEFAULT_SCALED_THRESHOLD)]
    pub scaled_threshold: usize,

    /// Seed for the sampled path's random sample.
    #[arg(long, default_value_t = DEFAULT_SAMPLING_SEED)]
    pub seed: u64,

    /// How unsampled points choose the sample point they inherit from.
    #[arg(long = "extension-rule", value_enum, default_value_t = ExtensionRuleArg::Densest)]
    pub extension_rule: ExtensionRuleArg,

    /// What to do when an unsampled point has no denser sample neighbour.
    #[arg(long = "extension-fallback", value_enum, default_value_t = ExtensionFallbackArg::Fail)]
    pub extension_fallback: ExtensionFallbackArg,

    /// Data source configuration.
    #[command(subcommand)]
    pub source: RunSource,
}

impl Default for RunCommand {
    fn default() -> Self {
        Self {
            neighbours: None,
            strategy: StrategyArg::Auto,
            scaled_threshold: DEFAULT_SCALED_THRESHOLD,
            seed: DEFAULT_SAMPLING_SEED,
            extension_rule: ExtensionRuleArg::Densest,
            extension_fallback: ExtensionFallbackArg::Fail,
            source: RunSource::Blobs(BlobsArgs::default()),
        }
    }
}

/// `--strategy` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Exact below the scaled threshold, sampled at or above it.
    Auto,
    /// Always exact.
    Exact,
    /// Always sampled.
    Scaled,
}

impl From<StrategyArg> for ClusteringStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Auto => Self::Auto,
            StrategyArg::Exact => Self::Exact,
            StrategyArg::Scaled => Self::Scaled,
        }
    }
}

/// `--extension-rule` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtensionRuleArg {
    /// Inherit from the densest denser sample neighbour.
    Densest,
    /// Inherit from the nearest denser sample neighbour.
    NearestDenser,
}

impl From<ExtensionRuleArg> for ExtensionRule {
    fn from(value: ExtensionRuleArg) -> Self {
        match value {
            ExtensionRuleArg::Densest => Self::DensestNeighbour,
            ExtensionRuleArg::NearestDenser => Self::NearestDenserNeighbour,
        }
    }
}

/// `--extension-fallback` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtensionFallbackArg {
    /// Abort the run.
    Fail,
    /// Inherit from the nearest sample point regardless of density.
    NearestSample,
}

impl From<ExtensionFallbackArg> for ExtensionFallback {
    fn from(value: ExtensionFallbackArg) -> Self {
        match value {
            ExtensionFallbackArg::Fail => Self::Fail,
            ExtensionFallbackArg::NearestSample => Self::NearestSample,
        }
    }
}

/// Input data sources.
#[derive(Debug, Subcommand, Clone)]
pub enum RunSource {
    /// Read a Parquet file containing a `FixedSizeList<Float32, D>` column.
    Parquet(ParquetArgs),
    /// Read a whitespace-separated text matrix, one point per line.
    Text(TextArgs),
    /// Generate isotropic Gaussian blobs around `(-90, -90)` and `(0, 0)`.
    Blobs(BlobsArgs),
}

/// Parquet ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct ParquetArgs {
    /// Path to the Parquet file containing feature vectors.
    pub path: PathBuf,

    /// Column containing `FixedSizeList<Float32, D>` rows.
    #[arg(long)]
    pub column: String,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Text matrix arguments.
#[derive(Debug, Args, Clone)]
pub struct TextArgs {
    /// Path to the text matrix.
    pub path: PathBuf,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Synthetic blob arguments.
#[derive(Debug, Args, Clone, PartialEq)]
pub struct BlobsArgs {
    /// Points generated per blob.
    #[arg(long = "per-blob", default_value_t = 5_000)]
    pub per_blob: usize,

    /// Per-coordinate standard deviation.
    #[arg(long = "std-dev", default_value_t = 5.0)]
    pub std_dev: f32,

    /// Generator seed.
    #[arg(long = "blob-seed", default_value_t = 0)]
    pub blob_seed: u64,
}

impl Default for BlobsArgs {
    fn default() -> Self {
        Self {
            per_blob: 5_000,
            std_dev: 5.0,
            blob_seed: 0,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Loading or generating points failed.
    #[error(transparent)]
    Dense(#[from] DenseIngestError),
    /// Configuring or running the clustering failed.
    #[error(transparent)]
    Core(#[from] QuickShiftError),
}

/// Outcome of a `run` command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name of the clustered dataset.
    pub data_source: String,
    /// One cluster per point, in input order.
    pub result: ClusteringResult,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading or clustering fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use quickshift_cli::cli::{Cli, Command, RunCommand, RunSource, StrategyArg, TextArgs, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "0 0\n0.5 0\n9 9\n9.5 9\n")?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         neighbours: Some(1),
///         strategy: StrategyArg::Exact,
///         source: RunSource::Text(TextArgs {
///             path: file.path().to_path_buf(),
///             name: None,
///         }),
///         ..RunCommand::default()
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.result.assignments().len(), 4);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(strategy = ?command.strategy, source = field::Empty),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let quickshift = configure(&command)?;

    let span = Span::current();
    let dataset = match command.source {
        RunSource::Parquet(args) => {
            span.record("source", field::display("parquet"));
            load_parquet(args)?
        }
        RunSource::Text(args) => {
            span.record("source", field::display("text"));
            load_text(args)?
        }
        RunSource::Blobs(args) => {
            span.record("source", field::display("blobs"));
            generate_blobs(&args)?
        }
    };

    let result = quickshift.run(&dataset)?;
    info!(
        data_source = dataset.name(),
        items = dataset.len(),
        clusters = result.cluster_count(),
        "command completed"
    );
    Ok(ExecutionSummary {
        data_source: dataset.name().to_owned(),
        result,
    })
}

pub(super) fn configure(command: &RunCommand) -> Result<QuickShift, QuickShiftError> {
    let builder = QuickShiftBuilder::new()
        .with_strategy(command.strategy.into())
        .with_scaled_threshold(command.scaled_threshold)
        .with_seed(command.seed)
        .with_extension_rule(command.extension_rule.into())
        .with_extension_fallback(command.extension_fallback.into());
    let builder = match command.neighbours {
        Some(neighbours) => builder.with_neighbours(neighbours),
        None => builder,
    };
    builder.build()
}

#[instrument(
    name = "cli.load_parquet",
    err,
    skip(args),
    fields(path = %args.path.display(), column = %args.column),
)]
pub(super) fn load_parquet(args: ParquetArgs) -> Result<Dataset, CliError> {
    let ParquetArgs { path, column, name } = args;
    let chosen_name = derive_data_source_name(&path, name.as_deref());
    let file = File::open(&path).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(load_parquet_reader(chosen_name, file, &column)?)
}

#[instrument(
    name = "cli.load_text",
    err,
    skip(args),
    fields(path = %args.path.display()),
)]
pub(super) fn load_text(args: TextArgs) -> Result<Dataset, CliError> {
    let TextArgs { path, name } = args;
    let chosen_name = derive_data_source_name(&path, name.as_deref());
    let reader = open_text_reader(&path)?;
    Ok(load_text_matrix(chosen_name, reader)?)
}

#[instrument(
    name = "cli.generate_blobs",
    err,
    skip(args),
    fields(per_blob = args.per_blob, std_dev = args.std_dev, seed = args.blob_seed),
)]
pub(super) fn generate_blobs(args: &BlobsArgs) -> Result<Dataset, CliError> {
    let blobs = GaussianBlobs::default()
        .with_per_blob(args.per_blob)
        .with_std_dev(args.std_dev)
        .with_seed(args.blob_seed)
        .generate()?;
    Ok(blobs.dataset)
}

#[instrument(name = "cli.open_text_reader", err, fields(path = %path.display()))]
pub(super) fn open_text_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "data_source".to_owned(), ToOwned::to_owned)
}

/// Renders `summary` as `data source`, `clusters`, then one
/// `index<TAB>cluster` line per point.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use quickshift_cli::cli::{ExecutionSummary, render_summary};
/// # use quickshift_core::ClusteringResult;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     data_source: "demo".into(),
///     result: ClusteringResult::from_labels(vec![0, 1])?,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "data source: demo\nclusters: 2\n0\t0\n1\t1\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(writer, "clusters: {}", summary.result.cluster_count())?;
    for (index, cluster) in summary.result.assignments().iter().enumerate() {
        writeln!(writer, "{index}\t{}", cluster.get())?;
    }
    Ok(())
}
