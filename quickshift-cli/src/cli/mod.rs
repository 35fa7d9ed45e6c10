//! Command-line interface orchestration for QuickShift clustering.
//!
//! The `run` command loads points from a Parquet column, a whitespace text
//! matrix, or a synthetic Gaussian blob generator, clusters them, and returns
//! a summary for rendering.

mod commands;

pub use commands::{
    BlobsArgs, Cli, CliError, Command, ExecutionSummary, ExtensionFallbackArg, ExtensionRuleArg,
    ParquetArgs, RunCommand, RunSource, StrategyArg, TextArgs, render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
