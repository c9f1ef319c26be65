//! CLI argument definitions for the `canon` driver.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use canon_map::MatchStrategy;

#[derive(Parser)]
#[command(
    name = "canon",
    version,
    about = "Map heterogeneous tabular data onto canonical schemas",
    long_about = "Map heterogeneous tabular data onto canonical schemas.\n\n\
                  Detects the domain of each batch, matches raw headers (Korean or\n\
                  English, any naming style) to schema columns, converts values,\n\
                  derives computed fields and reports a quality score."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow row values in trace-level log events.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize JSON or CSV files onto their detected schemas.
    Normalize(NormalizeArgs),

    /// Print the domain type detected for a label.
    Detect(DetectArgs),

    /// List the registered schemas.
    Schemas(CatalogArgs),

    /// Match raw column names against one schema and print the scores.
    Match(MatchArgs),
}

/// Alternate catalog files.
#[derive(Parser, Default)]
pub struct CatalogArgs {
    /// Schema catalog JSON to use instead of the built-in one.
    #[arg(long = "schemas", value_name = "PATH")]
    pub schemas: Option<PathBuf>,

    /// Lexicon JSON to use instead of the built-in one.
    #[arg(long = "lexicon", value_name = "PATH")]
    pub lexicon: Option<PathBuf>,
}

/// Matcher tuning shared by `normalize` and `match`.
#[derive(Parser)]
pub struct MatchingArgs {
    /// Assignment strategy for fuzzy matches.
    #[arg(long = "strategy", value_enum, default_value = "greedy")]
    pub strategy: StrategyArg,

    /// Minimum similarity for a fuzzy match, in [0, 1].
    ///
    /// A schema's own min_match_score takes precedence.
    #[arg(long = "threshold", value_name = "T")]
    pub threshold: Option<f64>,
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// Input files (.json arrays of objects, or .csv with a header line).
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Label used for domain detection (default: each file's stem).
    #[arg(long = "label", value_name = "LABEL")]
    pub label: Option<String>,

    /// Directory for `<stem>.normalized.json` outputs.
    #[arg(long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Maximum validation messages kept per batch.
    #[arg(long = "max-errors", value_name = "N")]
    pub max_errors: Option<usize>,

    #[command(flatten)]
    pub matching: MatchingArgs,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

#[derive(Parser)]
pub struct DetectArgs {
    /// Free-text label, typically a file name.
    #[arg(value_name = "LABEL")]
    pub label: String,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

#[derive(Parser)]
pub struct MatchArgs {
    /// Schema type to match against, e.g. customer_dim.
    #[arg(long = "schema", value_name = "TYPE")]
    pub schema: String,

    /// Raw column names.
    #[arg(value_name = "COLUMN", required = true)]
    pub columns: Vec<String>,

    /// Show the score breakdown for every accepted mapping.
    #[arg(long = "explain")]
    pub explain: bool,

    #[command(flatten)]
    pub matching: MatchingArgs,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Greedy,
    #[value(alias = "hungarian")]
    Optimal,
}

impl From<StrategyArg> for MatchStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Greedy => MatchStrategy::Greedy,
            StrategyArg::Optimal => MatchStrategy::Optimal,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_normalize_flags() {
        let cli = Cli::try_parse_from([
            "canon",
            "normalize",
            "a.csv",
            "b.json",
            "--strategy",
            "hungarian",
            "--threshold",
            "0.2",
            "--output",
            "out",
        ])
        .unwrap();
        let Command::Normalize(args) = cli.command else {
            panic!("expected normalize");
        };
        assert_eq!(args.files.len(), 2);
        assert!(matches!(args.matching.strategy, StrategyArg::Optimal));
        assert_eq!(args.matching.threshold, Some(0.2));
    }

    #[test]
    fn match_requires_schema() {
        assert!(Cli::try_parse_from(["canon", "match", "고객ID"]).is_err());
    }
}
