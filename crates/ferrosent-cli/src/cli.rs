//! CLI argument definitions for ferrosent.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `analyze` | Aggregate sentiment for one asset |
//! | `sources` | List text sources and their credential status |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings (including no data) as failures |
//! | `--timeout-ms` | `3000` | Per-request timeout in ms |
//! | `--mock` | `false` | Serve canned upstream payloads offline |
//!
//! # Examples
//!
//! ```bash
//! ferrosent analyze AAPL
//! ferrosent analyze bitcoin --classifier lexicon --format table
//! ferrosent --mock analyze TSLA --pretty
//! ferrosent sources
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use ferrosent_core::{ClassifierKind, DEFAULT_SAMPLE_SIZE};

/// Multi-source sentiment signal for stocks and crypto assets.
///
/// Pulls recent social posts, news headlines, market news and project status
/// updates, classifies a bounded sample, and reports the mean sentiment in
/// [-1.0, 1.0].
#[derive(Debug, Parser)]
#[command(name = "ferrosent", author, version, about = "Multi-source sentiment signal CLI")]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings as failures (exit code 5). A no-data result is a warning.
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Per-request timeout for every upstream call, in milliseconds.
    #[arg(long, global = true, default_value_t = 3000)]
    pub timeout_ms: u64,

    /// Use canned upstream payloads and the lexicon classifier. No network.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    Table,
    /// Single JSON envelope.
    Json,
}

/// Classifier backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClassifierSelector {
    /// FinBERT over the Hugging Face inference API.
    Hosted,
    /// Offline financial word list.
    Lexicon,
}

impl From<ClassifierSelector> for ClassifierKind {
    fn from(selector: ClassifierSelector) -> Self {
        match selector {
            ClassifierSelector::Hosted => Self::Hosted,
            ClassifierSelector::Lexicon => Self::Lexicon,
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the aggregate sentiment for one asset.
    ///
    /// # Examples
    ///
    ///   ferrosent analyze AAPL
    ///   ferrosent analyze "Bitcoin" --sample-size 10
    Analyze(AnalyzeArgs),

    /// List text sources in call order with credential status.
    Sources(SourcesArgs),
}

/// Arguments for the `analyze` command.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Ticker symbol or asset name (e.g., AAPL, bitcoin).
    pub asset: String,

    /// Maximum number of items handed to the classifier.
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Most posts kept from the social search (at most 100).
    #[arg(long, default_value_t = 10)]
    pub max_results: u32,

    /// Classifier backend.
    #[arg(long, value_enum, default_value_t = ClassifierSelector::Hosted)]
    pub classifier: ClassifierSelector,
}

/// Arguments for the `sources` command.
#[derive(Debug, Args)]
pub struct SourcesArgs {
    /// Include the environment variable names each source reads.
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}
