//! CLI command definitions

use clap::{Parser, ValueEnum};
use mos_domain::StrategyKind;
use std::path::PathBuf;

/// Output format for mixture results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the final answer
    Answer,
    /// Candidates, votes, discussion and the final answer
    Full,
    /// JSON report
    Json,
}

impl From<OutputFormat> for mos_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Answer => mos_domain::OutputFormat::Answer,
            OutputFormat::Full => mos_domain::OutputFormat::Full,
            OutputFormat::Json => mos_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for mixture-of-solvers
#[derive(Parser, Debug)]
#[command(name = "mixture-of-solvers")]
#[command(author, version, about = "Ask several solvers, aggregate one answer")]
#[command(long_about = r#"
Mixture of Solvers asks every configured worker the same question and
turns their answers into one:

  vote           voters pick a candidate, plurality wins
  rerank         a reranker orders the candidates, the top one wins
  vote-rerank    voters shortlist, a reranker picks
  generate       a king writes the answer from all candidates
  vote-generate  voters shortlist, a president writes the answer
  discuss        founders discuss for N rounds, a president concludes

Sources are external programs declared in the configuration file:

  [roles]
  workers = ["wiki", "search"]
  voters = ["judge"]

  [sources.wiki]
  command = "wiki-solver"

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./mos.toml          Project-level config
3. ~/.config/mixture-of-solvers/config.toml   Global config

Example:
  mixture-of-solvers "What is the capital of France?"
  mixture-of-solvers --strategy discuss --rounds 2 -o full "Is Pluto a planet?"
"#)]
pub struct Cli {
    /// The question to answer
    pub query: Option<String>,

    /// Language hint passed to every source (e.g. "en-us")
    #[arg(long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Unit system hint passed to every source (e.g. "metric")
    #[arg(long, value_name = "UNITS")]
    pub units: Option<String>,

    /// Aggregation strategy (overrides the config file)
    #[arg(short, long, value_name = "STRATEGY")]
    pub strategy: Option<StrategyKind>,

    /// Discussion rounds for the discuss strategy
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<usize>,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the merged config, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Write every source call of the run to a JSONL file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,
}
