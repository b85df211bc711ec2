use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "scguard",
    version,
    about = "Pre-deployment risk gate for smart contracts"
)]
pub struct Args {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the feature vector of a fact document as JSON
    Features {
        /// Path to the contract fact document (.json)
        facts_path: PathBuf,

        /// Extract each concrete contract separately
        #[arg(long)]
        per_contract: bool,

        /// Write output to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Score a fact document and decide ALLOW / WARN / BLOCK
    Assess(AssessArgs),
}

#[derive(Debug, clap::Args)]
pub struct AssessArgs {
    /// Path to the contract fact document (.json)
    pub facts_path: PathBuf,

    /// Classifier output: `{ "<category>": <probability>, ... }`
    #[arg(long)]
    pub probabilities: PathBuf,

    /// Classifier feature importance: `{ "<feature>": <weight>, ... }`
    #[arg(long)]
    pub importance: Option<PathBuf>,

    /// Policy profile (.toml); defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Optional git commit hash for tool metadata
    #[arg(long)]
    pub commit: Option<String>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
