//! Command-line interface for the `wbt` CLI application.

pub mod constants;

use std::path::PathBuf;

use clap::Parser;

use self::constants::{
    DEFAULT_EXIST_AMOUNT, DEFAULT_GRAPH_FILE, DEFAULT_MISS_AMOUNT, DEFAULT_RECORDS_FILE,
    DEFAULT_REPORT_FILE, DEFAULT_SAMPLES_FILE, WBT_EXIST_AMOUNT, WBT_GENERATOR_CONFIG,
    WBT_GRAPH_OUT, WBT_MISS_AMOUNT, WBT_RECORDS_FILE, WBT_RECORDS_OUT, WBT_REPORT_OUT,
    WBT_SAMPLES_OUT, WBT_SEED,
};

/// Command-line interface definition.
#[derive(Debug, Parser)]
#[command(name = "wbt")]
#[command(about = "Weight-balanced tree commitments over nested records")]
pub struct Cli {
    /// CLI top-level command.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Generate a synthetic record file.
    Generate(GenerateArgs),
    /// Commit to a record file and export the per-node digests.
    Commit(CommitArgs),
    /// Select keys for inclusion and exclusion proof testing.
    Sample(SampleArgs),
    /// Export the tree shape as a Graphviz dot document.
    Graph(GraphArgs),
    /// Generator configuration utilities.
    Config {
        /// Config subcommands.
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Config subcommands.
#[derive(Debug, clap::Subcommand)]
pub enum ConfigCommands {
    /// Print the JSON schema of the generator configuration.
    Schema,
}

/// Arguments for `generate`.
#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    /// Generator configuration JSON file. Defaults apply when omitted.
    #[arg(long, env = WBT_GENERATOR_CONFIG)]
    pub config: Option<PathBuf>,
    /// Records output file.
    #[arg(long, env = WBT_RECORDS_OUT, default_value = DEFAULT_RECORDS_FILE)]
    pub output: PathBuf,
    /// RNG seed for reproducible output.
    #[arg(long, env = WBT_SEED)]
    pub seed: Option<u64>,
}

/// Arguments for `commit`.
#[derive(Debug, clap::Args)]
pub struct CommitArgs {
    /// Records input file.
    #[arg(long, env = WBT_RECORDS_FILE, default_value = DEFAULT_RECORDS_FILE)]
    pub records: PathBuf,
    /// Commitment report output file.
    #[arg(long, env = WBT_REPORT_OUT, default_value = DEFAULT_REPORT_FILE)]
    pub report_out: PathBuf,
}

/// Arguments for `sample`.
#[derive(Debug, clap::Args)]
pub struct SampleArgs {
    /// Records input file.
    #[arg(long, env = WBT_RECORDS_FILE, default_value = DEFAULT_RECORDS_FILE)]
    pub records: PathBuf,
    /// Number of existing keys to select.
    #[arg(long, env = WBT_EXIST_AMOUNT, default_value = DEFAULT_EXIST_AMOUNT)]
    pub exist: usize,
    /// Number of perturbed keys to select.
    #[arg(long, env = WBT_MISS_AMOUNT, default_value = DEFAULT_MISS_AMOUNT)]
    pub miss: usize,
    /// RNG seed for reproducible output.
    #[arg(long, env = WBT_SEED)]
    pub seed: Option<u64>,
    /// Samples output file.
    #[arg(long, env = WBT_SAMPLES_OUT, default_value = DEFAULT_SAMPLES_FILE)]
    pub samples_out: PathBuf,
}

/// Arguments for `graph`.
#[derive(Debug, clap::Args)]
pub struct GraphArgs {
    /// Records input file.
    #[arg(long, env = WBT_RECORDS_FILE, default_value = DEFAULT_RECORDS_FILE)]
    pub records: PathBuf,
    /// Dot document output file.
    #[arg(long, env = WBT_GRAPH_OUT, default_value = DEFAULT_GRAPH_FILE)]
    pub graph_out: PathBuf,
}
