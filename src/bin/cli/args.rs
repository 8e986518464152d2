//! CLI argument structures for the `neardup` binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use neardup_rs::detectors::simhash::TokenHasher;
use neardup_rs::io::answers::OutputFormat;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// SimHash near-duplicate detection over tokenized documents
#[derive(Parser)]
#[command(name = "neardup")]
#[command(version = VERSION)]
#[command(about = "Count near-duplicate documents by SimHash Hamming distance")]
#[command(long_about = "
Fingerprint a batch of whitespace-tokenized documents with 128-bit SimHash,
bucket them with LSH bands, and answer `<doc_id> <k>` queries with the number
of other documents within Hamming distance k.

Input format (stdin by default):

  N
  <document 0>
  ...
  <document N-1>
  Q
  <doc_id> <k>
  ...

Common Usage:

  # Answer the queries in a workload file
  neardup run --input workload.txt

  # Exact counts without banding
  neardup run --exhaustive < workload.txt

  # Print document fingerprints as hex
  neardup fingerprint --input workload.txt
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fingerprint a workload and answer its queries
    Run(RunArgs),

    /// Print one fingerprint per document
    Fingerprint(FingerprintArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Validate a neardup configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

/// Where the workload comes from and which configuration applies
#[derive(Args)]
pub struct InputArgs {
    /// Workload file (defaults to stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Token hash function, overriding the configuration
    #[arg(long, value_enum)]
    pub hasher: Option<TokenHasher>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Number of LSH bands; must divide 128
    #[arg(short, long)]
    pub bands: Option<usize>,

    /// Compare every document pair instead of band candidates
    #[arg(long)]
    pub exhaustive: bool,

    /// Output format for answers
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Log pipeline timings and cache statistics when done
    #[arg(long)]
    pub metrics: bool,
}

#[derive(Args)]
pub struct FingerprintArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format for fingerprints
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Path to configuration file to validate
    #[arg(short, long, required = true)]
    pub config: PathBuf,
}
