//! Command execution logic.
//!
//! Answers and fingerprints go to stdout; status and logs go to stderr.

use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use owo_colors::OwoColorize;
use tracing::{debug, info};

use neardup_rs::core::config::CandidateStrategy;
use neardup_rs::detectors::simhash::FingerprintGenerator;
use neardup_rs::io::answers::{write_answers, write_fingerprints};
use neardup_rs::io::workload::Workload;
use neardup_rs::{NearDuplicateEngine, NeardupConfig};

use crate::cli::args::*;

/// Answer a workload's queries
pub fn run_command(args: RunArgs) -> anyhow::Result<()> {
    let mut config = load_configuration(args.input.config.as_deref())?;
    apply_input_overrides(&mut config, &args.input);
    if let Some(bands) = args.bands {
        config = config.with_bands(bands);
    }
    if args.exhaustive {
        config = config.with_strategy(CandidateStrategy::Exhaustive);
    }

    let mut engine = NearDuplicateEngine::new(config)?;
    let workload = read_workload(args.input.input.as_deref())?;

    engine.index_corpus(&workload.documents)?;
    let answers = engine.answer(&workload.queries)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_answers(&mut out, &workload.queries, &answers, args.format)?;

    if args.metrics {
        engine.metrics().log_summary();
    }
    Ok(())
}

/// Print the fingerprint of every document in a workload
pub fn fingerprint_command(args: FingerprintArgs) -> anyhow::Result<()> {
    let mut config = load_configuration(args.input.config.as_deref())?;
    apply_input_overrides(&mut config, &args.input);
    config.validate()?;

    let workload = read_workload(args.input.input.as_deref())?;
    let generator = FingerprintGenerator::new(config.fingerprint.hasher);
    let fingerprints = generator.generate_corpus(&workload.documents, config.performance.parallel);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_fingerprints(&mut out, &fingerprints, args.format)?;
    Ok(())
}

/// Print default configuration
pub fn print_default_config() -> anyhow::Result<()> {
    let yaml_output = serde_yaml::to_string(&NeardupConfig::default())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "# Default neardup configuration")?;
    writeln!(out, "# Usage: neardup run --config your-config.yml")?;
    write!(out, "{yaml_output}")?;
    out.flush()?;
    Ok(())
}

/// Validate configuration file
pub fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    let config = load_configuration(Some(args.config.as_path()))
        .with_context(|| format!("Configuration validation failed: {}", args.config.display()))?;

    println!(
        "{} {}",
        "Configuration file is valid:".bright_green().bold(),
        args.config.display().to_string().cyan()
    );
    println!("  hasher:   {}", config.fingerprint.hasher.name());
    println!(
        "  bands:    {} x {} bits",
        config.lsh.num_bands,
        config.lsh.band_width(config.fingerprint.width_bits)
    );
    println!("  strategy: {:?}", config.lsh.strategy);
    Ok(())
}

/// Load a configuration file, or the defaults when none is given.
///
/// The loaded configuration is validated before it is returned.
pub fn load_configuration(path: Option<&Path>) -> anyhow::Result<NeardupConfig> {
    let config = match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            NeardupConfig::from_yaml_file(path)?
        }
        None => {
            debug!("Using default configuration");
            NeardupConfig::default()
        }
    };

    config.validate()?;
    Ok(config)
}

fn apply_input_overrides(config: &mut NeardupConfig, input: &InputArgs) {
    if let Some(hasher) = input.hasher {
        config.fingerprint.hasher = hasher;
    }
}

fn read_workload(path: Option<&Path>) -> anyhow::Result<Workload> {
    let workload = match path {
        Some(path) => Workload::from_path(path)?,
        None => Workload::from_reader(io::stdin().lock())
            .context("Failed to read workload from stdin")?,
    };
    Ok(workload)
}
