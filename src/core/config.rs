//! Configuration types and management for neardup-rs.
//!
//! Every value here is fixed at construction time. The candidate index is
//! build-once/query-many, so nothing in the configuration is re-derived or
//! tuned while queries are being answered.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{NeardupError, Result, ResultExt};
use crate::detectors::simhash::hasher::TokenHasher;
use crate::detectors::simhash::FINGERPRINT_BITS;

/// Main configuration for the near-duplicate engine
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NeardupConfig {
    /// Fingerprint generation settings
    #[serde(default)]
    pub fingerprint: FingerprintConfig,

    /// LSH banding settings
    #[serde(default)]
    pub lsh: LshConfig,

    /// Query answering settings
    #[serde(default)]
    pub query: QueryConfig,

    /// Performance settings for the corpus load phase
    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl NeardupConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            NeardupError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            NeardupError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Override the band count
    pub fn with_bands(mut self, num_bands: usize) -> Self {
        self.lsh.num_bands = num_bands;
        self
    }

    /// Override the candidate strategy
    pub fn with_strategy(mut self, strategy: CandidateStrategy) -> Self {
        self.lsh.strategy = strategy;
        self
    }

    /// Override the token hash function
    pub fn with_hasher(mut self, hasher: TokenHasher) -> Self {
        self.fingerprint.hasher = hasher;
        self
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        self.fingerprint.validate()?;
        self.lsh.validate(self.fingerprint.width_bits)?;
        Ok(())
    }
}

/// Fingerprint generation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Fingerprint width in bits; only 128 is supported
    pub width_bits: usize,

    /// Hash function expanding a token to a 128-bit digest
    pub hasher: TokenHasher,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            width_bits: FINGERPRINT_BITS,
            hasher: TokenHasher::default(),
        }
    }
}

impl FingerprintConfig {
    /// Validate fingerprint configuration
    pub fn validate(&self) -> Result<()> {
        if self.width_bits != FINGERPRINT_BITS {
            return Err(NeardupError::config_field(
                format!(
                    "fingerprint width must be {FINGERPRINT_BITS} bits, got {}",
                    self.width_bits
                ),
                "fingerprint.width_bits",
            ));
        }
        Ok(())
    }
}

/// How the query engine chooses which documents to measure
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStrategy {
    /// LSH banding; approximate recall
    #[default]
    Banded,
    /// Every other document is a candidate; exact, O(N) per query
    Exhaustive,
}

/// LSH banding configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LshConfig {
    /// Number of bands; must evenly divide the fingerprint width
    pub num_bands: usize,

    /// Candidate strategy
    pub strategy: CandidateStrategy,
}

impl Default for LshConfig {
    fn default() -> Self {
        Self {
            num_bands: 8,
            strategy: CandidateStrategy::Banded,
        }
    }
}

impl LshConfig {
    /// Validate LSH configuration against the fingerprint width
    pub fn validate(&self, width_bits: usize) -> Result<()> {
        if self.num_bands == 0 {
            return Err(NeardupError::config_field(
                "num_bands must be greater than 0",
                "lsh.num_bands",
            ));
        }

        if width_bits % self.num_bands != 0 {
            return Err(NeardupError::config_field(
                format!(
                    "num_bands ({}) must evenly divide the fingerprint width ({width_bits})",
                    self.num_bands
                ),
                "lsh.num_bands",
            ));
        }

        Ok(())
    }

    /// Bits per band (rows per band in LSH parlance)
    pub fn band_width(&self, width_bits: usize) -> usize {
        width_bits / self.num_bands
    }
}

/// Query answering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QueryConfig {
    /// Stop counting differing bits once the threshold is exceeded
    pub early_termination: bool,

    /// Memoize distances by unordered fingerprint pair
    pub memoize_distances: bool,

    /// Dispatch query batches across the rayon pool
    pub parallel: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            early_termination: true,
            memoize_distances: true,
            parallel: true,
        }
    }
}

/// Corpus load phase configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Fingerprint documents in parallel
    pub parallel: bool,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}
