//! High-level near-duplicate engine.
//!
//! The engine validates its configuration up front, fingerprints a corpus,
//! builds the candidate index once, and then answers query batches against
//! it. Asking for answers before [`NearDuplicateEngine::index_corpus`] has
//! completed is an [`IndexNotBuilt`](NeardupError::IndexNotBuilt) error.

use std::time::Instant;

use tracing::{info, warn};

use crate::core::config::{CandidateStrategy, NeardupConfig};
use crate::core::errors::{NeardupError, Result};
use crate::detectors::simhash::{
    BandIndex, BandLayout, CandidateSource, DistanceOracle, Fingerprint, FingerprintGenerator,
    PipelineMetrics, Query, QueryEngine,
};

/// Batch near-duplicate detection engine
#[derive(Debug)]
pub struct NearDuplicateEngine {
    config: NeardupConfig,
    layout: BandLayout,
    query_engine: Option<QueryEngine>,
    metrics: PipelineMetrics,
}

impl NearDuplicateEngine {
    /// Create an engine, failing on invalid configuration before any
    /// fingerprint work happens.
    pub fn new(config: NeardupConfig) -> Result<Self> {
        config.validate()?;
        let layout = BandLayout::new(config.lsh.num_bands)?;

        info!(
            hasher = config.fingerprint.hasher.name(),
            bands = layout.num_bands(),
            band_width = layout.band_width(),
            strategy = ?config.lsh.strategy,
            "Initialized near-duplicate engine"
        );

        Ok(Self {
            config,
            layout,
            query_engine: None,
            metrics: PipelineMetrics::new(),
        })
    }

    /// Fingerprint `documents` and build the candidate index.
    ///
    /// The index is build-once: calling this again discards the previous
    /// corpus, fingerprints and distance memo entirely.
    pub fn index_corpus<S>(&mut self, documents: &[Vec<S>]) -> Result<()>
    where
        S: AsRef<str> + Sync,
    {
        if self.query_engine.is_some() {
            warn!("Rebuilding index; previous corpus and distance cache are discarded");
        }
        self.query_engine = None;

        let generator = FingerprintGenerator::new(self.config.fingerprint.hasher);

        let start = Instant::now();
        let fingerprints = generator.generate_corpus(documents, self.config.performance.parallel);
        self.metrics.fingerprint_time = start.elapsed();
        self.metrics.documents = fingerprints.len();
        self.metrics.token_cache = generator.cache_statistics();

        let start = Instant::now();
        let source = match self.config.lsh.strategy {
            CandidateStrategy::Banded => {
                let index = BandIndex::build(&fingerprints, self.layout);
                self.metrics.index = Some(index.statistics().clone());
                CandidateSource::Banded(index)
            }
            CandidateStrategy::Exhaustive => {
                self.metrics.index = None;
                CandidateSource::Exhaustive
            }
        };
        self.metrics.index_build_time = start.elapsed();

        self.query_engine = Some(QueryEngine::new(fingerprints, source, &self.config.query));
        Ok(())
    }

    /// Count documents within distance `k` of `doc_id`
    pub fn count_within(&self, doc_id: usize, k: u32) -> Result<usize> {
        self.built("answer queries")?.count_within(doc_id, k)
    }

    /// Answer queries in input order
    pub fn answer(&mut self, queries: &[Query]) -> Result<Vec<usize>> {
        let start = Instant::now();
        let engine = self.built("answer queries")?;
        let answers = engine.answer_batch(queries)?;
        let distance_cache = engine.distance_statistics();

        self.metrics.query_time += start.elapsed();
        self.metrics.queries += answers.len();
        self.metrics.distance_cache = distance_cache;
        Ok(answers)
    }

    /// Direct oracle distance between two indexed documents
    pub fn distance(&self, a: usize, b: usize) -> Result<u32> {
        let engine = self.built("measure distances")?;
        let left = engine.fingerprint(a)?;
        let right = engine.fingerprint(b)?;
        Ok(engine.oracle().distance(left, right))
    }

    /// Fingerprints of the indexed corpus
    pub fn fingerprints(&self) -> Result<&[Fingerprint]> {
        Ok(self.built("read fingerprints")?.fingerprints())
    }

    /// The band index, when built with the banded strategy
    pub fn band_index(&self) -> Result<Option<&BandIndex>> {
        Ok(match self.built("inspect the band index")?.source() {
            CandidateSource::Banded(index) => Some(index),
            CandidateSource::Exhaustive => None,
        })
    }

    /// Distance oracle of the built index
    pub fn oracle(&self) -> Result<&DistanceOracle> {
        Ok(self.built("measure distances")?.oracle())
    }

    /// Whether [`index_corpus`](Self::index_corpus) has completed
    pub fn is_indexed(&self) -> bool {
        self.query_engine.is_some()
    }

    /// Band geometry
    pub fn layout(&self) -> BandLayout {
        self.layout
    }

    /// Configuration in use
    pub fn config(&self) -> &NeardupConfig {
        &self.config
    }

    /// Metrics collected so far
    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    fn built(&self, operation: &str) -> Result<&QueryEngine> {
        self.query_engine
            .as_ref()
            .ok_or_else(|| NeardupError::index_not_built(operation))
    }
}
