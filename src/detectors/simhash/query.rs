//! Threshold queries over an indexed corpus.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::QueryConfig;
use crate::core::errors::{NeardupError, Result};
use crate::features;

use super::distance::DistanceOracle;
use super::fingerprint::Fingerprint;
use super::index::BandIndex;
use super::token_cache::CacheStatistics;
use super::FINGERPRINT_BITS;

const MAX_THRESHOLD: i128 = FINGERPRINT_BITS as i128;

/// "How many other documents are within Hamming distance `threshold` of
/// document `doc_id`?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    /// Target document (0-based, input order)
    pub doc_id: usize,
    /// Maximum Hamming distance, inclusive
    pub threshold: u32,
}

impl Query {
    /// Create a query
    pub fn new(doc_id: usize, threshold: u32) -> Self {
        Self { doc_id, threshold }
    }

    /// Build a query from raw signed values, rejecting negatives.
    ///
    /// Thresholds above the fingerprint width saturate to it: every
    /// distance is at most 128, so they all mean "any document".
    pub fn from_signed(doc_id: i128, threshold: i128) -> Result<Self> {
        let doc_id =
            usize::try_from(doc_id).map_err(|_| NeardupError::unaddressable_index(doc_id))?;
        if threshold < 0 {
            return Err(NeardupError::validation_mismatch(
                "query threshold must be a non-negative integer",
                "threshold",
                "0..",
                threshold.to_string(),
            ));
        }
        let threshold = u32::try_from(threshold.min(MAX_THRESHOLD)).unwrap_or(u32::MAX);
        Ok(Self { doc_id, threshold })
    }
}

/// Where a query's candidate documents come from.
#[derive(Debug, Clone)]
pub enum CandidateSource {
    /// Documents sharing at least one LSH band with the target
    Banded(BandIndex),
    /// Every other document in the corpus
    Exhaustive,
}

impl CandidateSource {
    /// Short name for logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            Self::Banded(_) => "banded",
            Self::Exhaustive => "exhaustive",
        }
    }
}

/// Answers threshold queries against a fully built candidate source.
///
/// Holding a `QueryEngine` means construction has finished: the engine can
/// only be created from an already-built [`CandidateSource`]. Queries never
/// mutate the fingerprints or the index; the only side effect is populating
/// the distance memo.
#[derive(Debug)]
pub struct QueryEngine {
    fingerprints: Vec<Fingerprint>,
    source: CandidateSource,
    oracle: DistanceOracle,
    parallel: bool,
}

impl QueryEngine {
    /// Create a query engine over `fingerprints`
    pub fn new(
        fingerprints: Vec<Fingerprint>,
        source: CandidateSource,
        config: &QueryConfig,
    ) -> Self {
        Self {
            fingerprints,
            source,
            oracle: DistanceOracle::with_options(
                config.memoize_distances,
                config.early_termination,
            ),
            parallel: config.parallel && features::has_parallel(),
        }
    }

    /// Count candidates of `doc_id` within distance `k`, excluding `doc_id` itself.
    pub fn count_within(&self, doc_id: usize, k: u32) -> Result<usize> {
        let target = self.fingerprint(doc_id)?;

        let count = match &self.source {
            CandidateSource::Banded(index) => match index.candidates(doc_id) {
                None => 0,
                Some(candidates) => candidates
                    .iter()
                    .filter(|&&peer| peer != doc_id)
                    .filter(|&&peer| self.oracle.within(target, self.fingerprints[peer], k))
                    .count(),
            },
            CandidateSource::Exhaustive => self
                .fingerprints
                .iter()
                .enumerate()
                .filter(|&(peer, &other)| peer != doc_id && self.oracle.within(target, other, k))
                .count(),
        };

        Ok(count)
    }

    /// Answer a single structured query
    pub fn answer(&self, query: Query) -> Result<usize> {
        self.count_within(query.doc_id, query.threshold)
    }

    /// Answer queries in input order.
    ///
    /// Fails with the first error encountered; no partial answers are returned.
    pub fn answer_batch(&self, queries: &[Query]) -> Result<Vec<usize>> {
        #[cfg(feature = "parallel")]
        let answers = if self.parallel {
            queries
                .par_iter()
                .map(|&query| self.answer(query))
                .collect::<Result<Vec<_>>>()?
        } else {
            self.answer_sequential(queries)?
        };

        #[cfg(not(feature = "parallel"))]
        let answers = self.answer_sequential(queries)?;

        debug!(
            queries = queries.len(),
            source = self.source.name(),
            parallel = self.parallel,
            "Answered query batch"
        );
        Ok(answers)
    }

    fn answer_sequential(&self, queries: &[Query]) -> Result<Vec<usize>> {
        queries.iter().map(|&query| self.answer(query)).collect()
    }

    /// Fingerprint of `doc_id`
    pub fn fingerprint(&self, doc_id: usize) -> Result<Fingerprint> {
        self.fingerprints.get(doc_id).copied().ok_or_else(|| {
            NeardupError::out_of_range(
                i128::try_from(doc_id).unwrap_or(i128::MAX),
                self.fingerprints.len(),
            )
        })
    }

    /// Candidates that would be measured for `doc_id`
    pub fn candidate_count(&self, doc_id: usize) -> Result<usize> {
        self.fingerprint(doc_id)?;
        Ok(match &self.source {
            CandidateSource::Banded(index) => index.candidates(doc_id).map_or(0, |set| set.len()),
            CandidateSource::Exhaustive => self.fingerprints.len() - 1,
        })
    }

    /// All fingerprints, by document id
    pub fn fingerprints(&self) -> &[Fingerprint] {
        &self.fingerprints
    }

    /// Candidate source in use
    pub fn source(&self) -> &CandidateSource {
        &self.source
    }

    /// Distance oracle (for direct distance lookups)
    pub fn oracle(&self) -> &DistanceOracle {
        &self.oracle
    }

    /// Distance memo statistics
    pub fn distance_statistics(&self) -> CacheStatistics {
        self.oracle.statistics()
    }
}
