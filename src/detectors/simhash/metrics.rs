//! Pipeline timings and cache statistics.

use std::time::Duration;

use serde::Serialize;
use tracing::info;

use super::index::BandIndexStatistics;
use super::token_cache::CacheStatistics;

/// Performance metrics for one indexing + query run
#[derive(Debug, Default, Clone, Serialize)]
pub struct PipelineMetrics {
    /// Time spent generating fingerprints
    pub fingerprint_time: Duration,
    /// Time spent building the candidate index
    pub index_build_time: Duration,
    /// Time spent answering queries
    pub query_time: Duration,
    /// Documents fingerprinted
    pub documents: usize,
    /// Queries answered
    pub queries: usize,
    /// Token signature cache statistics
    pub token_cache: CacheStatistics,
    /// Distance memo statistics
    pub distance_cache: CacheStatistics,
    /// Band index statistics (absent for exhaustive search)
    pub index: Option<BandIndexStatistics>,
}

impl PipelineMetrics {
    /// Create new metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Log performance summary
    pub fn log_summary(&self) {
        info!("Near-duplicate pipeline summary:");
        info!("  Fingerprinting: {:?} ({} documents)", self.fingerprint_time, self.documents);
        info!("  Index build: {:?}", self.index_build_time);
        info!("  Queries: {:?} ({} answered)", self.query_time, self.queries);
        info!(
            "  Token cache: {} distinct tokens, {:.2}% hit rate",
            self.token_cache.entries,
            self.token_cache.hit_rate() * 100.0
        );
        if self.distance_cache.hits + self.distance_cache.misses > 0 {
            info!(
                "  Distance cache: {} pairs, {:.2}% hit rate",
                self.distance_cache.entries,
                self.distance_cache.hit_rate() * 100.0
            );
        }
        if let Some(index) = &self.index {
            info!(
                "  Candidates: {} pairs across {} documents ({} bands x {} bits)",
                index.candidate_pairs,
                index.documents_with_candidates,
                index.num_bands,
                index.band_width
            );
        }

        if let Some(avg_query_time) = self.average_query_time() {
            info!("  Average query time: {:?}", avg_query_time);
        }
    }

    /// Mean time per answered query, `None` before any query
    pub fn average_query_time(&self) -> Option<Duration> {
        if self.queries == 0 {
            return None;
        }
        Some(self.query_time.div_f64(self.queries as f64))
    }
}
