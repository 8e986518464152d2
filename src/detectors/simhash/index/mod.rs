//! LSH band index over 128-bit fingerprints.
//!
//! The fingerprint is cut into `B` contiguous, non-overlapping bands of
//! `R = 128 / B` bits each; band `i` covers bit positions `[i·R, (i+1)·R)`.
//! Two documents become candidates of each other when they agree exactly on
//! at least one band.
//!
//! This is approximate. Two fingerprints at Hamming distance `d` are missed
//! whenever each of the `B` bands contains at least one of the `d` differing
//! bits, so pairs within a query threshold can be absent from the candidate
//! sets.

use std::collections::{HashMap, HashSet};

use ahash::RandomState;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::errors::{NeardupError, Result};

use super::fingerprint::Fingerprint;
use super::FINGERPRINT_BITS;


/// Candidate set of one document
pub type CandidateSet = HashSet<usize, RandomState>;

/// Validated band geometry: `num_bands * band_width == 128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandLayout {
    num_bands: usize,
    band_width: usize,
}

impl BandLayout {
    /// Layout with `num_bands` equal bands.
    ///
    /// Fails with a configuration error unless `num_bands` evenly divides the
    /// fingerprint width; bands are never truncated or padded.
    pub fn new(num_bands: usize) -> Result<Self> {
        if num_bands == 0 || FINGERPRINT_BITS % num_bands != 0 {
            return Err(NeardupError::config_field(
                format!(
                    "band count {num_bands} does not evenly divide the {FINGERPRINT_BITS}-bit fingerprint"
                ),
                "lsh.num_bands",
            ));
        }

        Ok(Self {
            num_bands,
            band_width: FINGERPRINT_BITS / num_bands,
        })
    }

    /// Number of bands (B)
    pub fn num_bands(&self) -> usize {
        self.num_bands
    }

    /// Bits per band (R)
    pub fn band_width(&self) -> usize {
        self.band_width
    }

    /// Sub-value of `fingerprint` in band `band`
    #[inline]
    pub fn band_value(&self, fingerprint: Fingerprint, band: usize) -> u128 {
        fingerprint.slice(band * self.band_width, self.band_width)
    }
}

/// Summary of a built index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandIndexStatistics {
    /// Documents indexed
    pub documents: usize,
    /// Bands (B)
    pub num_bands: usize,
    /// Bits per band (R)
    pub band_width: usize,
    /// Buckets with two or more members, summed over all bands
    pub shared_buckets: usize,
    /// Largest bucket seen in any band
    pub largest_bucket: usize,
    /// Distinct unordered candidate pairs
    pub candidate_pairs: usize,
    /// Documents with a non-empty candidate set
    pub documents_with_candidates: usize,
}

/// Build-once, read-only candidate index.
#[derive(Debug, Clone)]
pub struct BandIndex {
    layout: BandLayout,
    candidates: Vec<CandidateSet>,
    statistics: BandIndexStatistics,
}

impl BandIndex {
    /// Build candidate sets for `fingerprints` (indexed by document id).
    ///
    /// Each band is bucketed independently, in parallel with the `parallel`
    /// feature. Candidate pairs are only emitted once a band's buckets are
    /// complete. Buckets are dropped when construction finishes.
    pub fn build(fingerprints: &[Fingerprint], layout: BandLayout) -> Self {
        #[cfg(feature = "parallel")]
        let band_groups: Vec<Vec<Vec<usize>>> = (0..layout.num_bands())
            .into_par_iter()
            .map(|band| Self::shared_buckets(fingerprints, layout, band))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let band_groups: Vec<Vec<Vec<usize>>> = (0..layout.num_bands())
            .map(|band| Self::shared_buckets(fingerprints, layout, band))
            .collect();

        let mut candidates: Vec<CandidateSet> = vec![CandidateSet::default(); fingerprints.len()];
        let mut shared_buckets = 0;
        let mut largest_bucket = 0;

        for (band, groups) in band_groups.iter().enumerate() {
            debug!(band, shared_buckets = groups.len(), "Bucketed band");
            shared_buckets += groups.len();
            for members in groups {
                largest_bucket = largest_bucket.max(members.len());
                for (pos, &left) in members.iter().enumerate() {
                    for &right in &members[pos + 1..] {
                        candidates[left].insert(right);
                        candidates[right].insert(left);
                    }
                }
            }
        }

        let pair_endpoints: usize = candidates.iter().map(HashSet::len).sum();
        let statistics = BandIndexStatistics {
            documents: fingerprints.len(),
            num_bands: layout.num_bands(),
            band_width: layout.band_width(),
            shared_buckets,
            largest_bucket,
            candidate_pairs: pair_endpoints / 2,
            documents_with_candidates: candidates.iter().filter(|set| !set.is_empty()).count(),
        };

        info!(
            documents = statistics.documents,
            bands = statistics.num_bands,
            band_width = statistics.band_width,
            candidate_pairs = statistics.candidate_pairs,
            largest_bucket = statistics.largest_bucket,
            "Built LSH band index"
        );

        Self {
            layout,
            candidates,
            statistics,
        }
    }

    /// Buckets of band `band` holding at least two documents, members in
    /// ascending document order.
    fn shared_buckets(
        fingerprints: &[Fingerprint],
        layout: BandLayout,
        band: usize,
    ) -> Vec<Vec<usize>> {
        let mut buckets: HashMap<u128, Vec<usize>, RandomState> =
            HashMap::with_capacity_and_hasher(fingerprints.len(), RandomState::new());
        for (doc, &fingerprint) in fingerprints.iter().enumerate() {
            buckets
                .entry(layout.band_value(fingerprint, band))
                .or_default()
                .push(doc);
        }

        buckets
            .into_values()
            .filter(|members| members.len() > 1)
            .collect()
    }

    /// Candidates of `doc`, or `None` if it shared no bucket (or is not indexed)
    pub fn candidates(&self, doc: usize) -> Option<&CandidateSet> {
        self.candidates.get(doc).filter(|set| !set.is_empty())
    }

    /// Whether `a` and `b` shared at least one bucket
    pub fn are_candidates(&self, a: usize, b: usize) -> bool {
        self.candidates(a).is_some_and(|set| set.contains(&b))
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the index holds no documents
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Band geometry
    pub fn layout(&self) -> BandLayout {
        self.layout
    }

    /// Construction statistics
    pub fn statistics(&self) -> &BandIndexStatistics {
        &self.statistics
    }
}
