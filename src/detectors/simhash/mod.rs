//! SimHash fingerprints and LSH banding for near-duplicate detection.
//!
//! The pipeline runs in three phases:
//!
//! 1. [`FingerprintGenerator`] turns each tokenized document into a 128-bit
//!    [`Fingerprint`] by weighted bit voting, memoizing per-token vectors in a
//!    [`TokenSignatureCache`].
//! 2. [`BandIndex`] slices every fingerprint into bands and records, for each
//!    document, the documents that agree with it exactly on some band.
//! 3. [`QueryEngine`] answers "how many documents are within distance `k` of
//!    document `i`" by measuring only those candidates through a memoizing
//!    [`DistanceOracle`].
//!
//! Banding is approximate: near-duplicates that disagree in every band are
//! never measured. Use [`CandidateSource::Exhaustive`] for exact counts on
//! corpora small enough to scan linearly per query.

pub mod distance;
pub mod fingerprint;
pub mod generator;
pub mod hasher;
pub mod index;
pub mod metrics;
pub mod query;
pub mod token_cache;

pub use distance::DistanceOracle;
pub use fingerprint::Fingerprint;
pub use generator::FingerprintGenerator;
pub use hasher::TokenHasher;
pub use index::{BandIndex, BandIndexStatistics, BandLayout, CandidateSet};
pub use metrics::PipelineMetrics;
pub use query::{CandidateSource, Query, QueryEngine};
pub use token_cache::{CacheStatistics, TokenContribution, TokenSignatureCache};

/// Fingerprint width in bits
pub const FINGERPRINT_BITS: usize = 128;
