//! Thread-safe memoization of per-token contribution vectors.
//!
//! Hashing a token and expanding it into 128 signed weights is the dominant
//! per-token cost of fingerprinting. Short-text corpora repeat tokens heavily,
//! so each distinct token is expanded exactly once and shared read-only by
//! every document that contains it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;

use super::hasher::TokenHasher;
use super::FINGERPRINT_BITS;

/// A token's ±1 vote at each of the 128 bit positions.
///
/// Position `b` is `+1` when bit `b` (significance, LSB = 0) of the token
/// digest is set and `-1` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenContribution {
    weights: [i8; FINGERPRINT_BITS],
}

impl TokenContribution {
    /// Expand a 128-bit digest into per-position votes
    pub fn from_digest(digest: u128) -> Self {
        let mut weights = [-1i8; FINGERPRINT_BITS];
        for (bit, weight) in weights.iter_mut().enumerate() {
            if (digest >> bit) & 1 == 1 {
                *weight = 1;
            }
        }
        Self { weights }
    }

    /// All votes, indexed by bit position
    pub fn weights(&self) -> &[i8; FINGERPRINT_BITS] {
        &self.weights
    }

    /// Add this contribution element-wise into an accumulator
    #[inline]
    pub fn add_to(&self, accumulator: &mut [i32; FINGERPRINT_BITS]) {
        for (acc, &weight) in accumulator.iter_mut().zip(self.weights.iter()) {
            *acc += i32::from(weight);
        }
    }
}

/// Cache performance statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatistics {
    /// Lookups answered from the cache
    pub hits: usize,
    /// Lookups that computed a new entry
    pub misses: usize,
    /// Entries currently stored
    pub entries: usize,
}

impl CacheStatistics {
    /// Fraction of lookups answered from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl Serialize for CacheStatistics {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("CacheStatistics", 4)?;
        state.serialize_field("hits", &self.hits)?;
        state.serialize_field("misses", &self.misses)?;
        state.serialize_field("entries", &self.entries)?;
        state.serialize_field("hit_rate", &self.hit_rate())?;
        state.end()
    }
}

/// Token to contribution cache, keyed by exact string equality.
///
/// Entries are never evicted or replaced: the first writer for a token wins
/// and every later reader sees that same immutable vector.
#[derive(Debug)]
pub struct TokenSignatureCache {
    hasher: TokenHasher,
    entries: DashMap<String, Arc<TokenContribution>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl TokenSignatureCache {
    /// Create an empty cache for the given hash function
    pub fn new(hasher: TokenHasher) -> Self {
        Self {
            hasher,
            entries: DashMap::with_capacity(1024),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Hash function backing this cache
    pub fn hasher(&self) -> TokenHasher {
        self.hasher
    }

    /// Contribution vector for `token`, computing and storing it on first use
    pub fn contribution(&self, token: &str) -> Arc<TokenContribution> {
        if let Some(existing) = self.entries.get(token) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(existing.value());
        }

        let computed = Arc::new(TokenContribution::from_digest(self.hasher.digest(token)));
        // Another thread may have inserted the same token in the meantime; keep theirs.
        let stored = self
            .entries
            .entry(token.to_owned())
            .or_insert(computed)
            .value()
            .clone();
        self.misses.fetch_add(1, Ordering::Relaxed);
        stored
    }

    /// Number of distinct tokens seen
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no token has been cached yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of hit/miss counters
    pub fn statistics(&self) -> CacheStatistics {
        CacheStatistics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }

    /// Log cache statistics at debug level
    pub fn log_statistics(&self) {
        let stats = self.statistics();
        debug!(
            hasher = self.hasher.name(),
            entries = stats.entries,
            hits = stats.hits,
            misses = stats.misses,
            "Token signature cache: {:.2}% hit rate",
            stats.hit_rate() * 100.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contribution_matches_digest_bits() {
        let digest: u128 = 0b1011;
        let contribution = TokenContribution::from_digest(digest);

        assert_eq!(contribution.weights()[..4], [1, 1, -1, 1]);
        assert!(contribution.weights()[4..].iter().all(|&w| w == -1));
    }

    #[test]
    fn test_all_weights_are_unit() {
        let contribution = TokenContribution::from_digest(TokenHasher::Xxh3.digest("unit"));
        assert!(contribution.weights().iter().all(|&w| w == 1 || w == -1));
    }

    #[test]
    fn test_add_to_accumulates() {
        let contribution = TokenContribution::from_digest(u128::MAX);
        let mut acc = [0i32; FINGERPRINT_BITS];
        contribution.add_to(&mut acc);
        contribution.add_to(&mut acc);
        assert!(acc.iter().all(|&v| v == 2));
    }

    #[test]
    fn test_cache_memoizes_by_token() {
        let cache = TokenSignatureCache::new(TokenHasher::Xxh3);
        assert!(cache.is_empty());

        let first = cache.contribution("alpha");
        let second = cache.contribution("alpha");
        assert!(Arc::ptr_eq(&first, &second));

        cache.contribution("beta");
        let stats = cache.statistics();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert!((stats.hit_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_cached_value_equals_fresh_computation() {
        let cache = TokenSignatureCache::new(TokenHasher::Sha256);
        let cached = cache.contribution("gamma");
        let fresh = TokenContribution::from_digest(TokenHasher::Sha256.digest("gamma"));
        assert_eq!(*cached, fresh);
    }

    #[test]
    fn test_zero_lookups_hit_rate() {
        assert_eq!(CacheStatistics::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_concurrent_lookups_share_entries() {
        use rayon::prelude::*;

        let cache = TokenSignatureCache::new(TokenHasher::Xxh3);
        let tokens: Vec<String> = (0..400).map(|i| format!("tok{}", i % 20)).collect();
        tokens.par_iter().for_each(|t| {
            cache.contribution(t);
        });

        let stats = cache.statistics();
        assert_eq!(stats.entries, 20);
        assert_eq!(stats.hits + stats.misses, 400);
    }
}
