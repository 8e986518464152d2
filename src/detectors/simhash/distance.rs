//! Memoized Hamming distance between fingerprints.
//!
//! Corpora of short texts produce many identical fingerprints, so the same
//! fingerprint pair is measured again and again across queries. The oracle
//! keys its memo by the unordered *value* pair rather than by document ids,
//! which lets identical fingerprints share one entry.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use super::fingerprint::Fingerprint;
use super::token_cache::CacheStatistics;

/// Hamming distance oracle with a concurrent, never-invalidated memo.
#[derive(Debug)]
pub struct DistanceOracle {
    memo: Option<DashMap<(u128, u128), u32>>,
    early_termination: bool,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl DistanceOracle {
    /// Create an oracle with memoization and early termination enabled
    pub fn new() -> Self {
        Self::with_options(true, true)
    }

    /// Create an oracle with explicit options
    pub fn with_options(memoize: bool, early_termination: bool) -> Self {
        Self {
            memo: memoize.then(DashMap::new),
            early_termination,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Number of differing bits, in `0..=128`
    pub fn distance(&self, a: Fingerprint, b: Fingerprint) -> u32 {
        let key = pair_key(a, b);
        if let Some(cached) = self.lookup(key) {
            return cached;
        }

        let distance = a.hamming_distance(b);
        self.store(key, distance);
        distance
    }

    /// Distance if it is at most `limit`, `None` otherwise.
    ///
    /// Counts the high word before the low word and gives up as soon as the
    /// running total exceeds `limit`. Only completed counts are memoized.
    pub fn bounded_distance(&self, a: Fingerprint, b: Fingerprint, limit: u32) -> Option<u32> {
        let key = pair_key(a, b);
        if let Some(cached) = self.lookup(key) {
            return (cached <= limit).then_some(cached);
        }

        let diff = a.bits() ^ b.bits();
        let high = ((diff >> 64) as u64).count_ones();
        if high > limit {
            return None;
        }

        let distance = high + (diff as u64).count_ones();
        self.store(key, distance);
        (distance <= limit).then_some(distance)
    }

    /// Whether the two fingerprints are within distance `k`
    pub fn within(&self, a: Fingerprint, b: Fingerprint, k: u32) -> bool {
        if self.early_termination {
            self.bounded_distance(a, b, k).is_some()
        } else {
            self.distance(a, b) <= k
        }
    }

    /// Memo statistics (all zero when memoization is disabled)
    pub fn statistics(&self) -> CacheStatistics {
        CacheStatistics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.memo.as_ref().map_or(0, |memo| memo.len()),
        }
    }

    fn lookup(&self, key: (u128, u128)) -> Option<u32> {
        let memo = self.memo.as_ref()?;
        match memo.get(&key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(*entry)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn store(&self, key: (u128, u128), distance: u32) {
        if let Some(memo) = &self.memo {
            memo.insert(key, distance);
        }
    }
}

impl Default for DistanceOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn pair_key(a: Fingerprint, b: Fingerprint) -> (u128, u128) {
    if a <= b {
        (a.bits(), b.bits())
    } else {
        (b.bits(), a.bits())
    }
}
