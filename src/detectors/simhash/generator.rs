//! SimHash fingerprint generation from token sequences.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::features;

use super::fingerprint::Fingerprint;
use super::hasher::TokenHasher;
use super::token_cache::{CacheStatistics, TokenSignatureCache};
use super::FINGERPRINT_BITS;

/// Turns token sequences into fingerprints by term-frequency weighted bit voting.
///
/// The generator owns its [`TokenSignatureCache`]; the cache lives exactly as
/// long as the corpus load phase that uses it.
#[derive(Debug)]
pub struct FingerprintGenerator {
    cache: TokenSignatureCache,
}

impl FingerprintGenerator {
    /// Create a generator using `hasher` for token digests
    pub fn new(hasher: TokenHasher) -> Self {
        Self {
            cache: TokenSignatureCache::new(hasher),
        }
    }

    /// Fingerprint one document.
    ///
    /// Every occurrence of a token votes, so repeated tokens carry repeated
    /// weight. A position whose votes sum to zero yields a 1 bit, which makes
    /// the empty document's fingerprint [`Fingerprint::EMPTY`].
    pub fn generate<S: AsRef<str>>(&self, tokens: &[S]) -> Fingerprint {
        let mut accumulator = [0i32; FINGERPRINT_BITS];
        for token in tokens {
            self.cache
                .contribution(token.as_ref())
                .add_to(&mut accumulator);
        }

        let mut bits = 0u128;
        for (position, &sum) in accumulator.iter().enumerate() {
            if sum >= 0 {
                bits |= 1u128 << position;
            }
        }
        Fingerprint(bits)
    }

    /// Fingerprint a corpus, preserving document order.
    ///
    /// `parallel` only takes effect when the crate is built with the
    /// `parallel` feature.
    pub fn generate_corpus<S>(&self, documents: &[Vec<S>], parallel: bool) -> Vec<Fingerprint>
    where
        S: AsRef<str> + Sync,
    {
        #[cfg(feature = "parallel")]
        let fingerprints: Vec<Fingerprint> = if parallel {
            documents
                .par_iter()
                .map(|doc| self.generate(doc.as_slice()))
                .collect()
        } else {
            self.generate_sequential(documents)
        };

        #[cfg(not(feature = "parallel"))]
        let fingerprints = self.generate_sequential(documents);

        debug!(
            documents = fingerprints.len(),
            distinct_tokens = self.cache.len(),
            parallel = parallel && features::has_parallel(),
            "Generated corpus fingerprints"
        );
        self.cache.log_statistics();
        fingerprints
    }

    fn generate_sequential<S: AsRef<str>>(&self, documents: &[Vec<S>]) -> Vec<Fingerprint> {
        documents
            .iter()
            .map(|doc| self.generate(doc.as_slice()))
            .collect()
    }

    /// Token cache statistics
    pub fn cache_statistics(&self) -> CacheStatistics {
        self.cache.statistics()
    }

    /// Hash function in use
    pub fn hasher(&self) -> TokenHasher {
        self.cache.hasher()
    }
}

impl Default for FingerprintGenerator {
    fn default() -> Self {
        Self::new(TokenHasher::default())
    }
}
