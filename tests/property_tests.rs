//! Property tests for fingerprints, distances and band candidates

use proptest::prelude::*;

use neardup_rs::core::config::QueryConfig;
use neardup_rs::detectors::simhash::{
    BandIndex, BandLayout, CandidateSource, DistanceOracle, Fingerprint, FingerprintGenerator,
    QueryEngine,
};

const BAND_COUNTS: [usize; 8] = [1, 2, 4, 8, 16, 32, 64, 128];

fn document() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]{1,3}", 0..12)
}

fn corpus() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(document(), 1..16)
}

fn fingerprint() -> impl Strategy<Value = Fingerprint> {
    any::<u128>().prop_map(Fingerprint)
}

proptest! {
    /// Property: distance is symmetric and zero on the diagonal
    #[test]
    fn prop_distance_symmetric(a in document(), b in document()) {
        let generator = FingerprintGenerator::default();
        let oracle = DistanceOracle::new();
        let fa = generator.generate(&a);
        let fb = generator.generate(&b);

        prop_assert_eq!(oracle.distance(fa, fb), oracle.distance(fb, fa));
        prop_assert_eq!(oracle.distance(fa, fa), 0);
        prop_assert!(oracle.distance(fa, fb) <= 128);
    }

    /// Property: fingerprints are deterministic and independent of token order
    #[test]
    fn prop_generate_deterministic(doc in document()) {
        let first = FingerprintGenerator::default().generate(&doc);
        let second = FingerprintGenerator::default().generate(&doc);
        prop_assert_eq!(first, second);

        let mut reversed = doc.clone();
        reversed.reverse();
        prop_assert_eq!(first, FingerprintGenerator::default().generate(&reversed));
    }

    /// Property: early termination agrees with the full count
    #[test]
    fn prop_bounded_distance_agrees(a in fingerprint(), b in fingerprint(), limit in 0u32..=128) {
        let full = DistanceOracle::with_options(false, false).distance(a, b);
        let bounded = DistanceOracle::new().bounded_distance(a, b, limit);

        if full <= limit {
            prop_assert_eq!(bounded, Some(full));
        } else {
            prop_assert_eq!(bounded, None);
        }
    }

    /// Property: candidacy is symmetric and implies agreement on some band
    #[test]
    fn prop_candidates_symmetric(docs in corpus(), band_choice in 0usize..BAND_COUNTS.len()) {
        let fingerprints = FingerprintGenerator::default().generate_corpus(&docs, false);
        let layout = BandLayout::new(BAND_COUNTS[band_choice]).unwrap();
        let index = BandIndex::build(&fingerprints, layout);

        for a in 0..fingerprints.len() {
            for b in 0..fingerprints.len() {
                let shares_band = a != b
                    && (0..layout.num_bands()).any(|band| {
                        layout.band_value(fingerprints[a], band)
                            == layout.band_value(fingerprints[b], band)
                    });
                prop_assert_eq!(index.are_candidates(a, b), shares_band);
                prop_assert_eq!(index.are_candidates(a, b), index.are_candidates(b, a));
            }
        }
    }

    /// Property: answers never decrease as the threshold grows
    #[test]
    fn prop_count_monotonic_in_threshold(docs in corpus(), doc_choice in any::<prop::sample::Index>()) {
        let fingerprints = FingerprintGenerator::default().generate_corpus(&docs, false);
        let index = BandIndex::build(&fingerprints, BandLayout::new(8).unwrap());
        let engine = QueryEngine::new(
            fingerprints,
            CandidateSource::Banded(index),
            &QueryConfig::default(),
        );
        let doc = doc_choice.index(docs.len());

        let mut previous = 0;
        for k in 0..=128 {
            let count = engine.count_within(doc, k).unwrap();
            prop_assert!(count >= previous);
            prop_assert!(count < docs.len());
            previous = count;
        }
    }

    /// Property: parallel and sequential corpus fingerprinting agree
    #[test]
    fn prop_parallel_matches_sequential(docs in corpus()) {
        let generator = FingerprintGenerator::default();
        prop_assert_eq!(
            generator.generate_corpus(&docs, true),
            generator.generate_corpus(&docs, false)
        );
    }
}
