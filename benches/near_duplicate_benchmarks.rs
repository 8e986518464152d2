//! Near-duplicate pipeline benchmarks
//!
//! 1. Fingerprint generation, sequential vs parallel
//! 2. Band index construction across band counts
//! 3. Banded vs exhaustive query answering

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use neardup_rs::core::config::{CandidateStrategy, QueryConfig};
use neardup_rs::detectors::simhash::{
    BandIndex, BandLayout, CandidateSource, FingerprintGenerator, Query, QueryEngine,
};
use neardup_rs::{NearDuplicateEngine, NeardupConfig};

/// Generate a corpus where every fifth document repeats an earlier one with one edit
fn generate_corpus(count: usize) -> Vec<Vec<String>> {
    let vocabulary: Vec<String> = (0..500).map(|i| format!("w{i}")).collect();

    let mut docs: Vec<Vec<String>> = Vec::with_capacity(count);
    for i in 0..count {
        if i % 5 == 4 {
            let mut edited = docs[i - 1].clone();
            edited[0] = format!("edit{i}");
            docs.push(edited);
            continue;
        }
        let doc = (0..24)
            .map(|j| vocabulary[(i * 31 + j * 17) % vocabulary.len()].clone())
            .collect();
        docs.push(doc);
    }
    docs
}

fn benchmark_fingerprinting(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprinting");

    for &count in &[1_000, 10_000] {
        let docs = generate_corpus(count);

        for parallel in [false, true] {
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, count), &docs, |b, docs| {
                b.iter(|| {
                    let generator = FingerprintGenerator::default();
                    black_box(generator.generate_corpus(docs, parallel))
                })
            });
        }
    }

    group.finish();
}

fn benchmark_band_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("band_index_build");
    group.measurement_time(Duration::from_secs(10));

    let docs = generate_corpus(10_000);
    let fingerprints = FingerprintGenerator::default().generate_corpus(&docs, true);

    for &bands in &[4, 8, 16, 32] {
        let Ok(layout) = BandLayout::new(bands) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(bands), &layout, |b, &layout| {
            b.iter(|| black_box(BandIndex::build(&fingerprints, layout)))
        });
    }

    group.finish();
}

fn benchmark_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");

    let docs = generate_corpus(5_000);
    let fingerprints = FingerprintGenerator::default().generate_corpus(&docs, true);
    let queries: Vec<Query> = (0..docs.len()).step_by(10).map(|doc| Query::new(doc, 10)).collect();

    let Ok(layout) = BandLayout::new(8) else {
        return;
    };
    let sources = [
        ("banded", CandidateSource::Banded(BandIndex::build(&fingerprints, layout))),
        ("exhaustive", CandidateSource::Exhaustive),
    ];

    for (label, source) in sources {
        // Fresh engine per iteration so the distance memo starts cold.
        group.bench_function(label, |b| {
            b.iter(|| {
                let engine =
                    QueryEngine::new(fingerprints.clone(), source.clone(), &QueryConfig::default());
                black_box(engine.answer_batch(&queries))
            })
        });
    }

    group.finish();
}

fn benchmark_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");

    let docs = generate_corpus(2_000);
    let queries: Vec<Query> = (0..docs.len()).map(|doc| Query::new(doc, 3)).collect();

    for strategy in [CandidateStrategy::Banded, CandidateStrategy::Exhaustive] {
        group.bench_function(format!("{strategy:?}"), |b| {
            b.iter(|| {
                let config = NeardupConfig::default().with_strategy(strategy);
                let Ok(mut engine) = NearDuplicateEngine::new(config) else {
                    return;
                };
                if engine.index_corpus(&docs).is_ok() {
                    black_box(engine.answer(&queries).ok());
                }
            })
        });
    }

    group.finish();
}

criterion_group!(
    near_duplicate_benches,
    benchmark_fingerprinting,
    benchmark_band_index,
    benchmark_queries,
    benchmark_end_to_end
);

criterion_main!(near_duplicate_benches);
