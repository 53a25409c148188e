//! Fitting, scoring and artifact benchmarks.
//!
//! Run with: `cargo bench --package shipeta-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use shipeta_bench::{fitted_forest, forest_config, query_vectors, training_set};
use shipeta_lib::{Artifact, Estimator, ModelConfig, Predictor, train};
use std::hint::black_box;
use std::time::Duration;

fn fit_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(20));

    for samples in [250, 1000, 4000] {
        let set = training_set(samples);
        group.throughput(Throughput::Elements(samples as u64));

        group.bench_with_input(BenchmarkId::new("forest-100", samples), &set, |b, set| {
            b.iter(|| train(&forest_config(100), black_box(set)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("linear", samples), &set, |b, set| {
            b.iter(|| train(&ModelConfig::Linear, black_box(set)).unwrap());
        });
    }

    group.finish();
}

fn predict_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");
    let queries = query_vectors(1000);

    for trees in [10, 100] {
        let predictor = Predictor::new(fitted_forest(trees));

        group.throughput(Throughput::Elements(1));
        group.bench_function(BenchmarkId::new("single", trees), |b| {
            b.iter(|| predictor.predict(black_box(8000.0), black_box(0), black_box(40)));
        });

        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_function(BenchmarkId::new("batch-1000", trees), |b| {
            b.iter(|| {
                queries
                    .iter()
                    .map(|v| predictor.predict_features(black_box(v)))
                    .sum::<f64>()
            });
        });
    }

    group.finish();
}

fn artifact_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("artifact");
    let state = fitted_forest(100);
    let artifact = Artifact::new(state, 1000, Some(42));
    let bytes = artifact.to_bytes().unwrap();
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("encode", |b| b.iter(|| black_box(&artifact).to_bytes().unwrap()));
    group.bench_function("decode", |b| {
        b.iter(|| Artifact::from_bytes(black_box(&bytes)).unwrap());
    });

    let decoded = Artifact::from_bytes(&bytes).unwrap();
    assert_eq!(
        decoded.state.predict_batch(&query_vectors(16)),
        artifact.state.predict_batch(&query_vectors(16))
    );

    group.finish();
}

criterion_group!(benches, fit_benchmark, predict_benchmark, artifact_benchmark);
criterion_main!(benches);
