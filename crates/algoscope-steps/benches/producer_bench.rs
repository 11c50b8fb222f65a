//! Benchmarks for Algoscope step producers
//!
//! Measures the cost of draining a full run for each algorithm at several
//! input sizes, including the per-step array snapshot.

use algoscope_steps::Algorithm;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic pseudo-random input in the same 5..=99 band the visualizer uses.
fn input(len: usize) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    (0..len).map(|_| rng.gen_range(5..=99)).collect()
}

/// Drain every algorithm to completion
fn bench_drain(c: &mut Criterion) {
    for algorithm in Algorithm::ALL {
        let mut group = c.benchmark_group(format!("drain_{algorithm}"));
        for &len in &[5usize, 30, 100] {
            let data = input(len);
            let target = data[len / 2];
            group.throughput(Throughput::Elements(len as u64));
            group.bench_with_input(BenchmarkId::from_parameter(len), &data, |b, data| {
                b.iter(|| algorithm.producer(black_box(data), target).count())
            });
        }
        group.finish();
    }
}

/// Cost of pulling a single step from a fresh producer
fn bench_first_step(c: &mut Criterion) {
    let data = input(100);
    c.bench_function("first_step_merge_100", |b| {
        b.iter(|| Algorithm::Merge.producer(black_box(&data), 0).next())
    });
}

criterion_group!(benches, bench_drain, bench_first_step);
criterion_main!(benches);
