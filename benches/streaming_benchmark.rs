#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmarks for the streaming primitives.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trip_analytics::prelude::*;

fn synthetic_speeds(size: usize) -> Vec<f64> {
    // Deterministic bell-ish curve with periodic spikes
    (0..size)
        .map(|i| {
            let x = i as f64 / size as f64;
            (x * std::f64::consts::TAU).sin() * 8.0 + 25.0 + (i % 17) as f64 * 0.3
        })
        .collect()
}

fn median_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("median");

    for size in [1_000, 10_000, 100_000] {
        let data = synthetic_speeds(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut calc = MedianCalculator::new();
                for &v in &data {
                    calc.add(black_box(v)).unwrap();
                }
                calc.get_median().unwrap()
            });
        });
    }

    group.finish();
}

fn top_k_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("top_k");

    for size in [1_000, 10_000, 100_000] {
        let items: Vec<u32> = (0..size).map(|i| (i * 2_654_435_761u64 % 997) as u32).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut topk = TopKFrequent::new(10).unwrap();
                for &item in &items {
                    topk.add(black_box(item));
                }
                topk.get_top_k()
            });
        });
    }

    group.finish();
}

fn anomaly_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("anomaly");

    for mode in [StatisticsMode::Running, StatisticsMode::SlidingWindow] {
        let data = synthetic_speeds(100_000);
        group.bench_with_input(BenchmarkId::new("100k", format!("{mode:?}")), &mode, |b, &mode| {
            b.iter(|| {
                let mut detector = AnomalyDetector::default().with_statistics(mode);
                data.iter().filter(|&&v| detector.add(black_box(v)).unwrap()).count()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, median_benchmark, top_k_benchmark, anomaly_benchmark);
criterion_main!(benches);
