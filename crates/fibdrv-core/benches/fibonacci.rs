//! Criterion benchmarks for Fibonacci algorithms.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use fibdrv_bignum::{Bignum, SystemAllocator};
use fibdrv_core::calculator::CoreCalculator;
use fibdrv_core::fastdoubling::FastDoubling;
use fibdrv_core::iterative::IterativeAddition;
use fibdrv_core::options::Options;

fn compute(calc: &dyn CoreCalculator, n: u64, opts: &Options) -> Bignum {
    calc.calculate_core(n, opts, &SystemAllocator::shared())
        .unwrap()
}

fn bench_algorithms(c: &mut Criterion) {
    let fast = FastDoubling::new();
    let iterative = IterativeAddition::new();
    let opts = Options::default().normalize();

    let ns: Vec<u64> = vec![100, 1_000, 10_000, 100_000];

    let mut group = c.benchmark_group("FastDoubling");
    for &n in &ns {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| compute(&fast, n, &opts));
        });
    }
    group.finish();

    let mut group = c.benchmark_group("IterativeAddition");
    for &n in &ns[..3] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| compute(&iterative, n, &opts));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_algorithms);
criterion_main!(benches);
