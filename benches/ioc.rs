use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_ioc::*;
use std::sync::Arc;

contract! {
    pub Bench {
        Number => "Bench/Number": u64,
        Payload => "Bench/Payload": Vec<u64>,
        Level0 => "Bench/Level0": u64,
        Level1 => "Bench/Level1": u64,
        Level2 => "Bench/Level2": u64,
        Level3 => "Bench/Level3": u64,
    }
}

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let ioc = Container::<Bench>::new();
    ioc.register_singleton(Number, |_| 42u64);

    c.bench_function("singleton_hit_u64", |b| {
        b.iter(|| {
            let v = ioc.get(Number).unwrap();
            black_box(v);
        })
    });
}

fn bench_transient(c: &mut Criterion) {
    let ioc = Container::<Bench>::new();
    ioc.register(Payload, |_| (0..64).collect::<Vec<u64>>());

    c.bench_function("transient_vec_64", |b| {
        b.iter(|| {
            let v = ioc.get(Payload).unwrap();
            black_box(v.len());
        })
    });
}

fn bench_mock_vs_original(c: &mut Criterion) {
    let mut group = c.benchmark_group("mock_vs_original");

    for enabled in [false, true] {
        let ioc = Container::<Bench>::new();
        let shared = Arc::new(7u64);
        let captured = shared.clone();
        ioc.register(Number, move |_| captured.clone())
            .mock(Number, |_, original| *original + 1)
            .use_mocks(enabled);

        group.bench_with_input(BenchmarkId::from_parameter(enabled), &ioc, |b, ioc| {
            b.iter(|| black_box(ioc.get(Number).unwrap()))
        });
    }

    group.finish();
}

fn bench_dependency_chain(c: &mut Criterion) {
    let ioc = Container::<Bench>::new();
    ioc.register(Level0, |_| 1u64)
        .register(Level1, |c| *c.get_required(Level0) + 1)
        .register(Level2, |c| *c.get_required(Level1) + 1)
        .register(Level3, |c| *c.get_required(Level2) + 1);

    c.bench_function("transient_chain_depth_4", |b| {
        b.iter(|| black_box(ioc.get(Level3).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_singleton_hit,
    bench_transient,
    bench_mock_vs_original,
    bench_dependency_chain
);
criterion_main!(benches);
