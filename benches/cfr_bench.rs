//! Benchmarks for CFR solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use leduc_solver::cfr::{BestResponse, CFRConfig, CFRSolver, StrategyProfile};

fn leduc_iteration_benchmark(c: &mut Criterion) {
    let mut solver = CFRSolver::new(CFRConfig::default());

    c.bench_function("leduc_single_iteration", |b| {
        b.iter(|| {
            solver.run_iteration();
            black_box(solver.iteration())
        })
    });
}

fn leduc_parallel_iteration_benchmark(c: &mut Criterion) {
    let mut solver = CFRSolver::new(CFRConfig::default().with_parallel(true));

    c.bench_function("leduc_parallel_iteration", |b| {
        b.iter(|| {
            solver.run_iteration();
            black_box(solver.iteration())
        })
    });
}

fn leduc_100_iterations_benchmark(c: &mut Criterion) {
    c.bench_function("leduc_100_iterations", |b| {
        b.iter(|| {
            let mut solver = CFRSolver::new(CFRConfig::default());
            solver.train(black_box(100)).iterations
        })
    });
}

fn best_response_benchmark(c: &mut Criterion) {
    let mut solver = CFRSolver::new(CFRConfig::default());
    solver.train(200);
    let profile = solver.average_strategy();

    c.bench_function("leduc_best_response", |b| {
        b.iter(|| {
            let mut br = BestResponse::new(profile.clone());
            black_box(br.compute(0).ok())
        })
    });

    c.bench_function("leduc_uniform_best_response", |b| {
        b.iter(|| {
            let mut br = BestResponse::new(StrategyProfile::uniform());
            black_box(br.compute(1).ok())
        })
    });
}

criterion_group!(
    benches,
    leduc_iteration_benchmark,
    leduc_parallel_iteration_benchmark,
    leduc_100_iterations_benchmark,
    best_response_benchmark
);
criterion_main!(benches);
