/*!
# Performance Benchmarks for treedec

Criterion benchmarks over the heuristic engines and the exact atom solvers,
sized so regressions in the hot paths show up without making the suite crawl.
*/

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use treedec::core::cancel::CancelFlag;
use treedec::core::generators::{cycle_graph, erdos_renyi_graph, petersen_graph};
use treedec::exact::{game, pid};
use treedec::heuristics::fast::fast_greedy_decomposition;
use treedec::heuristics::greedy::{GreedyConfig, greedy_order};
use treedec::pipeline::{self, Config};

fn bench_fast_greedy(c: &mut Criterion) {
    let mut group = c.benchmark_group("fast_greedy");
    for size in [100u32, 400, 1000].iter() {
        let graph = erdos_renyi_graph(*size, 4.0 / *size as f64, 42).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &graph, |b, graph| {
            b.iter(|| black_box(fast_greedy_decomposition(graph, None).unwrap()));
        });
    }
    group.finish();
}

fn bench_greedy_fill_in(c: &mut Criterion) {
    use rand::SeedableRng;
    let graph = erdos_renyi_graph(150, 0.05, 42).unwrap();
    c.bench_function("greedy_fill_in_150", |b| {
        b.iter(|| {
            let mut rng = rand::rngs::StdRng::seed_from_u64(42);
            black_box(greedy_order(&graph, &GreedyConfig::default(), &mut rng).unwrap())
        });
    });
}

fn bench_exact_solvers(c: &mut Criterion) {
    let cancel = CancelFlag::new();
    let petersen = petersen_graph();
    c.bench_function("game_petersen", |b| {
        b.iter(|| black_box(game::improve_lower_bound(&petersen, 3, &cancel).unwrap()));
    });
    c.bench_function("pid_petersen", |b| {
        b.iter(|| black_box(pid::pid_exact(&petersen, 3, 9, &cancel).unwrap()));
    });
}

fn bench_exact_pipeline(c: &mut Criterion) {
    let cancel = CancelFlag::new();
    let graph = cycle_graph(64);
    c.bench_function("exact_pipeline_c64", |b| {
        b.iter(|| black_box(pipeline::exact(&graph, &Config::default(), &cancel).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_fast_greedy,
    bench_greedy_fill_in,
    bench_exact_solvers,
    bench_exact_pipeline
);
criterion_main!(benches);
