//! Benchmarks for the trim search.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use checkpoint_trim::schedule::ruler::RulerSchedule;
use checkpoint_trim::schedule::{candidate_trims, CacheState, TrimPolicy, Trimmer};

fn bench_optimize(c: &mut Criterion) {
    let trimmer = Trimmer::default();
    let state = CacheState::from_bits(0xfff);

    c.bench_function("optimize_12_resident_budget_5", |b| {
        b.iter(|| {
            let trimmed = trimmer.optimize(5, black_box(state));
            black_box(trimmed).ok();
        })
    });
}

fn bench_sweep_cost(c: &mut Criterion) {
    let trimmer = Trimmer::default();
    // CTZ layout after 48 steps: sparse, long gaps.
    let state = RulerSchedule::new().nth(47).unwrap_or_default();
    let budget = state.resident_count();

    c.bench_function("sweep_cost_ruler_48", |b| {
        b.iter(|| {
            black_box(trimmer.sweep_cost(budget, black_box(state))).ok();
        })
    });
}

fn bench_enumerate(c: &mut Criterion) {
    let state = CacheState::from_bits(0xffff);

    c.bench_function("candidate_trims_16_choose_8", |b| {
        b.iter(|| {
            black_box(candidate_trims(8, black_box(state), TrimPolicy::KeepCurrent));
        })
    });
}

criterion_group!(benches, bench_optimize, bench_sweep_cost, bench_enumerate);
criterion_main!(benches);
