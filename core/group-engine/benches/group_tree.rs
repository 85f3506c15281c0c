//! FILENAME: core/group-engine/benches/group_tree.rs
//! Build and aggregate throughput at growing row counts.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use group_engine::{AggregationMode, AggregationPolicy, GroupSort, GroupSpec, GroupTree, SortOrder, TreeRow};
use model::Record;

fn create_positions(size: usize) -> Vec<Record> {
    let desks = ["rates", "credit", "fx", "equity"];
    let ccys = ["USD", "EUR", "GBP", "JPY", "CHF"];
    (0..size)
        .map(|i| {
            Record::new()
                .with("pos", i.to_string())
                .with("desk", desks[i % desks.len()])
                .with("inst", format!("INST{}", i % 250))
                .with("ccy", ccys[i % ccys.len()])
                .with("pv", (i % 1000) as f64 + 0.25)
                .with("qty", (i % 37) as f64)
        })
        .collect()
}

fn policy() -> AggregationPolicy {
    AggregationPolicy::new()
        .with("qty", AggregationMode::Sum)
        .with("pv", AggregationMode::PreciseSum)
        .with("ccy", AggregationMode::EqualOrBlank)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_tree_build");
    for size in [1_000, 10_000, 100_000] {
        let rows = create_positions(size);
        let spec = GroupSpec::new(vec!["desk".into(), "inst".into()], "pos");
        group.bench_with_input(BenchmarkId::new("two_keys", size), &size, |b, _| {
            b.iter(|| GroupTree::build(black_box(&rows), spec.clone()))
        });
    }
    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_tree_aggregate");
    group.sample_size(20);
    let policy = policy();
    let sort = GroupSort::new("pv", SortOrder::Descending);
    let compare = |a: &TreeRow, b: &TreeRow| sort.compare(a, b);

    for size in [1_000, 10_000, 100_000] {
        let rows = create_positions(size);
        let spec = GroupSpec::new(vec!["desk".into(), "inst".into()], "pos");
        let Ok(tree) = GroupTree::build(&rows, spec) else {
            continue;
        };

        group.bench_with_input(BenchmarkId::new("unsorted", size), &size, |b, _| {
            b.iter(|| black_box(tree.clone()).aggregate(&policy, None))
        });
        group.bench_with_input(BenchmarkId::new("sorted", size), &size, |b, _| {
            b.iter(|| black_box(tree.clone()).aggregate(&policy, Some(&compare)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_aggregate);
criterion_main!(benches);
