//! Schedule database benchmarks
//!
//! Rough targets for a traffic node serving a mid-size fleet:
//! - insert: >100K ops/sec
//! - catch-up query over 1K heads: >1K ops/sec

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use corridor_core::{Duration, Query, Time, Trajectory, Waypoint};
use corridor_engine::{Database, DatabaseConfig};
use std::sync::atomic::{AtomicU64, Ordering};

fn span(start_secs: u64, finish_secs: u64) -> Trajectory {
    let mut t = Trajectory::new();
    t.insert(Waypoint::new(Time::from_secs(start_secs), [0.0, 0.0, 0.0]));
    t.insert(Waypoint::new(Time::from_secs(finish_secs), [1.0, 0.0, 0.0]));
    t
}

/// Benchmark trajectory insertion
fn bench_insert(c: &mut Criterion) {
    let db = Database::with_config(DatabaseConfig {
        expected_entries: 1 << 20,
        ..DatabaseConfig::default()
    });

    let mut group = c.benchmark_group("schedule");
    group.throughput(Throughput::Elements(1));

    let counter = AtomicU64::new(0);
    group.bench_function("insert", |b| {
        b.iter(|| {
            let i = counter.fetch_add(1, Ordering::SeqCst);
            db.insert(span(i, i + 10)).unwrap()
        })
    });
    group.finish();
}

/// Benchmark delay revisions on a single long-lived lineage
///
/// A zero-length shift keeps the head's extent fixed, so the lineage can
/// grow unboundedly without the `from` instant ever drifting out of range.
fn bench_delay(c: &mut Criterion) {
    let db = Database::new();
    let head = AtomicU64::new(db.insert(span(0, 10)).unwrap());

    let mut group = c.benchmark_group("schedule");
    group.throughput(Throughput::Elements(1));

    group.bench_function("delay", |b| {
        b.iter(|| {
            let prior = head.load(Ordering::SeqCst);
            let next = db
                .delay(prior, Time::from_secs(5), Duration::ZERO)
                .unwrap();
            head.store(next, Ordering::SeqCst);
            next
        })
    });
    group.finish();
}

/// Benchmark a fresh snapshot query over 1K active heads
fn bench_fresh_query(c: &mut Criterion) {
    let db = Database::new();
    for i in 0..1000 {
        db.insert(span(i, i + 10)).unwrap();
    }

    let mut group = c.benchmark_group("schedule");
    group.throughput(Throughput::Elements(1000));

    let query = Query::all();
    group.bench_function("changes/fresh_1k_heads", |b| {
        b.iter(|| db.changes(&query))
    });
    group.finish();
}

/// Benchmark the caught-up fast path: cursor at the latest version
fn bench_caught_up_query(c: &mut Criterion) {
    let db = Database::new();
    for i in 0..1000 {
        db.insert(span(i, i + 10)).unwrap();
    }

    let mut group = c.benchmark_group("schedule");
    group.throughput(Throughput::Elements(1));

    let query = Query::all().after(db.latest_version());
    group.bench_function("changes/caught_up_1k_heads", |b| {
        b.iter(|| db.changes(&query))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_delay,
    bench_fresh_query,
    bench_caught_up_query
);
criterion_main!(benches);
