use avl_tree::AvlTreeSet;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeSet;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for a deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 0x9E37_79B9;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Insert Benchmarks ──────────────────────────────────────────────────────

fn bench_insert_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_ordered");

    group.bench_function(BenchmarkId::new("AvlTreeSet", N), |b| {
        b.iter(|| {
            let mut set = AvlTreeSet::new();
            for i in 0..N as i64 {
                set.insert(i);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for i in 0..N as i64 {
                set.insert(i);
            }
            set
        });
    });

    group.finish();
}

fn bench_insert_reverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_reverse");

    group.bench_function(BenchmarkId::new("AvlTreeSet", N), |b| {
        b.iter(|| {
            let mut set = AvlTreeSet::new();
            for i in (0..N as i64).rev() {
                set.insert(i);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for i in (0..N as i64).rev() {
                set.insert(i);
            }
            set
        });
    });

    group.finish();
}

fn bench_insert_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("insert_random");

    group.bench_function(BenchmarkId::new("AvlTreeSet", N), |b| {
        b.iter(|| {
            let mut set = AvlTreeSet::new();
            for &k in &keys {
                set.insert(k);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &k in &keys {
                set.insert(k);
            }
            set
        });
    });

    group.finish();
}

// ─── Lookup Benchmarks ──────────────────────────────────────────────────────

fn bench_contains_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let avl_set: AvlTreeSet<i64> = keys.iter().copied().collect();
    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();

    let mut group = c.benchmark_group("contains_random");

    group.bench_function(BenchmarkId::new("AvlTreeSet", N), |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for k in &keys {
                if avl_set.contains(k) {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for k in &keys {
                if bt_set.contains(k) {
                    hits += 1;
                }
            }
            hits
        });
    });

    group.finish();
}

// ─── Removal Benchmarks ─────────────────────────────────────────────────────

fn bench_remove_ordered(c: &mut Criterion) {
    let keys = ordered_keys(N);
    let avl_set: AvlTreeSet<i64> = keys.iter().copied().collect();
    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();

    let mut group = c.benchmark_group("remove_ordered");

    group.bench_function(BenchmarkId::new("AvlTreeSet", N), |b| {
        b.iter(|| {
            let mut set = avl_set.clone();
            for k in &keys {
                set.remove(k);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = bt_set.clone();
            for k in &keys {
                set.remove(k);
            }
            set
        });
    });

    group.finish();
}

// ─── Iteration Benchmarks ───────────────────────────────────────────────────

fn bench_iter(c: &mut Criterion) {
    let keys = random_keys(N);
    let avl_set: AvlTreeSet<i64> = keys.iter().copied().collect();
    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();

    let mut group = c.benchmark_group("iter");

    group.bench_function(BenchmarkId::new("AvlTreeSet", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for &v in avl_set.iter() {
                sum = sum.wrapping_add(v);
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for &v in bt_set.iter() {
                sum = sum.wrapping_add(v);
            }
            sum
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_ordered,
    bench_insert_reverse,
    bench_insert_random,
    bench_contains_random,
    bench_remove_ordered,
    bench_iter,
);
criterion_main!(benches);
