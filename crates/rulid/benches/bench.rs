use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::StdRng};
use rulid::{
    Entropy, LockedMonotonic, MonotonicEntropy, OsRandom, PooledMonotonic, RandSource, Result,
    RngAdapter, ThreadRandom, Ulid, base32,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

const FIXED_MS: u64 = 1_508_808_576_371;

const VECTOR_TEXT: &str = "01BX5ZZKBKACTAV9WEVGEMMVRZ";

/// Shared monotonic sources under test.
trait SharedSource: Send + Sync {
    fn next(&self, ms: u64) -> Result<Ulid>;
}

impl<R: RandSource + Send> SharedSource for LockedMonotonic<R> {
    fn next(&self, ms: u64) -> Result<Ulid> {
        self.next_ulid(ms)
    }
}

impl<R, F> SharedSource for PooledMonotonic<R, F>
where
    R: RandSource + Send,
    F: Fn() -> R + Send + Sync,
{
    fn next(&self, ms: u64) -> Result<Ulid> {
        self.next_ulid(ms)
    }
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Elements(1));

    let id = Ulid::parse_strict(VECTOR_TEXT).unwrap_or_default();
    let mut text = [0_u8; 26];
    let mut bytes = [0_u8; 16];

    group.bench_function("encode", |b| {
        b.iter(|| black_box(base32::encode(black_box(id.as_bytes()))));
    });
    group.bench_function("encode_to_buf", |b| {
        b.iter(|| black_box(id).encode_to_buf(&mut text));
    });
    group.bench_function("to_string", |b| {
        b.iter(|| black_box(id).to_string());
    });
    group.bench_function("write_bytes", |b| {
        b.iter(|| black_box(id).write_bytes(&mut bytes));
    });
    group.bench_function("parse", |b| {
        b.iter(|| Ulid::parse(black_box(VECTOR_TEXT)));
    });
    group.bench_function("parse_strict", |b| {
        b.iter(|| Ulid::parse_strict(black_box(VECTOR_TEXT)));
    });

    group.finish();
}

/// Benchmarks `Ulid::new` over a plain random source built by `source_fn`.
fn bench_random<R: RandSource>(c: &mut Criterion, group_name: &str, source_fn: impl Fn() -> R) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let mut rng = source_fn();
                for _ in 0..TOTAL_IDS {
                    black_box(Ulid::new(FIXED_MS, Entropy::Random(&mut rng)));
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks a single-owner monotonic generator within one millisecond.
fn bench_monotonic<R: RandSource>(c: &mut Criterion, group_name: &str, source_fn: impl Fn() -> R) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let mut mono = MonotonicEntropy::new(source_fn(), 0);
                for _ in 0..TOTAL_IDS {
                    black_box(Ulid::with_monotonic(FIXED_MS, &mut mono));
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks a shared source across threads within one millisecond.
fn bench_contended<S: SharedSource>(
    c: &mut Criterion,
    group_name: &str,
    source_fn: impl Fn() -> S,
) {
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{thread_count}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();

                for _ in 0..iters {
                    let source = Arc::new(source_fn());
                    let barrier = Arc::new(Barrier::new(thread_count + 1));
                    scope(|s| {
                        for _ in 0..thread_count {
                            let source = Arc::clone(&source);
                            let barrier = Arc::clone(&barrier);
                            s.spawn(move || {
                                barrier.wait();
                                for _ in 0..ids_per_thread {
                                    black_box(source.next(FIXED_MS));
                                }
                            });
                        }
                        barrier.wait();
                    });
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

fn benchmark_random_thread(c: &mut Criterion) {
    bench_random(c, "random/thread", || ThreadRandom);
}

fn benchmark_random_os(c: &mut Criterion) {
    bench_random(c, "random/os", || OsRandom);
}

fn benchmark_random_seeded(c: &mut Criterion) {
    bench_random(c, "random/std_rng", || RngAdapter(StdRng::seed_from_u64(0)));
}

fn benchmark_monotonic_thread(c: &mut Criterion) {
    bench_monotonic(c, "mono/sequential/thread", || ThreadRandom);
}

fn benchmark_monotonic_os(c: &mut Criterion) {
    bench_monotonic(c, "mono/sequential/os", || OsRandom);
}

fn benchmark_contended_locked(c: &mut Criterion) {
    bench_contended(c, "mono/contended/locked", || {
        LockedMonotonic::new(ThreadRandom, 0)
    });
}

fn benchmark_contended_pool(c: &mut Criterion) {
    bench_contended(c, "mono/contended/pool", || {
        PooledMonotonic::new(|| ThreadRandom, 0)
    });
}

criterion_group!(
    benches,
    bench_codec,
    // Plain entropy
    benchmark_random_thread,
    benchmark_random_os,
    benchmark_random_seeded,
    // Single owner, one millisecond
    benchmark_monotonic_thread,
    benchmark_monotonic_os,
    // Shared across threads, one millisecond
    benchmark_contended_locked,
    benchmark_contended_pool,
);
criterion_main!(benches);
