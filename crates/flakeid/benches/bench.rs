use core::hint::black_box;
use core::time::Duration;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use flakeid::{LockFlakeGenerator, ThreadRandom, WallClock};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded). The allocator caps out at 256 IDs per millisecond, so
// wall-clock time dominates large batches; keep them small.
const TOTAL_IDS: usize = 1024;

/// Benchmarks the single-threaded allocation path.
fn bench_generator(c: &mut Criterion) {
    let mut group = c.benchmark_group("lock_flake_generator");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator =
                    LockFlakeGenerator::new(1, 1, 2, WallClock, ThreadRandom).unwrap();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks a shared generator under thread contention.
fn bench_generator_contended(c: &mut Criterion) {
    const THREADS: usize = 4;

    let mut group = c.benchmark_group("lock_flake_generator_contended");
    group.throughput(Throughput::Elements((TOTAL_IDS * THREADS) as u64));

    group.bench_function(format!("threads/{THREADS}/elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let mut total = Duration::ZERO;

            for _ in 0..iters {
                let generator =
                    Arc::new(LockFlakeGenerator::new(1, 1, 2, WallClock, ThreadRandom).unwrap());
                let barrier = Arc::new(Barrier::new(THREADS + 1));

                let start = scope(|s| {
                    for _ in 0..THREADS {
                        let generator = Arc::clone(&generator);
                        let barrier = Arc::clone(&barrier);

                        s.spawn(move || {
                            barrier.wait();
                            for _ in 0..TOTAL_IDS {
                                black_box(generator.next_id().unwrap());
                            }
                        });
                    }

                    barrier.wait();
                    Instant::now()
                });

                total += start.elapsed();
            }

            total
        });
    });

    group.finish();
}

criterion_group!(benches, bench_generator, bench_generator_contended);
criterion_main!(benches);
