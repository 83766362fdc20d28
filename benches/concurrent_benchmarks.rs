//! Concurrent Cache Benchmarks
//!
//! Measures the one-lock concurrent cache across read, write and mixed
//! access patterns, against a `std::sync::Mutex<LruCache>` baseline, plus the
//! cost of a bulk purge while writers are active.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use element_cache::{ConcurrentLruCache, LruCache};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::thread;

const CACHE_SIZE: usize = 10_000;
const OPS_PER_THREAD: usize = 1_000;

/// Common surface for the caches under comparison.
trait BenchCache<K, V>: Send + Sync {
    fn cache_get(&self, key: &K) -> Option<V>;
    fn cache_put(&self, key: K, value: V);
}

impl BenchCache<usize, usize> for ConcurrentLruCache<usize, usize> {
    fn cache_get(&self, key: &usize) -> Option<usize> {
        self.get(key)
    }

    fn cache_put(&self, key: usize, value: usize) {
        self.put(key, value);
    }
}

impl BenchCache<usize, usize> for Mutex<LruCache<usize, usize>> {
    fn cache_get(&self, key: &usize) -> Option<usize> {
        self.lock().unwrap().get(key).copied()
    }

    fn cache_put(&self, key: usize, value: usize) {
        self.lock().unwrap().put(key, value);
    }
}

fn concurrent_cache() -> Arc<ConcurrentLruCache<usize, usize>> {
    let cache = ConcurrentLruCache::new(NonZeroUsize::new(CACHE_SIZE).unwrap());
    for i in 0..CACHE_SIZE {
        cache.put(i, i);
    }
    Arc::new(cache)
}

fn std_mutex_cache() -> Arc<Mutex<LruCache<usize, usize>>> {
    let mut cache = LruCache::new(NonZeroUsize::new(CACHE_SIZE).unwrap());
    for i in 0..CACHE_SIZE {
        cache.put(i, i);
    }
    Arc::new(Mutex::new(cache))
}

/// Benchmark concurrent read operations
fn concurrent_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("Concurrent Reads");
    group.throughput(Throughput::Elements((8 * OPS_PER_THREAD) as u64));

    let lru_cache = concurrent_cache();
    let baseline = std_mutex_cache();

    group.bench_function("ConcurrentLRU", |b| {
        b.iter(|| run_concurrent_reads(Arc::clone(&lru_cache), 8, OPS_PER_THREAD));
    });

    group.bench_function("std Mutex<LruCache>", |b| {
        b.iter(|| run_concurrent_reads(Arc::clone(&baseline), 8, OPS_PER_THREAD));
    });

    group.finish();
}

/// Benchmark concurrent write operations
fn concurrent_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Concurrent Writes");
    group.throughput(Throughput::Elements((8 * OPS_PER_THREAD) as u64));

    let lru_cache = concurrent_cache();
    let baseline = std_mutex_cache();

    group.bench_function("ConcurrentLRU", |b| {
        b.iter(|| run_concurrent_writes(Arc::clone(&lru_cache), 8, OPS_PER_THREAD));
    });

    group.bench_function("std Mutex<LruCache>", |b| {
        b.iter(|| run_concurrent_writes(Arc::clone(&baseline), 8, OPS_PER_THREAD));
    });

    group.finish();
}

/// Benchmark a 80/20 read/write mix at several thread counts
fn concurrent_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("Concurrent Mixed");
    let lru_cache = concurrent_cache();

    for threads in [1usize, 2, 4, 8] {
        group.throughput(Throughput::Elements((threads * OPS_PER_THREAD) as u64));
        group.bench_with_input(BenchmarkId::new("ConcurrentLRU", threads), &threads, |b, &t| {
            b.iter(|| run_concurrent_mixed(Arc::clone(&lru_cache), t, OPS_PER_THREAD));
        });
    }

    group.finish();
}

/// Benchmark a bulk purge racing with writers
fn purge_under_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("Purge Under Load");

    group.bench_function("purge_where with 4 writers", |b| {
        b.iter(|| {
            let cache = concurrent_cache();
            let writers: Vec<_> = (0..4)
                .map(|t| {
                    let cache = Arc::clone(&cache);
                    thread::spawn(move || {
                        for i in 0..OPS_PER_THREAD {
                            cache.put(CACHE_SIZE + t * OPS_PER_THREAD + i, i);
                        }
                    })
                })
                .collect();
            black_box(cache.purge_where(|_, v| v % 3 == 0));
            for handle in writers {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

fn run_concurrent_reads<C>(cache: Arc<C>, num_threads: usize, ops_per_thread: usize)
where
    C: BenchCache<usize, usize> + 'static,
{
    let mut handles = Vec::with_capacity(num_threads);
    for t in 0..num_threads {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..ops_per_thread {
                let key = (t * ops_per_thread + i) % CACHE_SIZE;
                black_box(cache.cache_get(&key));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

fn run_concurrent_writes<C>(cache: Arc<C>, num_threads: usize, ops_per_thread: usize)
where
    C: BenchCache<usize, usize> + 'static,
{
    let mut handles = Vec::with_capacity(num_threads);
    for t in 0..num_threads {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..ops_per_thread {
                let key = t * ops_per_thread + i;
                cache.cache_put(key, key);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

fn run_concurrent_mixed<C>(cache: Arc<C>, num_threads: usize, ops_per_thread: usize)
where
    C: BenchCache<usize, usize> + 'static,
{
    let mut handles = Vec::with_capacity(num_threads);
    for t in 0..num_threads {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..ops_per_thread {
                let key = (t * ops_per_thread + i) % (CACHE_SIZE * 2);
                if i % 5 == 0 {
                    cache.cache_put(key, key);
                } else {
                    black_box(cache.cache_get(&key));
                }
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

criterion_group!(
    benches,
    concurrent_reads,
    concurrent_writes,
    concurrent_mixed,
    purge_under_load
);
criterion_main!(benches);
