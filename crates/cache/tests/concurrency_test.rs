use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use tokio::time::Duration;

use ttlcache::{CacheConfig, TtlCache};

const THREADS: u64 = 8;
const OPS: u64 = 2_000;
const OWN_KEYS: u64 = 32;
const SHARED_KEYS: u64 = 16;

fn busy_janitor() -> CacheConfig {
    CacheConfig::default().with_sweep_interval(Duration::from_millis(1))
}

/// Chaves próprias de cada thread são verificadas exatamente; chaves
/// compartilhadas só podem conter valores que alguma thread escreveu.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_mixed_operations_with_running_janitor() {
    let cache: TtlCache<String, u64> = TtlCache::with_config(busy_janitor()).unwrap();

    thread::scope(|s| {
        for t in 0..THREADS {
            let cache = cache.clone();
            s.spawn(move || {
                for i in 0..OPS {
                    let value = t * OPS + i;

                    let own = format!("own:{t}:{}", i % OWN_KEYS);
                    cache.set(own.clone(), value, Duration::from_secs(60));
                    assert_eq!(cache.get(&own), Some(value));

                    let shared = format!("shared:{}", (i * 7 + t) % SHARED_KEYS);
                    match i % 4 {
                        0 => cache.set(shared, value, Duration::from_millis(i % 3)),
                        1 => {
                            if let Some(v) = cache.get(&shared) {
                                assert!(v < THREADS * OPS);
                            }
                        }
                        2 => {
                            if let Some(v) = cache.pop(&shared) {
                                assert!(v < THREADS * OPS);
                            }
                        }
                        _ => cache.remove(&shared),
                    }
                }
            });
        }
    });

    for t in 0..THREADS {
        for k in 0..OWN_KEYS {
            // Última iteração i com i % OWN_KEYS == k
            let last = (OPS - 1) - ((OPS - 1 - k) % OWN_KEYS);
            let expected = t * OPS + last;
            assert_eq!(cache.get(&format!("own:{t}:{k}")), Some(expected));
        }
    }

    let own_total = (THREADS * OWN_KEYS) as usize;
    assert!(cache.len() <= own_total + SHARED_KEYS as usize);

    for k in 0..SHARED_KEYS {
        cache.remove(&format!("shared:{k}"));
    }
    assert_eq!(cache.len(), own_total);
}

/// Várias threads disputando o mesmo pop: exatamente uma recebe o valor.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_pop_claims_exactly_once() {
    let cache: TtlCache<&'static str, u64> = TtlCache::with_config(busy_janitor()).unwrap();

    for round in 0..100 {
        cache.set("contended", round, Duration::from_secs(60));
        let barrier = Arc::new(Barrier::new(THREADS as usize));
        let winners = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..THREADS {
                let cache = cache.clone();
                let barrier = Arc::clone(&barrier);
                let winners = &winners;
                s.spawn(move || {
                    barrier.wait();
                    if let Some(v) = cache.pop("contended") {
                        assert_eq!(v, round);
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert!(cache.is_empty());
    }
}

/// Cada set em chave única é consumido por exatamente um pop; o store
/// termina vazio.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_size_matches_committed_operations() {
    let cache: TtlCache<(u64, u64), u64> = TtlCache::with_config(busy_janitor()).unwrap();
    let popped = AtomicUsize::new(0);

    thread::scope(|s| {
        for t in 0..THREADS {
            let cache = cache.clone();
            s.spawn(move || {
                for i in 0..OPS {
                    cache.set((t, i), i, Duration::from_secs(60));
                }
            });
        }
    });
    assert_eq!(cache.len(), (THREADS * OPS) as usize);

    thread::scope(|s| {
        for t in 0..THREADS {
            let cache = cache.clone();
            let popped = &popped;
            s.spawn(move || {
                for i in 0..OPS {
                    // Cada chave (t, i) é disputada por duas threads
                    let owner = (t + 1) % THREADS;
                    if cache.pop(&(owner, i)).is_some() {
                        popped.fetch_add(1, Ordering::SeqCst);
                    }
                    if cache.pop(&(t, i)).is_some() {
                        popped.fetch_add(1, Ordering::SeqCst);
                    }
                }
            });
        }
    });

    assert_eq!(popped.load(Ordering::SeqCst), (THREADS * OPS) as usize);
    assert!(cache.is_empty());
}

/// Leituras concorrentes com o janitor varrendo entradas de TTL curtíssimo.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reads_race_with_sweep() {
    let cache: TtlCache<u64, u64> = TtlCache::with_config(busy_janitor()).unwrap();

    thread::scope(|s| {
        for t in 0..THREADS {
            let cache = cache.clone();
            s.spawn(move || {
                for i in 0..OPS {
                    let key = i % 64;
                    if t % 2 == 0 {
                        cache.set(key, key * 10, Duration::from_micros(200));
                    } else if let Some(v) = cache.get(&key) {
                        assert_eq!(v, key * 10);
                    }
                }
            });
        }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(cache.is_empty());
}
