//! Tests for event key admission and sweeping.

use dicebot_cache::{IdempotencyCache, IdempotencyCacheConfig, IdempotencyCacheConfigBuilder, ManualClock};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

const DAY: Duration = Duration::from_secs(86_400);

fn manual_cache() -> (IdempotencyCache<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let cache = IdempotencyCache::with_clock(IdempotencyCacheConfig::default(), clock.clone());
    (cache, clock)
}

#[test]
fn test_first_admission_then_duplicates() {
    let cache = IdempotencyCache::new(IdempotencyCacheConfig::default());

    assert!(cache.check_and_mark("om_1"));
    assert!(!cache.check_and_mark("om_1"));
    assert!(!cache.check_and_mark("om_1"));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_distinct_keys_do_not_interfere() {
    let cache = IdempotencyCache::new(IdempotencyCacheConfig::default());

    assert!(cache.check_and_mark("om_1"));
    assert!(cache.check_and_mark("om_2"));
    assert!(!cache.check_and_mark("om_1"));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_duplicate_rejected_until_swept() {
    let (cache, clock) = manual_cache();
    assert!(cache.check_and_mark("om_1"));

    // Past the window but no sweep yet: the record is still live.
    clock.advance(DAY + Duration::from_secs(3_600));
    assert!(!cache.check_and_mark("om_1"));
}

#[test]
fn test_readmission_after_sweep() {
    let (cache, clock) = manual_cache();
    assert!(cache.check_and_mark("om_1"));

    clock.advance(DAY + Duration::from_secs(1));
    assert_eq!(cache.sweep(), 1);
    assert!(cache.is_empty());

    assert!(cache.check_and_mark("om_1"));
}

#[test]
fn test_sweep_keeps_records_inside_window() {
    let (cache, clock) = manual_cache();
    assert!(cache.check_and_mark("old"));

    clock.advance(Duration::from_secs(50_000));
    assert!(cache.check_and_mark("new"));

    clock.advance(Duration::from_secs(40_000));
    assert_eq!(cache.sweep(), 1);
    assert!(!cache.contains("old"));
    assert!(cache.contains("new"));
}

#[test]
fn test_record_exactly_at_window_survives() {
    let (cache, clock) = manual_cache();
    assert!(cache.check_and_mark("edge"));

    clock.advance(DAY);
    assert_eq!(cache.sweep(), 0);
    assert!(cache.contains("edge"));
}

#[test]
fn test_concurrent_admission_same_key() {
    for threads in [1usize, 2, 8, 32] {
        let cache = IdempotencyCache::new(IdempotencyCacheConfig::default());
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let cache = cache.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.check_and_mark("om_contended")
                })
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|admitted| *admitted)
            .count();

        assert_eq!(admitted, 1, "{threads} callers");
    }
}

#[test]
fn test_concurrent_admission_with_sweep() {
    let (cache, clock) = manual_cache();
    clock.advance(Duration::from_secs(1));
    let barrier = Arc::new(Barrier::new(17));

    let mut handles = Vec::new();
    for worker in 0..16 {
        let cache = cache.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            (0..200)
                .filter(|i| cache.check_and_mark(&format!("om_{worker}_{i}")))
                .count()
        }));
    }
    let sweeper = {
        let cache = cache.clone();
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            (0..50).map(|_| cache.sweep()).sum::<usize>()
        })
    };

    let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    let swept = sweeper.join().unwrap();

    assert_eq!(admitted, 16 * 200);
    assert_eq!(swept, 0);
    assert_eq!(cache.len(), 16 * 200);
}

#[test]
fn test_config_builder_defaults() {
    let config = IdempotencyCacheConfigBuilder::default()
        .sweep_interval_secs(600)
        .build()
        .unwrap();

    assert_eq!(config.retention(), DAY);
    assert_eq!(config.sweep_interval(), Duration::from_secs(600));
}

#[test]
fn test_config_setters_and_zero_interval() {
    let config = IdempotencyCacheConfig::default()
        .with_retention_secs(30)
        .with_sweep_interval_secs(0);

    assert_eq!(config.retention(), Duration::from_secs(30));
    assert_eq!(config.sweep_interval(), Duration::from_secs(1));
}

#[test]
fn test_config_from_toml() {
    let config: IdempotencyCacheConfig = toml::from_str("retention_secs = 120").unwrap();
    assert_eq!(config.retention(), Duration::from_secs(120));
    assert_eq!(config.sweep_interval(), DAY);
}

#[tokio::test(start_paused = true)]
async fn test_spawned_sweeper_evicts() {
    let clock = ManualClock::new();
    let config = IdempotencyCacheConfig::default()
        .with_retention_secs(60)
        .with_sweep_interval_secs(60);
    let cache = IdempotencyCache::with_clock(config, clock.clone());

    assert!(cache.check_and_mark("om_1"));
    clock.advance(Duration::from_secs(120));

    let sweeper = cache.spawn_sweeper();
    assert!(cache.contains("om_1"), "first sweep waits one period");

    tokio::time::sleep(Duration::from_secs(61)).await;
    for _ in 0..10 {
        if cache.is_empty() {
            break;
        }
        tokio::task::yield_now().await;
    }

    assert!(cache.is_empty());
    assert!(cache.check_and_mark("om_1"));
    sweeper.abort();
}
