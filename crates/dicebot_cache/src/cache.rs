//! Idempotency cache implementation.

use crate::clock::{Clock, SystemClock};
use derive_getters::Getters;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Configuration for the idempotency cache.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct IdempotencyCacheConfig {
    /// Age (seconds) past which a record is evicted by the sweep
    #[serde(default = "default_retention_secs")]
    #[builder(default = "default_retention_secs()")]
    retention_secs: u64,

    /// Period (seconds) between sweeps
    #[serde(default = "default_sweep_interval_secs")]
    #[builder(default = "default_sweep_interval_secs()")]
    sweep_interval_secs: u64,
}

fn default_retention_secs() -> u64 {
    86_400 // 24 hours
}

fn default_sweep_interval_secs() -> u64 {
    86_400
}

impl IdempotencyCacheConfig {
    /// Retention window as a [`Duration`].
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    /// Sweep period as a [`Duration`], never shorter than one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Default for IdempotencyCacheConfig {
    fn default() -> Self {
        Self {
            retention_secs: default_retention_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// Admits each event key at most once until the sweep evicts it.
///
/// The map lives behind a single lock. [`check_and_mark`](Self::check_and_mark)
/// performs its lookup and insert under that lock, so concurrent callers with
/// the same key see exactly one `true`. The sweep takes the same lock.
///
/// A record stays resident until the first sweep that finds it older than the
/// retention window, so effective residency is between one retention window
/// and one window plus one sweep period.
///
/// # Example
///
/// ```
/// use dicebot_cache::{IdempotencyCache, IdempotencyCacheConfig};
///
/// let cache = IdempotencyCache::new(IdempotencyCacheConfig::default());
/// assert!(cache.check_and_mark("om_4f1c"));
/// assert!(!cache.check_and_mark("om_4f1c"));
/// ```
#[derive(Debug, Clone)]
pub struct IdempotencyCache<C: Clock + Clone = SystemClock> {
    config: IdempotencyCacheConfig,
    clock: C,
    records: Arc<Mutex<HashMap<String, Instant>>>,
}

impl IdempotencyCache<SystemClock> {
    /// Create a cache backed by the system clock.
    pub fn new(config: IdempotencyCacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for IdempotencyCache<SystemClock> {
    fn default() -> Self {
        Self::new(IdempotencyCacheConfig::default())
    }
}

impl<C: Clock + Clone> IdempotencyCache<C> {
    /// Create a cache that reads time from `clock`.
    pub fn with_clock(config: IdempotencyCacheConfig, clock: C) -> Self {
        tracing::debug!(
            retention_secs = config.retention_secs,
            sweep_interval_secs = config.sweep_interval_secs,
            "Creating new IdempotencyCache"
        );
        Self {
            config,
            clock,
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record `key` as seen if it has no live record.
    ///
    /// Returns `true` on first admission and `false` for every later call
    /// until the record is swept.
    #[tracing::instrument(skip(self), fields(event_key = key))]
    pub fn check_and_mark(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut records = self.records.lock();
        if records.contains_key(key) {
            tracing::debug!("Duplicate event key");
            return false;
        }
        records.insert(key.to_owned(), now);
        tracing::trace!(cache_size = records.len(), "Admitted event key");
        true
    }

    /// Whether `key` currently has a live record.
    pub fn contains(&self, key: &str) -> bool {
        self.records.lock().contains_key(key)
    }

    /// Remove every record older than the retention window.
    ///
    /// Returns the number of records removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let retention = self.config.retention();
        let mut records = self.records.lock();
        let before = records.len();

        records.retain(|_, first_seen| now.saturating_duration_since(*first_seen) <= retention);

        let removed = before - records.len();
        if removed > 0 {
            tracing::info!(removed, remaining = records.len(), "Swept expired event keys");
        } else {
            tracing::debug!(remaining = records.len(), "Sweep found nothing to evict");
        }
        removed
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether the cache holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Spawn the periodic sweep on the current tokio runtime.
    ///
    /// The first sweep runs one period after spawning. Abort the returned
    /// handle to stop it.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let cache = self.clone();
        let period = self.config.sweep_interval();
        tracing::info!(period_secs = period.as_secs(), "Starting idempotency sweeper");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                cache.sweep();
            }
        })
    }
}
