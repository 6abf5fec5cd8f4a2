//! Metrics collection for message handling.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Metrics collector for routed messages.
#[derive(Debug, Clone, Default)]
pub struct BotMetrics {
    inner: Arc<BotMetricsInner>,
}

#[derive(Debug, Default)]
struct BotMetricsInner {
    events_received: AtomicU64,
    duplicates_dropped: AtomicU64,
    ignored: AtomicU64,
    rolls: AtomicU64,
    roll_failures: AtomicU64,
    mode_changes: AtomicU64,
    expressions: AtomicU64,

    last_roll_success: parking_lot::Mutex<Option<Instant>>,
}

impl BotMetrics {
    /// Creates a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an inbound event, duplicate or not.
    pub fn record_event(&self) {
        self.inner.events_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an event dropped by the idempotency cache.
    pub fn record_duplicate(&self) {
        self.inner.duplicates_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a message that produced no reply.
    pub fn record_ignored(&self) {
        self.inner.ignored.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a successful roll.
    pub fn record_roll_success(&self) {
        self.inner.rolls.fetch_add(1, Ordering::Relaxed);
        *self.inner.last_roll_success.lock() = Some(Instant::now());
    }

    /// Records a roll reported back to the user as a failure.
    pub fn record_roll_failure(&self) {
        self.inner.roll_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a default notation change.
    pub fn record_mode_change(&self) {
        self.inner.mode_changes.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an expression command.
    pub fn record_expression(&self) {
        self.inner.expressions.fetch_add(1, Ordering::Relaxed);
    }

    /// Gets the total number of inbound events.
    pub fn events_received(&self) -> u64 {
        self.inner.events_received.load(Ordering::Relaxed)
    }

    /// Gets the number of duplicates dropped.
    pub fn duplicates_dropped(&self) -> u64 {
        self.inner.duplicates_dropped.load(Ordering::Relaxed)
    }

    /// Gets the number of ignored messages.
    pub fn ignored(&self) -> u64 {
        self.inner.ignored.load(Ordering::Relaxed)
    }

    /// Gets the number of successful rolls.
    pub fn rolls(&self) -> u64 {
        self.inner.rolls.load(Ordering::Relaxed)
    }

    /// Gets the number of failed rolls.
    pub fn roll_failures(&self) -> u64 {
        self.inner.roll_failures.load(Ordering::Relaxed)
    }

    /// Gets the number of mode changes.
    pub fn mode_changes(&self) -> u64 {
        self.inner.mode_changes.load(Ordering::Relaxed)
    }

    /// Gets the number of expression commands.
    pub fn expressions(&self) -> u64 {
        self.inner.expressions.load(Ordering::Relaxed)
    }

    /// Gets time since the last successful roll.
    pub fn time_since_roll(&self) -> Option<std::time::Duration> {
        self.inner
            .last_roll_success
            .lock()
            .map(|instant| instant.elapsed())
    }

    /// Creates a serializable snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_received: self.events_received(),
            duplicates_dropped: self.duplicates_dropped(),
            ignored: self.ignored(),
            rolls: self.rolls(),
            roll_failures: self.roll_failures(),
            mode_changes: self.mode_changes(),
            expressions: self.expressions(),
            seconds_since_roll: self.time_since_roll().map(|d| d.as_secs()),
        }
    }
}

/// Serializable snapshot of bot metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Inbound events, duplicates included
    pub events_received: u64,
    /// Events dropped as duplicates
    pub duplicates_dropped: u64,
    /// Messages that produced no reply
    pub ignored: u64,
    /// Successful rolls
    pub rolls: u64,
    /// Rolls answered with an error
    pub roll_failures: u64,
    /// Default notation switches
    pub mode_changes: u64,
    /// Expression commands
    pub expressions: u64,
    /// Seconds since the last successful roll
    pub seconds_since_roll: Option<u64>,
}
