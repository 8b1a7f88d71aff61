//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    /// Total connections accepted into a session
    pub connections_total: AtomicU64,
    /// Sessions currently running
    pub connections_active: AtomicU64,
    /// Sessions closed because a newer one took their identity
    pub connections_replaced: AtomicU64,
    /// Inbound data frames received
    pub messages_received: AtomicU64,
    /// Values pushed successfully
    pub values_pushed: AtomicU64,
    /// Pushes that failed
    pub push_failures: AtomicU64,
    /// Reads that failed for a reason other than the peer leaving
    pub read_errors: AtomicU64,
    /// Requests to the upgrade endpoint that never became a session
    pub upgrades_rejected: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new session
    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a session ending
    pub fn connection_closed(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record a session evicted by a newer connection
    pub fn connection_replaced(&self) {
        self.connections_replaced.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an inbound data frame
    pub fn message_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a value delivered to the peer
    pub fn value_pushed(&self) {
        self.values_pushed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed push
    pub fn push_failed(&self) {
        self.push_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a read failure that was not a normal peer departure
    pub fn read_error(&self) {
        self.read_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected or failed upgrade
    pub fn upgrade_rejected(&self) {
        self.upgrades_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            connections_replaced: self.connections_replaced.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            values_pushed: self.values_pushed.load(Ordering::Relaxed),
            push_failures: self.push_failures.load(Ordering::Relaxed),
            read_errors: self.read_errors.load(Ordering::Relaxed),
            upgrades_rejected: self.upgrades_rejected.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total connections accepted into a session
    pub connections_total: u64,
    /// Sessions currently running
    pub connections_active: u64,
    /// Sessions replaced by a newer connection
    pub connections_replaced: u64,
    /// Inbound data frames received
    pub messages_received: u64,
    /// Values pushed successfully
    pub values_pushed: u64,
    /// Pushes that failed
    pub push_failures: u64,
    /// Unexpected read failures
    pub read_errors: u64,
    /// Upgrade requests that never became a session
    pub upgrades_rejected: u64,
}
