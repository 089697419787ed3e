//! Delivery counters for one BatchDispatcher

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct DeliveryMetrics {
    /// Points waiting for the next flush
    pending: AtomicUsize,
    batches_delivered: AtomicU64,
    batches_rejected: AtomicU64,
    batches_dropped: AtomicU64,
    points_sent: AtomicU64,
    points_dropped: AtomicU64,
    transport_failures: AtomicU64,
}

impl DeliveryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    pub fn set_pending(&self, len: usize) {
        self.pending.store(len, Ordering::Relaxed);
    }

    /// Batch accepted (2xx/3xx)
    pub fn record_delivered(&self, points: usize) {
        self.batches_delivered.fetch_add(1, Ordering::Relaxed);
        self.points_sent.fetch_add(points as u64, Ordering::Relaxed);
    }

    /// Batch answered with an error status; counts as sent
    pub fn record_rejected(&self, points: usize) {
        self.batches_rejected.fetch_add(1, Ordering::Relaxed);
        self.points_sent.fetch_add(points as u64, Ordering::Relaxed);
    }

    pub fn record_dropped(&self, points: usize) {
        self.batches_dropped.fetch_add(1, Ordering::Relaxed);
        self.points_dropped.fetch_add(points as u64, Ordering::Relaxed);
    }

    pub fn record_transport_failure(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DeliverySnapshot {
        DeliverySnapshot {
            pending: self.pending(),
            batches_delivered: self.batches_delivered.load(Ordering::Relaxed),
            batches_rejected: self.batches_rejected.load(Ordering::Relaxed),
            batches_dropped: self.batches_dropped.load(Ordering::Relaxed),
            points_sent: self.points_sent.load(Ordering::Relaxed),
            points_dropped: self.points_dropped.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of DeliveryMetrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliverySnapshot {
    pub pending: usize,
    pub batches_delivered: u64,
    pub batches_rejected: u64,
    pub batches_dropped: u64,
    pub points_sent: u64,
    pub points_dropped: u64,
    pub transport_failures: u64,
}
