//! Collector counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Collector metrics
#[derive(Debug, Default)]
pub struct CollectorMetrics {
    /// Collection cycles started
    pub cycles: AtomicU64,

    /// Points handed to the sink
    pub points_published: AtomicU64,

    /// Reports that failed to parse
    pub parse_errors: AtomicU64,

    /// Reports whose command failed
    pub execution_errors: AtomicU64,

    /// Points the sink refused
    pub publish_errors: AtomicU64,
}

impl CollectorMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cycle(&self) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_published(&self, count: u64) {
        self.points_published.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_parse_error(&self) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_execution_error(&self) {
        self.execution_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_publish_error(&self) {
        self.publish_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            points_published: self.points_published.load(Ordering::Relaxed),
            parse_errors: self.parse_errors.load(Ordering::Relaxed),
            execution_errors: self.execution_errors.load(Ordering::Relaxed),
            publish_errors: self.publish_errors.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub cycles: u64,
    pub points_published: u64,
    pub parse_errors: u64,
    pub execution_errors: u64,
    pub publish_errors: u64,
}
