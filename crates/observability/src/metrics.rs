//! Agent metrics
//!
//! Thin wrappers over the `metrics` facade. Every name carries the
//! `raidtsdb_` prefix. Without an installed recorder these are no-ops.

use metrics::{counter, gauge, histogram};

/// Points handed to the sink for one report
pub fn record_points_published(report: &str, count: usize) {
    counter!("raidtsdb_points_published_total", "report" => report.to_string())
        .increment(count as u64);
}

/// A report that produced nothing this cycle
pub fn record_collection_failure(report: &str, parse_error: bool) {
    let kind = if parse_error { "parse" } else { "execution" };
    counter!(
        "raidtsdb_collection_failures_total",
        "report" => report.to_string(),
        "kind" => kind
    )
    .increment(1);
}

/// Batch outcome: `delivered`, `rejected` or `dropped`
pub fn record_batch(status: &'static str) {
    counter!("raidtsdb_batches_total", "status" => status).increment(1);
}

/// Size of a batch at send time
pub fn record_batch_points(count: usize) {
    histogram!("raidtsdb_batch_points").record(count as f64);
}

/// Send error against one endpoint (failover follows)
pub fn record_transport_failure(endpoint: &str) {
    counter!(
        "raidtsdb_transport_failures_total",
        "endpoint" => endpoint.to_string()
    )
    .increment(1);
}

/// Wall time of one collection cycle
pub fn record_cycle_duration_ms(duration_ms: f64) {
    histogram!("raidtsdb_cycle_duration_ms").record(duration_ms);
}

/// Points waiting in the dispatcher buffer
pub fn record_pending_points(count: usize) {
    gauge!("raidtsdb_pending_points").set(count as f64);
}

/// In-memory aggregate over collection cycles
///
/// Used for the summary printed on shutdown.
#[derive(Debug, Clone, Default)]
pub struct CycleAggregator {
    pub total_cycles: u64,
    pub failed_cycles: u64,
    pub total_points: u64,
    pub total_failures: u64,
    pub points_stats: RunningStats,
    pub duration_stats: RunningStats,
}

impl CycleAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one cycle into the aggregate
    pub fn update(&mut self, points: usize, failures: usize, duration_ms: f64) {
        self.total_cycles += 1;
        self.total_points += points as u64;
        self.total_failures += failures as u64;
        if failures > 0 {
            self.failed_cycles += 1;
        }
        self.points_stats.push(points as f64);
        self.duration_stats.push(duration_ms);
        record_cycle_duration_ms(duration_ms);
    }

    pub fn summary(&self) -> CycleSummary {
        CycleSummary {
            total_cycles: self.total_cycles,
            failed_cycles: self.failed_cycles,
            total_points: self.total_points,
            total_failures: self.total_failures,
            failure_rate: if self.total_cycles > 0 {
                self.failed_cycles as f64 / self.total_cycles as f64 * 100.0
            } else {
                0.0
            },
            points_per_cycle: StatsSummary::from(&self.points_stats),
            cycle_duration_ms: StatsSummary::from(&self.duration_stats),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CycleSummary {
    pub total_cycles: u64,
    pub failed_cycles: u64,
    pub total_points: u64,
    pub total_failures: u64,
    pub failure_rate: f64,
    pub points_per_cycle: StatsSummary,
    pub cycle_duration_ms: StatsSummary,
}

impl std::fmt::Display for CycleSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Collection Summary ===")?;
        writeln!(f, "Cycles: {}", self.total_cycles)?;
        writeln!(
            f,
            "Cycles with failures: {} ({:.2}%)",
            self.failed_cycles, self.failure_rate
        )?;
        writeln!(f, "Report failures: {}", self.total_failures)?;
        writeln!(f, "Points published: {}", self.total_points)?;
        writeln!(f, "Points per cycle: {}", self.points_per_cycle)?;
        writeln!(f, "Cycle duration (ms): {}", self.cycle_duration_ms)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean/variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
