//! Run statistics.

use std::time::Duration;

use collector::MetricsSnapshot;
use dispatcher::DeliverySnapshot;
use observability::CycleAggregator;

#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Wall time of the whole run
    pub duration: Duration,

    pub cycles: CycleAggregator,

    /// Collector counters at the end of the run
    pub collector: Option<MetricsSnapshot>,

    /// Delivery counters after the final flush
    pub delivery: Option<DeliverySnapshot>,
}

impl PipelineStats {
    /// Published points per second over the run
    pub fn points_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.cycles.total_points as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    pub fn print_summary(&self) {
        println!();
        println!("=== raidtsdb statistics ===");
        println!("Duration: {:.2}s", self.duration.as_secs_f64());
        print!("{}", self.cycles.summary());

        if let Some(ref c) = self.collector {
            println!(
                "Collector: parse errors {}, execution errors {}, publish errors {}",
                c.parse_errors, c.execution_errors, c.publish_errors
            );
        }

        if let Some(ref d) = self.delivery {
            println!("Delivery:");
            println!("  batches delivered: {}", d.batches_delivered);
            println!("  batches rejected: {}", d.batches_rejected);
            println!("  batches dropped: {}", d.batches_dropped);
            println!("  points sent: {}", d.points_sent);
            println!("  points dropped: {}", d.points_dropped);
            println!("  transport failures: {}", d.transport_failures);
        }
        println!();
    }
}
