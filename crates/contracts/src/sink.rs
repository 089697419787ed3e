//! MetricSink trait - collector output interface
//!
//! Every publication target (OpenTSDB batcher, log printer, test recorder)
//! implements this trait.

use crate::{ContractError, MetricPoint};

/// Metric publication trait
#[trait_variant::make(MetricSink: Send)]
pub trait LocalMetricSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Publish one point
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn publish(&mut self, point: MetricPoint) -> Result<(), ContractError>;

    /// Flush buffered points (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Flush and release resources. Must be safe to call twice.
    async fn close(&mut self) -> Result<(), ContractError>;
}
