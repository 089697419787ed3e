//! LogSink - logs each point via tracing, optionally keeping them

use contracts::{ContractError, MetricPoint, MetricSink};
use tracing::{info, instrument};

/// Sink for dry runs and the `collect` command
pub struct LogSink {
    name: String,
    published: u64,
    captured: Option<Vec<MetricPoint>>,
}

impl LogSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            published: 0,
            captured: None,
        }
    }

    /// Also keep every point for later inspection
    pub fn capturing(name: impl Into<String>) -> Self {
        Self {
            captured: Some(Vec::new()),
            ..Self::new(name)
        }
    }

    pub fn published(&self) -> u64 {
        self.published
    }

    /// Captured points, in publish order (empty unless `capturing`)
    pub fn take_points(&mut self) -> Vec<MetricPoint> {
        self.captured.as_mut().map(std::mem::take).unwrap_or_default()
    }
}

impl MetricSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&mut self, point: MetricPoint) -> Result<(), ContractError> {
        info!(
            sink = %self.name,
            path = %point.path,
            value = point.value,
            timestamp = point.timestamp,
            "Metric"
        );
        self.published += 1;
        if let Some(captured) = self.captured.as_mut() {
            captured.push(point);
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, published = self.published, "LogSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_capturing_keeps_order() {
        let mut sink = LogSink::capturing("collect");
        sink.publish(MetricPoint::new("a.b.c", 1, 10, "h")).await.unwrap();
        sink.publish(MetricPoint::new("a.b.d", 2, 10, "h")).await.unwrap();

        let points = sink.take_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].path, "a.b.d");
        assert_eq!(sink.published(), 2);
        assert!(sink.take_points().is_empty());
    }

    #[tokio::test]
    async fn test_plain_sink_keeps_nothing() {
        let mut sink = LogSink::new("dry_run");
        sink.publish(MetricPoint::new("a.b.c", 1, 10, "h")).await.unwrap();
        assert!(sink.take_points().is_empty());
        assert_eq!(sink.name(), "dry_run");
        sink.close().await.unwrap();
    }
}
