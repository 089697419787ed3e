//! MegaRaidCollector - one collection cycle over the three MegaCli reports

use std::collections::BTreeMap;
use std::sync::Arc;

use contracts::{CollectorConfig, CommandRunner, MetricPoint, MetricSink, ReportKind};
use tracing::{debug, error, info, instrument, warn};

use crate::command::build_argv;
use crate::metrics::CollectorMetrics;
use crate::error::{CollectorError, Result};
use crate::parsers::{parse_report, ParsedMetrics};

/// A report that produced no metrics this cycle
#[derive(Debug, Clone)]
pub struct ReportFailure {
    pub kind: ReportKind,
    pub message: String,
    /// Parse failure (true) or command failure (false)
    pub parse_error: bool,
}

/// Outcome of one `collect` call
#[derive(Debug, Clone, Default)]
pub struct CollectionReport {
    /// Timestamp stamped on every point of the cycle
    pub timestamp: i64,
    /// Points accepted by the sink, per report
    pub published: BTreeMap<ReportKind, usize>,
    /// Reports that failed to run or parse
    pub failures: Vec<ReportFailure>,
    /// Points the sink refused
    pub publish_errors: usize,
}

impl CollectionReport {
    pub fn total_published(&self) -> usize {
        self.published.values().sum()
    }

    /// All three reports parsed and every point was accepted
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.publish_errors == 0
    }
}

/// Collects MegaRAID status and publishes it
///
/// Metric paths are `<path_prefix>.<host>.<collector.path>.<parsed name>`.
pub struct MegaRaidCollector<R> {
    config: CollectorConfig,
    runner: R,
    host: String,
    metric_prefix: String,
    metrics: Arc<CollectorMetrics>,
}

impl<R: CommandRunner> MegaRaidCollector<R> {
    pub fn new(
        config: CollectorConfig,
        runner: R,
        path_prefix: &str,
        host: impl Into<String>,
    ) -> Self {
        let host = host.into();
        let metric_prefix = format!("{}.{}.{}", path_prefix, host, config.path);
        Self {
            config,
            runner,
            host,
            metric_prefix,
            metrics: Arc::new(CollectorMetrics::new()),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Shared counters
    pub fn metrics(&self) -> &Arc<CollectorMetrics> {
        &self.metrics
    }

    /// Full metric path for a parsed name
    pub fn metric_path(&self, name: &str) -> String {
        format!("{}.{}", self.metric_prefix, name)
    }

    /// Run and parse one report
    ///
    /// # Errors
    /// Command failure or parse failure for this report only.
    #[instrument(name = "megaraid_collect_report", skip(self), fields(report = %kind))]
    pub async fn collect_report(&self, kind: ReportKind) -> Result<ParsedMetrics> {
        let argv = build_argv(&self.config, kind);
        let output = self.runner.run(&argv).await?;
        let metrics = parse_report(kind, &output)?;
        debug!(report = %kind, metrics = metrics.len(), "Report parsed");
        Ok(metrics)
    }

    /// Run a full cycle: physical, virtual, then bbu
    ///
    /// Never fails as a whole; per-report failures are logged and returned
    /// in the report.
    #[instrument(name = "megaraid_collect", skip(self, sink), fields(host = %self.host))]
    pub async fn collect<S: MetricSink>(&self, sink: &mut S) -> CollectionReport {
        self.metrics.record_cycle();
        let mut report = CollectionReport {
            timestamp: chrono::Utc::now().timestamp(),
            ..Default::default()
        };

        for kind in ReportKind::ALL {
            match self.collect_report(kind).await {
                Ok(parsed) => {
                    let published = self.publish_all(sink, kind, parsed, &mut report).await;
                    report.published.insert(kind, published);
                }
                Err(e) => self.record_failure(kind, e, &mut report),
            }
        }

        info!(
            published = report.total_published(),
            failures = report.failures.len(),
            publish_errors = report.publish_errors,
            "Collection cycle finished"
        );
        report
    }

    async fn publish_all<S: MetricSink>(
        &self,
        sink: &mut S,
        kind: ReportKind,
        parsed: ParsedMetrics,
        report: &mut CollectionReport,
    ) -> usize {
        let mut published = 0;
        for (name, value) in parsed {
            let point = MetricPoint::new(self.metric_path(&name), value, report.timestamp, &self.host);
            match sink.publish(point).await {
                Ok(()) => published += 1,
                Err(e) => {
                    report.publish_errors += 1;
                    self.metrics.record_publish_error();
                    warn!(sink = sink.name(), metric = %name, error = %e, "Publish failed");
                }
            }
        }

        self.metrics.record_published(published as u64);
        observability::record_points_published(kind.as_str(), published);
        published
    }

    fn record_failure(&self, kind: ReportKind, err: CollectorError, report: &mut CollectionReport) {
        let parse_error = err.is_parse_error();
        if parse_error {
            self.metrics.record_parse_error();
        } else {
            self.metrics.record_execution_error();
        }
        observability::record_collection_failure(kind.as_str(), parse_error);
        error!(report = %kind, error = %err, "Report collection failed");

        report.failures.push(ReportFailure {
            kind,
            message: err.to_string(),
            parse_error,
        });
    }
}
