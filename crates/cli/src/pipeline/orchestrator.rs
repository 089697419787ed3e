//! Pipeline orchestrator - collector on a timer feeding the OpenTSDB sink.

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::Result;
use collector::{resolve_hostname, MegaRaidCollector, SystemCommandRunner};
use contracts::{AgentConfig, BatchTransport, CommandRunner, MetricSink};
use dispatcher::TsdbSink;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use super::PipelineStats;
use crate::error::CliError;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub agent: AgentConfig,

    /// Stop after the first cycle
    pub once: bool,

    /// Prometheus port (None = disabled)
    pub metrics_port: Option<u16>,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run against the real MegaCli binary and HTTP transport until `shutdown`
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<PipelineStats> {
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
        }

        let agent = &self.config.agent;
        let host = resolve_hostname(agent.hostname.as_deref());
        let collector = MegaRaidCollector::new(
            agent.collector.clone(),
            SystemCommandRunner,
            &agent.path_prefix,
            host,
        );
        let sink = TsdbSink::from_config(&agent.handler).map_err(|e| CliError::sink(e.to_string()))?;

        self.run_with(collector, sink, shutdown).await
    }

    /// Loop body shared with tests: any runner, any transport
    pub async fn run_with<R, T>(
        &self,
        collector: MegaRaidCollector<R>,
        mut sink: TsdbSink<T>,
        shutdown: impl Future<Output = ()>,
    ) -> Result<PipelineStats>
    where
        R: CommandRunner,
        T: BatchTransport,
    {
        let start = Instant::now();
        let mut stats = PipelineStats::default();

        info!(
            host = collector.host(),
            interval_secs = self.config.agent.interval_secs,
            once = self.config.once,
            "Collection loop started"
        );

        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.agent.interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    warn!("Received shutdown signal, stopping collection");
                    break;
                }
                _ = ticker.tick() => {}
            }

            // A started cycle runs to completion so no report is half published.
            let cycle_start = Instant::now();
            let report = collector.collect(&mut sink).await;
            stats.cycles.update(
                report.total_published(),
                report.failures.len(),
                cycle_start.elapsed().as_secs_f64() * 1000.0,
            );

            if self.config.once {
                break;
            }
        }

        if let Err(e) = sink.close().await {
            error!(error = %e, "Failed to close OpenTSDB sink");
        }

        stats.duration = start.elapsed();
        stats.collector = Some(collector.metrics().snapshot());
        stats.delivery = Some(sink.metrics().snapshot());
        Ok(stats)
    }
}
