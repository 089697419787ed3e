//! `collect` command implementation.

use anyhow::{Context, Result};
use collector::{resolve_hostname, CollectionReport, MegaRaidCollector, SystemCommandRunner};
use contracts::{MetricPoint, MetricSink};
use dispatcher::LogSink;
use tracing::info;

use crate::cli::CollectArgs;
use crate::commands::load_config;
use crate::error::CliError;

/// Execute the `collect` command: one cycle, printed instead of shipped
pub async fn run_collect(args: &CollectArgs) -> Result<()> {
    let agent = load_config(&args.config)?;
    let host = resolve_hostname(agent.hostname.as_deref());
    info!(host = %host, bin = %agent.collector.bin, "Collecting once");

    let collector = MegaRaidCollector::new(agent.collector, SystemCommandRunner, &agent.path_prefix, host);
    let mut sink = LogSink::capturing("collect");
    let report = collector.collect(&mut sink).await;
    sink.close().await?;

    let points = sink.take_points();
    if args.json {
        let json = serde_json::to_string_pretty(&points).context("Failed to serialize metrics")?;
        println!("{}", json);
    } else {
        print!("{}", render_plain(&points));
    }

    check_report(&report)
}

fn render_plain(points: &[MetricPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{} {} {}\n", p.path, p.value, p.timestamp))
        .collect()
}

fn check_report(report: &CollectionReport) -> Result<()> {
    if report.failures.is_empty() {
        return Ok(());
    }
    for failure in &report.failures {
        eprintln!("{}: {}", failure.kind, failure.message);
    }
    let reports = report
        .failures
        .iter()
        .map(|f| f.kind.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Err(CliError::Collection {
        failed: report.failures.len(),
        reports,
    }
    .into())
}
