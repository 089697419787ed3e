//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::AgentConfig;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::commands::load_config;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_agent(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    let mut agent = load_config(&args.config)?;
    apply_overrides(&mut agent, args);
    config_loader::ConfigLoader::validate(&agent).context("Invalid configuration after CLI overrides")?;

    info!(
        servers = ?agent.handler.servers,
        batchsize = agent.handler.batchsize,
        timeout = agent.handler.timeout,
        interval_secs = agent.interval_secs,
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&agent);
        return Ok(());
    }

    let pipeline = Pipeline::new(PipelineConfig {
        agent,
        once: args.once,
        metrics_port: (args.metrics_port != 0).then_some(args.metrics_port),
    });

    let stats = pipeline
        .run(shutdown_signal())
        .await
        .context("Collection loop failed")?;

    info!(
        cycles = stats.cycles.total_cycles,
        points = stats.cycles.total_points,
        duration_secs = stats.duration.as_secs_f64(),
        points_per_sec = format!("{:.2}", stats.points_per_sec()),
        "raidtsdb finished"
    );
    stats.print_summary();
    Ok(())
}

fn apply_overrides(agent: &mut AgentConfig, args: &RunArgs) {
    if let Some(ref servers) = args.servers {
        info!(servers = ?servers, "Overriding servers from CLI");
        agent.handler.servers = servers.clone();
    }
    if let Some(batchsize) = args.batchsize {
        info!(batchsize, "Overriding batchsize from CLI");
        agent.handler.batchsize = batchsize;
    }
    if let Some(timeout) = args.timeout {
        info!(timeout, "Overriding timeout from CLI");
        agent.handler.timeout = timeout;
    }
    if let Some(ref hostname) = args.hostname {
        info!(hostname = %hostname, "Overriding hostname from CLI");
        agent.hostname = Some(hostname.clone());
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(agent: &AgentConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!(
        "Host: {}",
        collector::resolve_hostname(agent.hostname.as_deref())
    );
    println!("Path prefix: {}.<host>.{}", agent.path_prefix, agent.collector.path);
    println!("Interval: {}s", agent.interval_secs);

    println!("\nCollector:");
    println!("  MegaCli: {}", agent.collector.bin);
    if agent.collector.use_sudo {
        println!("  sudo: {}", agent.collector.sudo_cmd);
    }

    println!("\nOpenTSDB ({} servers):", agent.handler.servers.len());
    for server in &agent.handler.servers {
        println!("  - http://{}/api/put", server);
    }
    println!("  batchsize: {}", agent.handler.batchsize);
    println!("  timeout: {}s", agent.handler.timeout);
    if !agent.handler.tags.is_empty() {
        println!("  tags: {}", agent.handler.tags.join(", "));
    }
    for pattern in &agent.handler.tagsinmetric {
        println!("  tagsinmetric: {}", pattern);
    }
    println!();
}
