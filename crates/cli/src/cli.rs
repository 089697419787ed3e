//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// raidtsdb - MegaRAID health metrics for OpenTSDB
#[derive(Parser, Debug)]
#[command(
    name = "raidtsdb",
    author,
    version,
    about = "MegaRAID status collector for OpenTSDB",
    long_about = "Runs MegaCli periodically, turns physical disk, virtual drive and BBU\n\
                  status into integer metrics, and ships them in batches to one of\n\
                  several OpenTSDB servers with ring failover."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "RAIDTSDB_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "RAIDTSDB_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect on an interval and ship to OpenTSDB
    Run(RunArgs),

    /// Run one collection cycle and print the metrics
    Collect(CollectArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "raidtsdb.toml", env = "RAIDTSDB_CONFIG")]
    pub config: PathBuf,

    /// Override OpenTSDB servers (comma separated host:port)
    #[arg(long, value_delimiter = ',', env = "RAIDTSDB_SERVERS")]
    pub servers: Option<Vec<String>>,

    /// Override points per request
    #[arg(long, env = "RAIDTSDB_BATCHSIZE")]
    pub batchsize: Option<usize>,

    /// Override request timeout in seconds
    #[arg(long, env = "RAIDTSDB_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Override the host name used in metric paths
    #[arg(long, env = "RAIDTSDB_HOSTNAME")]
    pub hostname: Option<String>,

    /// Run a single collection cycle, flush and exit
    #[arg(long)]
    pub once: bool,

    /// Validate configuration and exit without collecting
    #[arg(long)]
    pub dry_run: bool,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", env = "RAIDTSDB_METRICS_PORT")]
    pub metrics_port: u16,
}

#[derive(Parser, Debug)]
pub struct CollectArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "raidtsdb.toml", env = "RAIDTSDB_CONFIG")]
    pub config: PathBuf,

    /// Print metrics as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "raidtsdb.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
