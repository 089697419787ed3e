//! AgentConfig - Config Loader output
//!
//! Describes one agent: where MegaCli lives, how metric paths are built,
//! and which OpenTSDB servers receive the data.

use serde::{Deserialize, Serialize};

/// Complete agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Host name used in metric paths and the `hostname` tag
    /// (None = detect from the OS)
    #[serde(default)]
    pub hostname: Option<String>,

    /// First metric path segment
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,

    /// Seconds between collection cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// MegaRAID collector settings
    #[serde(default)]
    pub collector: CollectorConfig,

    /// OpenTSDB handler settings
    #[serde(default)]
    pub handler: TsdbHandlerConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            hostname: None,
            path_prefix: default_path_prefix(),
            interval_secs: default_interval_secs(),
            collector: CollectorConfig::default(),
            handler: TsdbHandlerConfig::default(),
        }
    }
}

fn default_path_prefix() -> String {
    "servers".to_string()
}

fn default_interval_secs() -> u64 {
    60
}

/// MegaRAID collector settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Path to the MegaCli binary
    #[serde(default = "default_bin")]
    pub bin: String,

    /// Prefix commands with `sudo_cmd`
    #[serde(default)]
    pub use_sudo: bool,

    /// Path to sudo
    #[serde(default = "default_sudo_cmd")]
    pub sudo_cmd: String,

    /// Collector segment in metric paths
    #[serde(default = "default_collector_path")]
    pub path: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            bin: default_bin(),
            use_sudo: false,
            sudo_cmd: default_sudo_cmd(),
            path: default_collector_path(),
        }
    }
}

fn default_bin() -> String {
    "MegaCli64".to_string()
}

fn default_sudo_cmd() -> String {
    "/usr/bin/sudo".to_string()
}

fn default_collector_path() -> String {
    "megaraid".to_string()
}

/// OpenTSDB handler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TsdbHandlerConfig {
    /// `host:port` entries; one is picked at random as primary
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    /// Connection + request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Points per request
    #[serde(default = "default_batchsize")]
    pub batchsize: usize,

    /// `key=value` tags added to every point
    #[serde(default)]
    pub tags: Vec<String>,

    /// Regexes with named groups that move path segments into tags
    #[serde(default)]
    pub tagsinmetric: Vec<String>,
}

impl Default for TsdbHandlerConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            timeout: default_timeout(),
            batchsize: default_batchsize(),
            tags: Vec::new(),
            tagsinmetric: Vec::new(),
        }
    }
}

fn default_servers() -> Vec<String> {
    vec!["localhost:4242".to_string()]
}

fn default_timeout() -> u64 {
    5
}

fn default_batchsize() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config: AgentConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.path_prefix, "servers");
        assert_eq!(config.interval_secs, 60);
        assert_eq!(config.collector.bin, "MegaCli64");
        assert!(!config.collector.use_sudo);
        assert_eq!(config.collector.sudo_cmd, "/usr/bin/sudo");
        assert_eq!(config.handler.servers, vec!["localhost:4242"]);
        assert_eq!(config.handler.timeout, 5);
        assert_eq!(config.handler.batchsize, 10);
        assert!(config.handler.tags.is_empty());
    }
}
