//! Config validation
//!
//! Rules:
//! - at least one server, each a bare `host:port`
//! - batchsize >= 1, timeout >= 1
//! - every tagsinmetric entry compiles
//! - collector bin (and sudo_cmd when enabled) set
//! - interval and path segments non-empty

use contracts::{AgentConfig, ContractError};
use regex::Regex;

/// Validate an AgentConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &AgentConfig) -> Result<(), ContractError> {
    validate_servers(config)?;
    validate_batching(config)?;
    validate_tag_patterns(config)?;
    validate_collector(config)?;
    validate_paths(config)?;
    Ok(())
}

fn validate_servers(config: &AgentConfig) -> Result<(), ContractError> {
    let servers = &config.handler.servers;
    if servers.is_empty() {
        return Err(ContractError::config_validation(
            "handler.servers",
            "at least one server is required",
        ));
    }

    for (idx, server) in servers.iter().enumerate() {
        if server.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("handler.servers[{}]", idx),
                "server address cannot be empty",
            ));
        }
        if server.contains('/') {
            return Err(ContractError::config_validation(
                format!("handler.servers[{}]", idx),
                format!("expected host:port, got '{}'", server),
            ));
        }
    }
    Ok(())
}

fn validate_batching(config: &AgentConfig) -> Result<(), ContractError> {
    if config.handler.batchsize == 0 {
        return Err(ContractError::config_validation(
            "handler.batchsize",
            "batchsize must be >= 1",
        ));
    }
    if config.handler.timeout == 0 {
        return Err(ContractError::config_validation(
            "handler.timeout",
            "timeout must be >= 1 second",
        ));
    }
    Ok(())
}

fn validate_tag_patterns(config: &AgentConfig) -> Result<(), ContractError> {
    for (idx, pattern) in config.handler.tagsinmetric.iter().enumerate() {
        if let Err(e) = Regex::new(pattern) {
            return Err(ContractError::config_validation(
                format!("handler.tagsinmetric[{}]", idx),
                format!("invalid regex '{}': {}", pattern, e),
            ));
        }
    }
    Ok(())
}

fn validate_collector(config: &AgentConfig) -> Result<(), ContractError> {
    let collector = &config.collector;
    if collector.bin.trim().is_empty() {
        return Err(ContractError::config_validation(
            "collector.bin",
            "MegaCli binary path cannot be empty",
        ));
    }
    if collector.use_sudo && collector.sudo_cmd.trim().is_empty() {
        return Err(ContractError::config_validation(
            "collector.sudo_cmd",
            "sudo_cmd cannot be empty when use_sudo is enabled",
        ));
    }
    Ok(())
}

fn validate_paths(config: &AgentConfig) -> Result<(), ContractError> {
    if config.interval_secs == 0 {
        return Err(ContractError::config_validation(
            "interval_secs",
            "interval_secs must be > 0",
        ));
    }
    if config.path_prefix.is_empty() {
        return Err(ContractError::config_validation(
            "path_prefix",
            "path_prefix cannot be empty",
        ));
    }
    if config.collector.path.is_empty() {
        return Err(ContractError::config_validation(
            "collector.path",
            "collector path cannot be empty",
        ));
    }
    if let Some(ref hostname) = config.hostname {
        if hostname.is_empty() || hostname.contains('.') {
            return Err(ContractError::config_validation(
                "hostname",
                format!("hostname must be a single non-empty path segment, got '{}'", hostname),
            ));
        }
    }
    Ok(())
}
