//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::AgentConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    hostname: String,
    megacli: String,
    use_sudo: bool,
    server_count: usize,
    batchsize: usize,
    timeout_secs: u64,
    tag_count: usize,
    pattern_count: usize,
    interval_secs: u64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(agent) => {
            let warnings = collect_warnings(&agent);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(summarize(&agent)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

fn summarize(agent: &AgentConfig) -> ConfigSummary {
    ConfigSummary {
        hostname: collector::resolve_hostname(agent.hostname.as_deref()),
        megacli: agent.collector.bin.clone(),
        use_sudo: agent.collector.use_sudo,
        server_count: agent.handler.servers.len(),
        batchsize: agent.handler.batchsize,
        timeout_secs: agent.handler.timeout,
        tag_count: contracts::TagSet::parse_list(&agent.handler.tags).len(),
        pattern_count: agent.handler.tagsinmetric.len(),
        interval_secs: agent.interval_secs,
    }
}

/// Non-fatal issues
fn collect_warnings(agent: &AgentConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if agent.handler.servers.len() == 1 {
        warnings.push("Only one server configured - no failover target".to_string());
    }

    for tag in &agent.handler.tags {
        if !matches!(tag.find('='), Some(i) if i > 0) {
            warnings.push(format!("Tag '{}' is not key=value and will be ignored", tag));
        }
    }

    if agent.hostname.is_none() {
        warnings.push("hostname not set - using the machine host name".to_string());
    }

    if agent.handler.batchsize > 1000 {
        warnings.push(format!(
            "batchsize {} is large; a dropped batch loses all of it",
            agent.handler.batchsize
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Host: {}", summary.hostname);
            println!("  MegaCli: {} (sudo: {})", summary.megacli, summary.use_sudo);
            println!("  Servers: {}", summary.server_count);
            println!("  Batch size: {}", summary.batchsize);
            println!("  Timeout: {}s", summary.timeout_secs);
            println!("  Static tags: {}", summary.tag_count);
            println!("  Tag patterns: {}", summary.pattern_count);
            println!("  Interval: {}s", summary.interval_secs);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_valid_config_with_warnings() {
        let file = write_config("[handler]\nservers = [\"tsdb1:4242\"]\ntags = [\"dc=eu\", \"bogus\"]\n");
        let args = ValidateArgs {
            config: file.path().to_path_buf(),
            json: true,
        };

        let result = validate_config(&args);
        assert!(result.valid);
        let warnings = result.warnings.unwrap();
        assert!(warnings.iter().any(|w| w.contains("no failover")));
        assert!(warnings.iter().any(|w| w.contains("'bogus'")));
        assert_eq!(result.summary.unwrap().tag_count, 1);
    }

    #[test]
    fn test_invalid_config() {
        let file = write_config("[handler]\nbatchsize = 0\n");
        let args = ValidateArgs {
            config: file.path().to_path_buf(),
            json: false,
        };

        let result = validate_config(&args);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("batchsize"));
        assert!(run_validate(&args).is_err());
    }

    #[test]
    fn test_missing_file() {
        let args = ValidateArgs {
            config: PathBuf::from("/nonexistent/raidtsdb.toml"),
            json: false,
        };
        let result = validate_config(&args);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("File not found"));
    }
}
