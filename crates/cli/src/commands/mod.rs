//! Command implementations.

mod collect;
mod run;
mod validate;

pub use collect::run_collect;
pub use run::run_agent;
pub use validate::run_validate;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::AgentConfig;

use crate::error::CliError;

/// Load and validate a config file, with a clear error for a missing path
pub(crate) fn load_config(path: &Path) -> Result<AgentConfig> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }
    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
