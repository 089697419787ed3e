//! Process execution for MegaCli invocations

use std::process::Stdio;

use contracts::{CollectorConfig, CommandRunner, ContractError, ReportKind};
use tokio::process::Command;
use tracing::{debug, instrument};

/// Full argv for one report, sudo prefix included when configured
pub fn build_argv(config: &CollectorConfig, kind: ReportKind) -> Vec<String> {
    let mut argv = Vec::with_capacity(kind.cli_args().len() + 2);
    if config.use_sudo {
        argv.push(config.sudo_cmd.clone());
    }
    argv.push(config.bin.clone());
    argv.extend(kind.cli_args().iter().map(|arg| arg.to_string()));
    argv
}

/// Runs commands on the local machine via `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    #[instrument(name = "system_command_run", skip(self, argv), fields(program = argv.first().map(String::as_str).unwrap_or("")))]
    async fn run(&self, argv: &[String]) -> Result<String, ContractError> {
        let command_line = argv.join(" ");
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ContractError::execution("", "empty command line"))?;

        debug!(command = %command_line, "Running command");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ContractError::execution(&command_line, format!("failed to launch: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ContractError::execution(
                &command_line,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        debug!(command = %command_line, bytes = output.stdout.len(), "Command finished");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
