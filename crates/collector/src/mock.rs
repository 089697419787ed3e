//! Canned command runner
//!
//! Serves fixed report text per `ReportKind`, for tests and offline replays.

use std::collections::HashMap;
use std::sync::Mutex;

use contracts::{CommandRunner, ContractError, ReportKind};
use tracing::debug;

/// Runner that answers from a table instead of spawning processes
#[derive(Debug, Default)]
pub struct StaticCommandRunner {
    outputs: HashMap<ReportKind, Result<String, String>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl StaticCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `output` for `kind`
    pub fn with_output(mut self, kind: ReportKind, output: impl Into<String>) -> Self {
        self.outputs.insert(kind, Ok(output.into()));
        self
    }

    /// Fail `kind` with an execution error
    pub fn with_failure(mut self, kind: ReportKind, message: impl Into<String>) -> Self {
        self.outputs.insert(kind, Err(message.into()));
        self
    }

    /// Every argv received so far
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn kind_of(argv: &[String]) -> Option<ReportKind> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| argv.iter().any(|arg| arg == kind.cli_args()[0]))
    }
}

impl CommandRunner for StaticCommandRunner {
    async fn run(&self, argv: &[String]) -> Result<String, ContractError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(argv.to_vec());
        }

        let command_line = argv.join(" ");
        let kind = Self::kind_of(argv)
            .ok_or_else(|| ContractError::execution(&command_line, "unknown MegaCli report"))?;
        debug!(report = %kind, "Serving canned output");

        match self.outputs.get(&kind) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(message)) => Err(ContractError::execution(&command_line, message.clone())),
            None => Err(ContractError::execution(&command_line, "no output registered")),
        }
    }
}
