//! CommandRunner trait - process execution seam
//!
//! The collector never spawns processes itself; it asks a runner for the
//! captured stdout of an argv.

use crate::ContractError;

/// External command execution
#[trait_variant::make(CommandRunner: Send)]
pub trait LocalCommandRunner {
    /// Run `argv` to completion and return its stdout
    ///
    /// # Errors
    /// `ContractError::Execution` on launch failure or nonzero exit
    async fn run(&self, argv: &[String]) -> Result<String, ContractError>;
}
