//! Dispatcher error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatcherError {
    /// No servers configured
    #[error("endpoint ring is empty")]
    EmptyRing,

    /// Primary index outside the ring
    #[error("invalid endpoint configuration: {0}")]
    InvalidEndpoint(String),

    /// A `tagsinmetric` entry failed to compile
    #[error("invalid tag pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Every endpoint failed at transport level; the batch is gone
    #[error("servers exhausted after {attempts} attempts, batch of {points} points dropped")]
    BatchDropped { points: usize, attempts: usize },

    #[error("failed to serialize batch: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client could not be built
    #[error("transport setup failed: {0}")]
    TransportSetup(String),

    /// enqueue after shutdown
    #[error("dispatcher is shut down")]
    Closed,

    #[error("contract error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl DispatcherError {
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Data was lost but the process should carry on
    pub fn is_data_loss(&self) -> bool {
        matches!(self, Self::BatchDropped { .. } | Self::Serialization(_))
    }
}
