//! BatchTransport trait - network seam under the batch dispatcher

use bytes::Bytes;

use crate::ContractError;

/// What came back from an endpoint that accepted the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    /// Remote refused the payload (status >= 400)
    pub fn is_rejection(&self) -> bool {
        self.status >= 400
    }
}

/// Request/response transport for serialized batches
#[trait_variant::make(BatchTransport: Send)]
pub trait LocalBatchTransport {
    /// Send one serialized batch to `endpoint`
    ///
    /// # Errors
    /// `ContractError::Transport` for connection-level failures, including timeouts.
    /// An error status code is NOT an error here; it is returned in the response.
    async fn send(&mut self, endpoint: &str, body: Bytes)
        -> Result<TransportResponse, ContractError>;

    /// Release the underlying connection resource
    async fn close(&mut self);
}
