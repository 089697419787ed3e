//! HttpTransport - reqwest client posting JSON batches

use std::time::Duration;

use bytes::Bytes;
use contracts::{BatchTransport, ContractError, TransportResponse};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::DispatcherError;

/// One HTTP session shared by every endpoint of a dispatcher
pub struct HttpTransport {
    client: Option<Client>,
    timeout: Duration,
}

impl HttpTransport {
    /// `timeout` bounds both connect and the whole request
    pub fn new(timeout: Duration) -> Result<Self, DispatcherError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| DispatcherError::TransportSetup(e.to_string()))?;

        Ok(Self {
            client: Some(client),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }
}

impl BatchTransport for HttpTransport {
    #[instrument(name = "http_transport_send", skip(self, body), fields(bytes = body.len()))]
    async fn send(&mut self, endpoint: &str, body: Bytes) -> Result<TransportResponse, ContractError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ContractError::transport(endpoint, "transport is closed"))?;

        let response = client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ContractError::transport(endpoint, e.to_string()))?;

        let status = response.status().as_u16();
        // Body is only used for the rejection warning.
        let body = response.text().await.unwrap_or_default();
        debug!(endpoint, status, "Batch response");

        Ok(TransportResponse { status, body })
    }

    async fn close(&mut self) {
        if self.client.take().is_some() {
            debug!("HTTP transport closed");
        }
    }
}
