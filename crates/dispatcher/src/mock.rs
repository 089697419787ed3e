//! MockTransport - scripted BatchTransport for tests and dry runs
//!
//! Clones share state, so a test can keep one handle while the dispatcher
//! owns another.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use contracts::{BatchTransport, ContractError, TransportResponse, TsdbDataPoint};

/// One `send` call as seen by the mock
#[derive(Debug, Clone)]
pub struct SentRequest {
    pub endpoint: String,
    pub points: Vec<TsdbDataPoint>,
    /// false when the endpoint was scripted to fail
    pub connected: bool,
}

#[derive(Debug, Default)]
struct MockState {
    requests: Vec<SentRequest>,
    failing: HashSet<String>,
    statuses: HashMap<String, u16>,
    closed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to `endpoint` a transport failure
    pub fn fail_endpoint(&self, endpoint: impl Into<String>) -> &Self {
        if let Ok(mut state) = self.state.lock() {
            state.failing.insert(endpoint.into());
        }
        self
    }

    /// Answer sends to `endpoint` with `status` (default 204)
    pub fn respond_with(&self, endpoint: impl Into<String>, status: u16) -> &Self {
        if let Ok(mut state) = self.state.lock() {
            state.statuses.insert(endpoint.into(), status);
        }
        self
    }

    /// Every send attempt, failed ones included
    pub fn requests(&self) -> Vec<SentRequest> {
        self.state
            .lock()
            .map(|s| s.requests.clone())
            .unwrap_or_default()
    }

    /// Attempts that reached an endpoint
    pub fn delivered(&self) -> Vec<SentRequest> {
        self.requests().into_iter().filter(|r| r.connected).collect()
    }

    pub fn close_count(&self) -> usize {
        self.state.lock().map(|s| s.closed).unwrap_or_default()
    }
}

impl BatchTransport for MockTransport {
    async fn send(&mut self, endpoint: &str, body: Bytes) -> Result<TransportResponse, ContractError> {
        let points: Vec<TsdbDataPoint> = serde_json::from_slice(&body).unwrap_or_default();
        let mut state = self
            .state
            .lock()
            .map_err(|_| ContractError::transport(endpoint, "mock state poisoned"))?;

        let connected = !state.failing.contains(endpoint);
        state.requests.push(SentRequest {
            endpoint: endpoint.to_string(),
            points,
            connected,
        });

        if !connected {
            return Err(ContractError::transport(endpoint, "connection refused"));
        }
        let status = state.statuses.get(endpoint).copied().unwrap_or(204);
        Ok(TransportResponse {
            status,
            body: String::new(),
        })
    }

    async fn close(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.closed += 1;
        }
    }
}
