//! EndpointRing - ordered `/api/put` URLs with a fixed primary

use rand::Rng;

use crate::error::DispatcherError;

/// Server ring; failover walks it in order starting at the primary
#[derive(Debug, Clone)]
pub struct EndpointRing {
    endpoints: Vec<String>,
    primary: usize,
}

impl EndpointRing {
    /// Ring over `host:port` entries with a uniformly random primary
    pub fn new<S: AsRef<str>>(servers: &[S]) -> Result<Self, DispatcherError> {
        if servers.is_empty() {
            return Err(DispatcherError::EmptyRing);
        }
        let primary = rand::rng().random_range(0..servers.len());
        Self::with_primary(servers, primary)
    }

    /// Ring with a fixed primary index
    pub fn with_primary<S: AsRef<str>>(servers: &[S], primary: usize) -> Result<Self, DispatcherError> {
        if servers.is_empty() {
            return Err(DispatcherError::EmptyRing);
        }
        if primary >= servers.len() {
            return Err(DispatcherError::InvalidEndpoint(format!(
                "primary index {} out of range for {} servers",
                primary,
                servers.len()
            )));
        }

        let endpoints = servers
            .iter()
            .map(|s| format!("http://{}/api/put", s.as_ref()))
            .collect();
        Ok(Self { endpoints, primary })
    }

    pub fn primary(&self) -> usize {
        self.primary
    }

    pub fn primary_endpoint(&self) -> &str {
        &self.endpoints[self.primary]
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Every endpoint exactly once: primary, primary+1, ... wrapping
    pub fn failover_order(&self) -> impl Iterator<Item = &str> + '_ {
        let n = self.endpoints.len();
        (0..n).map(move |i| self.endpoints[(self.primary + i) % n].as_str())
    }
}
