//! TsdbSink - MetricNamer + BatchDispatcher behind the MetricSink seam

use std::sync::Arc;
use std::time::Duration;

use contracts::{BatchTransport, ContractError, MetricPoint, MetricSink, TsdbHandlerConfig};
use tracing::{info, instrument};

use crate::batch::BatchDispatcher;
use crate::error::DispatcherError;
use crate::metrics::DeliveryMetrics;
use crate::namer::MetricNamer;
use crate::ring::EndpointRing;
use crate::transport::HttpTransport;

/// Ships points to OpenTSDB
///
/// A dropped batch is logged and counted by the dispatcher; `publish` still
/// succeeds so one lost batch does not fail the collection cycle.
pub struct TsdbSink<T> {
    name: String,
    namer: MetricNamer,
    dispatcher: BatchDispatcher<T>,
}

impl TsdbSink<HttpTransport> {
    /// HTTP sink with a random primary server
    pub fn from_config(config: &TsdbHandlerConfig) -> Result<Self, DispatcherError> {
        let transport = HttpTransport::new(Duration::from_secs(config.timeout))?;
        Self::with_transport(config, transport)
    }
}

impl<T: BatchTransport> TsdbSink<T> {
    pub fn new(namer: MetricNamer, dispatcher: BatchDispatcher<T>) -> Self {
        Self {
            name: "opentsdb".to_string(),
            namer,
            dispatcher,
        }
    }

    /// Sink over any transport (tests, dry runs)
    pub fn with_transport(config: &TsdbHandlerConfig, transport: T) -> Result<Self, DispatcherError> {
        let namer = MetricNamer::from_config(config)?;
        let ring = EndpointRing::new(&config.servers)?;
        info!(
            servers = config.servers.len(),
            primary = ring.primary_endpoint(),
            batchsize = config.batchsize,
            "OpenTSDB sink ready"
        );
        Ok(Self::new(namer, BatchDispatcher::new(transport, ring, config.batchsize)))
    }

    pub fn metrics(&self) -> &Arc<DeliveryMetrics> {
        self.dispatcher.metrics()
    }

    pub fn dispatcher(&self) -> &BatchDispatcher<T> {
        &self.dispatcher
    }

    fn absorb(&self, result: Result<(), DispatcherError>) -> Result<(), ContractError> {
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_data_loss() => Ok(()),
            Err(DispatcherError::Contract(e)) => Err(e),
            Err(e) => Err(ContractError::sink_write(&self.name, e.to_string())),
        }
    }
}

impl<T: BatchTransport> MetricSink for TsdbSink<T> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&mut self, point: MetricPoint) -> Result<(), ContractError> {
        let data_point = self.namer.data_point(&point);
        let result = self.dispatcher.enqueue(data_point).await.map(|_| ());
        self.absorb(result)
    }

    #[instrument(name = "tsdb_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        let result = self.dispatcher.flush().await.map(|_| ());
        self.absorb(result)
    }

    #[instrument(name = "tsdb_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        let result = self.dispatcher.shutdown().await;
        self.absorb(result)
    }
}
