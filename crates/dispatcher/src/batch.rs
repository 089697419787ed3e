//! BatchDispatcher - fixed-size batching with ring failover
//!
//! Points queue in enqueue order. A full queue is flushed before `enqueue`
//! returns. A flush serializes the whole queue as one JSON array and tries
//! the ring starting at the primary:
//!
//! - transport error: next endpoint
//! - error status: warn, batch done (no failover)
//! - ring exhausted: batch dropped, reported once
//!
//! The queue is cleared by every flush attempt, whatever the outcome.

use std::sync::Arc;

use bytes::Bytes;
use contracts::{BatchTransport, TsdbDataPoint};
use tracing::{debug, error, info, instrument, warn};

use crate::error::DispatcherError;
use crate::metrics::DeliveryMetrics;
use crate::ring::EndpointRing;

/// Result of a flush that did not lose data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing pending
    Empty,
    Delivered { endpoint: String, points: usize },
    /// Remote answered with an error status; not retried
    Rejected {
        endpoint: String,
        status: u16,
        points: usize,
    },
}

pub struct BatchDispatcher<T> {
    transport: T,
    ring: EndpointRing,
    batchsize: usize,
    pending: Vec<TsdbDataPoint>,
    metrics: Arc<DeliveryMetrics>,
    closed: bool,
}

impl<T: BatchTransport> BatchDispatcher<T> {
    /// `batchsize` below 1 is treated as 1
    pub fn new(transport: T, ring: EndpointRing, batchsize: usize) -> Self {
        let batchsize = batchsize.max(1);
        Self {
            transport,
            ring,
            batchsize,
            pending: Vec::with_capacity(batchsize),
            metrics: Arc::new(DeliveryMetrics::new()),
            closed: false,
        }
    }

    pub fn metrics(&self) -> &Arc<DeliveryMetrics> {
        &self.metrics
    }

    pub fn ring(&self) -> &EndpointRing {
        &self.ring
    }

    pub fn batchsize(&self) -> usize {
        self.batchsize
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Queue a point; flushes when the queue reaches `batchsize`
    ///
    /// Returns the flush outcome when a flush happened.
    ///
    /// # Errors
    /// - `Closed` after shutdown
    /// - `BatchDropped` when the triggered flush exhausted the ring
    pub async fn enqueue(&mut self, point: TsdbDataPoint) -> Result<Option<FlushOutcome>, DispatcherError> {
        if self.closed {
            return Err(DispatcherError::Closed);
        }

        self.pending.push(point);
        self.update_pending();

        if self.pending.len() >= self.batchsize {
            return self.flush().await.map(Some);
        }
        Ok(None)
    }

    /// Send everything pending as one batch
    #[instrument(name = "batch_flush", skip(self), fields(points = self.pending.len()))]
    pub async fn flush(&mut self) -> Result<FlushOutcome, DispatcherError> {
        if self.pending.is_empty() {
            return Ok(FlushOutcome::Empty);
        }

        let batch = std::mem::take(&mut self.pending);
        self.update_pending();
        let points = batch.len();

        let body = match serde_json::to_vec(&batch) {
            Ok(body) => Bytes::from(body),
            Err(e) => {
                self.record_drop(points);
                return Err(e.into());
            }
        };
        observability::record_batch_points(points);

        let mut attempts = 0;
        for endpoint in self.ring.failover_order() {
            attempts += 1;
            match self.transport.send(endpoint, body.clone()).await {
                Ok(response) if response.is_rejection() => {
                    warn!(
                        endpoint,
                        status = response.status,
                        body = %response.body,
                        "Server rejected batch"
                    );
                    self.metrics.record_rejected(points);
                    observability::record_batch("rejected");
                    return Ok(FlushOutcome::Rejected {
                        endpoint: endpoint.to_string(),
                        status: response.status,
                        points,
                    });
                }
                Ok(response) => {
                    debug!(endpoint, status = response.status, points, "Batch delivered");
                    self.metrics.record_delivered(points);
                    observability::record_batch("delivered");
                    return Ok(FlushOutcome::Delivered {
                        endpoint: endpoint.to_string(),
                        points,
                    });
                }
                Err(e) => {
                    error!(endpoint, error = %e, "Failed sending batch, trying next server");
                    self.metrics.record_transport_failure();
                    observability::record_transport_failure(endpoint);
                }
            }
        }

        error!(points, attempts, "Servers exhausted, batch dropped");
        self.record_drop(points);
        Err(DispatcherError::BatchDropped { points, attempts })
    }

    /// Flush what is left and release the transport
    ///
    /// Safe to call more than once; later calls do nothing.
    #[instrument(name = "batch_shutdown", skip(self))]
    pub async fn shutdown(&mut self) -> Result<(), DispatcherError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let result = self.flush().await.map(|_| ());
        self.transport.close().await;

        let snap = self.metrics.snapshot();
        info!(
            delivered = snap.batches_delivered,
            rejected = snap.batches_rejected,
            dropped = snap.batches_dropped,
            points_sent = snap.points_sent,
            "Batch dispatcher shut down"
        );
        result
    }

    fn record_drop(&self, points: usize) {
        self.metrics.record_dropped(points);
        observability::record_batch("dropped");
    }

    fn update_pending(&self) {
        self.metrics.set_pending(self.pending.len());
        observability::record_pending_points(self.pending.len());
    }
}
