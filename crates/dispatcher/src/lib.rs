//! # Dispatcher
//!
//! Delivery side of the agent.
//!
//! - `MetricNamer`: dotted path to OpenTSDB metric name plus tags
//! - `BatchDispatcher`: fixed-size batches, ring failover across servers
//! - `HttpTransport`: POST to `http://<host:port>/api/put`
//! - Sinks: `TsdbSink` (namer + batcher), `LogSink` (tracing / capture)

pub mod batch;
pub mod error;
pub mod metrics;
pub mod mock;
pub mod namer;
pub mod ring;
pub mod sinks;
pub mod transport;

pub use batch::{BatchDispatcher, FlushOutcome};
pub use contracts::{BatchTransport, MetricSink, TsdbDataPoint};
pub use error::DispatcherError;
pub use metrics::{DeliveryMetrics, DeliverySnapshot};
pub use mock::{MockTransport, SentRequest};
pub use namer::MetricNamer;
pub use ring::EndpointRing;
pub use sinks::{LogSink, TsdbSink};
pub use transport::HttpTransport;
