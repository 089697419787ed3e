//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only, never on each other's internals.
//!
//! ## Data flow
//! - `collector` turns MegaCli text into `MetricPoint`s and hands them to a `MetricSink`
//! - `dispatcher` names points into `TsdbDataPoint`s and ships them over a `BatchTransport`
//!
//! ## Time model
//! - Timestamps are unix seconds (`i64`), one timestamp per collection cycle

mod command;
mod config;
mod error;
mod metric;
mod sink;
mod tags;
mod transport;

pub use command::{CommandRunner, LocalCommandRunner};
pub use config::*;
pub use error::*;
pub use metric::*;
pub use sink::{LocalMetricSink, MetricSink};
pub use tags::TagSet;
pub use transport::{BatchTransport, LocalBatchTransport, TransportResponse};
