//! MetricSink implementations

mod log;
mod tsdb;

pub use self::log::LogSink;
pub use self::tsdb::TsdbSink;
