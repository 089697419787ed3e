//! # Collector
//!
//! MegaRAID status collection module.
//!
//! Responsibilities:
//! - Build the three MegaCli command lines (with optional sudo prefix)
//! - Parse each captured report into `pd.*` / `vd.*` / `bbu.*` integer metrics
//! - Publish every fact as a `MetricPoint` to a `MetricSink`
//! - Isolate failures per report: one bad report never hides the other two
//!
//! ## Usage Example
//!
//! ```ignore
//! use collector::{MegaRaidCollector, SystemCommandRunner};
//!
//! let collector = MegaRaidCollector::new(config.collector, SystemCommandRunner, "servers", "web01");
//! let report = collector.collect(&mut sink).await;
//! println!("published {}", report.total_published());
//! ```
//!
//! ## Parsing only
//!
//! ```
//! use collector::parsers::parse_physical;
//!
//! let metrics = parse_physical("Adapter #0\nSlot Number: 3\nMedia Error Count: 7\n").unwrap();
//! assert_eq!(metrics["pd.adapter0.phy3.media_errors"], 7);
//! ```

mod command;
mod error;
mod host;
mod megaraid;
mod metrics;
mod mock;
pub mod parsers;

// Re-exports
pub use command::{build_argv, SystemCommandRunner};
pub use contracts::{MetricPoint, ReportKind};
pub use error::{CollectorError, Result};
pub use host::resolve_hostname;
pub use megaraid::{CollectionReport, MegaRaidCollector, ReportFailure};
pub use metrics::{CollectorMetrics, MetricsSnapshot};
pub use mock::StaticCommandRunner;
pub use parsers::ParsedMetrics;
