//! Metric data carried between collector and dispatcher

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TagSet;

/// A single collected fact
///
/// Built by the collector once per parsed value and handed to a sink by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricPoint {
    /// Dotted metric path, e.g. `servers.web01.megaraid.pd.adapter0.phy0.media_errors`
    pub path: String,

    /// Integer value (booleans are 0/1)
    pub value: i64,

    /// Unix timestamp (seconds)
    pub timestamp: i64,

    /// Originating host
    pub host: String,
}

impl MetricPoint {
    pub fn new(
        path: impl Into<String>,
        value: i64,
        timestamp: i64,
        host: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            value,
            timestamp,
            host: host.into(),
        }
    }
}

/// One element of the `/api/put` JSON array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsdbDataPoint {
    pub metric: String,
    pub timestamp: i64,
    pub value: i64,
    pub tags: TagSet,
}

/// The three MegaCli reports collected each cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// `-PDList`: physical disks
    Physical,
    /// `-LDInfo`: virtual drives
    Virtual,
    /// `-AdpBbuCmd`: battery backup unit
    Bbu,
}

impl ReportKind {
    /// Collection order
    pub const ALL: [ReportKind; 3] = [ReportKind::Physical, ReportKind::Virtual, ReportKind::Bbu];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Physical => "physical",
            ReportKind::Virtual => "virtual",
            ReportKind::Bbu => "bbu",
        }
    }

    /// MegaCli arguments following the binary path
    pub fn cli_args(&self) -> &'static [&'static str] {
        match self {
            ReportKind::Physical => &["-PDList", "-aALL", "-NoLog"],
            ReportKind::Virtual => &["-LDInfo", "-Lall", "-aALL", "-NoLog"],
            ReportKind::Bbu => &["-AdpBbuCmd", "-aAll", "-NoLog"],
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
