//! MegaCli report parsers
//!
//! Each parser is a pure function: captured text in, `path -> value` map out.
//! Parsers keep their cursor (adapter, slot, section...) in a small context
//! struct owned by the call, so independent parses never share state.

mod bbu;
mod coerce;
mod physical;
mod virtual_drive;

use std::collections::BTreeMap;

use contracts::ReportKind;

use crate::error::{CollectorError, Result};

pub use bbu::parse_bbu;
pub use coerce::{nounit, parse_bool, slugify};
pub use physical::parse_physical;
pub use virtual_drive::parse_virtual;

/// Parsed metrics keyed by dotted name (`pd.adapter0.phy1.temperature`)
pub type ParsedMetrics = BTreeMap<String, i64>;

/// Dispatch to the parser for `kind`
pub fn parse_report(kind: ReportKind, output: &str) -> Result<ParsedMetrics> {
    match kind {
        ReportKind::Physical => parse_physical(output),
        ReportKind::Virtual => parse_virtual(output),
        ReportKind::Bbu => parse_bbu(output),
    }
}

/// Split `key: value` into its two halves
///
/// Lines with zero or more than one colon are not fields.
pub(crate) fn split_field(line: &str) -> Option<(&str, &str)> {
    let mut parts = line.split(':');
    let key = parts.next()?;
    let value = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((key, value))
}

/// Parse the integer of a header line
pub(crate) fn header_int(
    report: ReportKind,
    line_no: usize,
    line: &str,
    digits: &str,
) -> Result<u32> {
    digits
        .trim()
        .parse()
        .map_err(|e| CollectorError::malformed_header(report, line_no, line, format!("{e}")))
}

/// Parse a recognized field value as an integer
pub(crate) fn field_int(
    report: ReportKind,
    line_no: usize,
    key: &str,
    value: &str,
) -> Result<i64> {
    value
        .trim()
        .parse()
        .map_err(|e| CollectorError::invalid_value(report, line_no, key, value, format!("{e}")))
}

/// Parse a recognized field value as a 0/1 boolean
pub(crate) fn field_bool(
    report: ReportKind,
    line_no: usize,
    key: &str,
    value: &str,
) -> Result<i64> {
    parse_bool(value)
        .map(i64::from)
        .map_err(|e| CollectorError::invalid_value(report, line_no, key, value, e.to_string()))
}
