//! `-AdpBbuCmd` parser: battery status, grouped by report section

use std::fmt;

use contracts::ReportKind;
use tracing::trace;

use super::{header_int, nounit, slugify, split_field, ParsedMetrics};
use crate::error::Result;

const REPORT: ReportKind = ReportKind::Bbu;

/// Section of the BBU report that indented fields belong to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum BbuSection {
    #[default]
    None,
    Firmware,
    GasGauge,
    Capacity,
    Design,
    Properties,
}

impl BbuSection {
    /// Header prefixes, checked in order before generic `key: value` handling
    const HEADERS: [(&'static str, BbuSection); 5] = [
        ("BBU Firmware Status:", BbuSection::Firmware),
        ("GasGuageStatus:", BbuSection::GasGauge),
        ("BBU Capacity Info", BbuSection::Capacity),
        ("BBU Design Info", BbuSection::Design),
        ("BBU Properties", BbuSection::Properties),
    ];

    fn from_header(line: &str) -> Option<Self> {
        Self::HEADERS
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix))
            .map(|(_, section)| *section)
    }

    fn as_str(&self) -> &'static str {
        match self {
            BbuSection::None => "",
            BbuSection::Firmware => "fw",
            BbuSection::GasGauge => "gasgauge",
            BbuSection::Capacity => "capacity",
            BbuSection::Design => "design",
            BbuSection::Properties => "prop",
        }
    }
}

impl fmt::Display for BbuSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cursor while scanning `-AdpBbuCmd` output
#[derive(Debug, Default)]
struct BbuContext {
    adapter: u32,
    section: BbuSection,
}

impl BbuContext {
    /// Indented fields live under the current section; flush-left ones do not
    fn metric(&self, key: &str, indented: bool) -> String {
        if indented && self.section != BbuSection::None {
            format!("bbu.adapter{}.{}.{}", self.adapter, self.section, key)
        } else {
            format!("bbu.adapter{}.{}", self.adapter, key)
        }
    }
}

/// Parse `MegaCli -AdpBbuCmd -aAll` output
///
/// Every `key: value` line becomes `bbu.adapter<N>[.<section>].<slug>` when its
/// value reduces to an integer (see [`nounit`]); other values are dropped.
/// The section carries over an adapter header; only a new section header
/// changes it.
///
/// # Errors
/// Only a malformed `BBU status for Adapter:` header fails the pass.
pub fn parse_bbu(output: &str) -> Result<ParsedMetrics> {
    let mut ctx = BbuContext::default();
    let mut metrics = ParsedMetrics::new();

    for (idx, line) in output.lines().enumerate() {
        let line_no = idx + 1;

        if line.trim().is_empty() {
            continue;
        }
        if let Some(digits) = line.strip_prefix("BBU status for Adapter: ") {
            ctx.adapter = header_int(REPORT, line_no, line, digits)?;
            continue;
        }
        if line.starts_with("Exit Code: ") {
            continue;
        }
        if let Some(section) = BbuSection::from_header(line) {
            ctx.section = section;
            continue;
        }

        let Some((raw_key, raw_value)) = split_field(line) else {
            continue;
        };
        let Some(value) = nounit(raw_value.trim()) else {
            trace!(line = line_no, value = raw_value.trim(), "bbu value dropped");
            continue;
        };

        let indented = raw_key.starts_with(char::is_whitespace);
        let name = ctx.metric(&slugify(raw_key.trim()), indented);
        metrics.insert(name, value);
    }

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollectorError;

    #[test]
    fn test_sections_prefix_indented_keys() {
        let output = "\
BBU status for Adapter: 0

Voltage: 4073 mV
Temperature: 27 C
BBU Firmware Status:

  Voltage                                 : OK
  Learn Cycle Requested                   : No
  Pack is about to fail & should be replaced : No
GasGuageStatus:
  Fully Charged                           : Yes
Relative State of Charge: 100 %
";
        let metrics = parse_bbu(output).unwrap();
        assert_eq!(metrics["bbu.adapter0.voltage"], 4073);
        assert_eq!(metrics["bbu.adapter0.temperature"], 27);
        assert_eq!(metrics["bbu.adapter0.fw.voltage"], 1);
        assert_eq!(metrics["bbu.adapter0.fw.learn_cycle_requested"], 0);
        assert_eq!(metrics["bbu.adapter0.fw.pack_is_about_to_fail"], 0);
        assert_eq!(metrics["bbu.adapter0.gasgauge.fully_charged"], 1);
        assert_eq!(metrics["bbu.adapter0.relative_state_of_charge"], 100);
    }

    #[test]
    fn test_tab_indentation_counts() {
        let output = "BBU status for Adapter: 1\nBBU Design Info for Adapter: 1\n\tDesign Capacity: 1800 mAh\n";
        let metrics = parse_bbu(output).unwrap();
        assert_eq!(metrics["bbu.adapter1.design.design_capacity"], 1800);
    }

    #[test]
    fn test_uncoercible_values_dropped() {
        let output = "\
BBU status for Adapter: 0
BatteryType: iBBU
Battery State: Optimal
  Charging Status : None
Date of Manufacture: 04/11, 2011
";
        let metrics = parse_bbu(output).unwrap();
        assert!(metrics.is_empty(), "got {metrics:?}");
    }

    #[test]
    fn test_indented_field_before_any_section() {
        let metrics = parse_bbu("BBU status for Adapter: 0\n  Cycle Count: 44\n").unwrap();
        assert_eq!(metrics["bbu.adapter0.cycle_count"], 44);
    }

    #[test]
    fn test_section_carries_over_adapter_header() {
        let output = "\
BBU status for Adapter: 0
BBU Capacity Info for Adapter: 0
  Cycle Count: 44
BBU status for Adapter: 1
  Cycle Count: 12
BBU Design Info for Adapter: 1
  Design Capacity: 1800 mAh
";
        let metrics = parse_bbu(output).unwrap();
        assert_eq!(metrics["bbu.adapter0.capacity.cycle_count"], 44);
        assert_eq!(metrics["bbu.adapter1.capacity.cycle_count"], 12);
        assert_eq!(metrics["bbu.adapter1.design.design_capacity"], 1800);
        assert!(!metrics.contains_key("bbu.adapter1.cycle_count"));
    }

    #[test]
    fn test_malformed_adapter_header() {
        let err = parse_bbu("BBU status for Adapter: A\n").unwrap_err();
        assert!(matches!(err, CollectorError::MalformedHeader { .. }));
    }
}
