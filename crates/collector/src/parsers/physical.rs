//! `-PDList` parser: per-disk error counters, temperature and SMART flag

use contracts::ReportKind;
use tracing::trace;

use super::{field_bool, field_int, header_int, split_field, ParsedMetrics};
use crate::error::{CollectorError, Result};

const REPORT: ReportKind = ReportKind::Physical;

/// Cursor while scanning `-PDList` output
#[derive(Debug, Default)]
struct PhysicalContext {
    adapter: u32,
    slot: u32,
}

impl PhysicalContext {
    fn metric(&self, leaf: &str) -> String {
        format!("pd.adapter{}.phy{}.{}", self.adapter, self.slot, leaf)
    }
}

/// Parse `MegaCli -PDList -aALL` output
///
/// Emits `pd.adapter<N>.phy<S>.{media_errors,other_errors,predictive_failures,temperature,smart_alert}`.
///
/// # Errors
/// A malformed `Adapter #` / `Slot Number:` header, or a recognized field whose
/// value does not convert, fails the whole pass.
pub fn parse_physical(output: &str) -> Result<ParsedMetrics> {
    let mut ctx = PhysicalContext::default();
    let mut metrics = ParsedMetrics::new();

    for (idx, raw) in output.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() {
            continue;
        }
        if let Some(digits) = line.strip_prefix("Adapter #") {
            ctx.adapter = header_int(REPORT, line_no, line, digits)?;
            continue;
        }
        if line.starts_with("Enclosure Device ID: ") {
            continue;
        }
        if let Some(digits) = line.strip_prefix("Slot Number: ") {
            ctx.slot = header_int(REPORT, line_no, line, digits)?;
            continue;
        }
        if line.starts_with("Exit Code: ") {
            continue;
        }

        let Some((key, value)) = split_field(line) else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        let (leaf, parsed) = match key {
            "Media Error Count" => ("media_errors", field_int(REPORT, line_no, key, value)?),
            "Other Error Count" => ("other_errors", field_int(REPORT, line_no, key, value)?),
            "Predictive Failure Count" => {
                ("predictive_failures", field_int(REPORT, line_no, key, value)?)
            }
            "Drive Temperature" if value == "N/A" => continue,
            "Drive Temperature" => ("temperature", parse_temperature(line_no, key, value)?),
            "Drive has flagged a S.M.A.R.T alert" => {
                ("smart_alert", field_bool(REPORT, line_no, key, value)?)
            }
            _ => continue,
        };

        trace!(adapter = ctx.adapter, slot = ctx.slot, leaf, value = parsed, "pd field");
        metrics.insert(ctx.metric(leaf), parsed);
    }

    Ok(metrics)
}

/// Leading integer before any unit suffix
///
/// `"32C (89.60 F)"` → 32, `"35F"` → 35, `"35"` → 35.
fn parse_temperature(line_no: usize, key: &str, value: &str) -> Result<i64> {
    let trimmed = value.trim_start();
    let sign_len = usize::from(trimmed.starts_with('-'));
    let digits_len = trimmed[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len() - sign_len);
    trimmed[..sign_len + digits_len].parse().map_err(|e| {
        CollectorError::invalid_value(REPORT, line_no, key, value, format!("{e}"))
    })
}
