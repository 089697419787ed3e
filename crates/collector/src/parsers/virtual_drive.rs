//! `-LDInfo` parser: RAID level, state, member count, cache policy, bad blocks

use contracts::ReportKind;
use tracing::trace;

use super::{field_bool, field_int, header_int, split_field, ParsedMetrics};
use crate::error::{CollectorError, Result};

const REPORT: ReportKind = ReportKind::Virtual;

/// Byte offset of the primary level digit in `Primary-1, Secondary-0, ...`
const RAID_LEVEL_OFFSET: usize = 8;

/// Cursor while scanning `-LDInfo` output
#[derive(Debug, Default)]
struct VirtualContext {
    adapter: u32,
    vd: u32,
    /// Last `Default Cache Policy` seen in the current drive block
    default_cache_policy: Option<String>,
}

impl VirtualContext {
    fn metric(&self, leaf: &str) -> String {
        format!("vd.adapter{}.virt{}.{}", self.adapter, self.vd, leaf)
    }
}

/// Parse `MegaCli -LDInfo -Lall -aALL` output
///
/// Emits `vd.adapter<N>.virt<V>.{raid_level,state_optimal,drives,cache_policy_default,bad_blocks}`.
/// `Default Cache Policy` is remembered rather than emitted; `cache_policy_default`
/// is 1 when `Current Cache Policy` matches it.
///
/// # Errors
/// A malformed `Adapter` / `Virtual Drive:` header, or a recognized field whose
/// value does not convert, fails the whole pass.
pub fn parse_virtual(output: &str) -> Result<ParsedMetrics> {
    let mut ctx = VirtualContext::default();
    let mut metrics = ParsedMetrics::new();

    for (idx, raw) in output.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("Adapter ") {
            ctx.adapter = header_int(REPORT, line_no, line, first_token(rest))?;
            ctx.default_cache_policy = None;
            continue;
        }
        if let Some(rest) = line.strip_prefix("Virtual Drive: ") {
            ctx.vd = header_int(REPORT, line_no, line, first_token(rest))?;
            ctx.default_cache_policy = None;
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
            "RAID Level" => ("raid_level", parse_raid_level(line_no, key, value)?),
            "State" => ("state_optimal", i64::from(value == "Optimal")),
            "Number Of Drives" => ("drives", field_int(REPORT, line_no, key, value)?),
            "Default Cache Policy" => {
                ctx.default_cache_policy = Some(value.to_string());
                continue;
            }
            "Current Cache Policy" => {
                let matches_default = ctx.default_cache_policy.as_deref() == Some(value);
                ("cache_policy_default", i64::from(matches_default))
            }
            "Bad Blocks Exist" => ("bad_blocks", field_bool(REPORT, line_no, key, value)?),
            _ => continue,
        };

        trace!(adapter = ctx.adapter, vd = ctx.vd, leaf, value = parsed, "vd field");
        metrics.insert(ctx.metric(leaf), parsed);
    }

    Ok(metrics)
}

/// Text up to the next space (or the whole string)
fn first_token(rest: &str) -> &str {
    rest.split_once(' ').map_or(rest, |(token, _)| token)
}

/// `"Primary-1, Secondary-0, RAID Level Qualifier-0"` → 1
fn parse_raid_level(line_no: usize, key: &str, value: &str) -> Result<i64> {
    value
        .get(RAID_LEVEL_OFFSET..RAID_LEVEL_OFFSET + 1)
        .and_then(|digit| digit.parse().ok())
        .ok_or_else(|| {
            CollectorError::invalid_value(
                REPORT,
                line_no,
                key,
                value,
                format!("expected a digit at offset {RAID_LEVEL_OFFSET}"),
            )
        })
}
