//! Value normalization shared by the parsers

use crate::error::{CollectorError, Result};

const TRUE_WORDS: [&str; 5] = ["true", "t", "yes", "y", "1"];
const FALSE_WORDS: [&str; 6] = ["false", "f", "no", "n", "0", ""];

/// Normalize a yes/no style string
///
/// Case-insensitive. An empty string reads as false.
///
/// # Errors
/// `CollectorError::InvalidBoolean` for anything outside the vocabulary.
pub fn parse_bool(value: &str) -> Result<bool> {
    let normalized = value.trim().to_lowercase();
    if TRUE_WORDS.contains(&normalized.as_str()) {
        Ok(true)
    } else if FALSE_WORDS.contains(&normalized.as_str()) {
        Ok(false)
    } else {
        Err(CollectorError::InvalidBoolean(value.to_string()))
    }
}

/// Turn a BBU field label into a metric leaf
///
/// Drops a trailing `& ...` annotation, lowercases, spaces become underscores.
pub fn slugify(key: &str) -> String {
    let key = match key.find('&') {
        Some(pos) if pos > 0 => key[..pos].trim(),
        _ => key,
    };
    key.to_lowercase().replace(' ', "_")
}

/// Strip units from a BBU value
///
/// `"OK"` → 1, `"1559"` → 1559, `"27 C"` → 27, yes/no → 1/0.
/// Anything else yields `None` and the fact is dropped.
pub fn nounit(value: &str) -> Option<i64> {
    if value == "OK" {
        return Some(1);
    }
    if is_numeric(value) {
        return value.parse().ok();
    }

    let words: Vec<&str> = value.split(' ').collect();
    if words.len() == 2 && is_numeric(words[0]) {
        return words[0].parse().ok();
    }

    parse_bool(value).ok().map(i64::from)
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
