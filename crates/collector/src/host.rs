//! Origin host resolution

/// Configured hostname, or the OS hostname truncated at the first dot
///
/// Metric paths use the host as a single segment, so a fully qualified
/// name is cut down to its short form.
pub fn resolve_hostname(configured: Option<&str>) -> String {
    if let Some(name) = configured {
        return name.to_string();
    }
    let full = gethostname::gethostname().to_string_lossy().into_owned();
    short_name(&full)
}

fn short_name(full: &str) -> String {
    let short = full.split('.').next().unwrap_or_default();
    if short.is_empty() {
        "localhost".to_string()
    } else {
        short.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_wins() {
        assert_eq!(resolve_hostname(Some("db01")), "db01");
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("web01.dc1.example.com"), "web01");
        assert_eq!(short_name("web01"), "web01");
        assert_eq!(short_name(""), "localhost");
    }

    #[test]
    fn test_detected_has_no_dots() {
        assert!(!resolve_hostname(None).contains('.'));
    }
}
