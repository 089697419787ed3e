//! MetricNamer - dotted metric path to (OpenTSDB metric, tags)
//!
//! Paths follow `<category>.<subcategory>.<rest...>`. The first two segments
//! are dropped; when the first is `instances`, the second becomes the
//! `instance` tag. Each `tagsinmetric` pattern is then matched (anchored at
//! the start) against the remaining name, its named captures become tags,
//! and every captured value is cut out of the name wherever it occurs.

use contracts::{MetricPoint, TagSet, TsdbHandlerConfig, TsdbDataPoint};
use regex::Regex;

use crate::error::DispatcherError;

#[derive(Debug, Clone)]
pub struct MetricNamer {
    static_tags: TagSet,
    patterns: Vec<Regex>,
    colons: Regex,
    dots: Regex,
}

impl MetricNamer {
    /// Build from `key=value` tag strings and extraction patterns
    ///
    /// # Errors
    /// A pattern that does not compile.
    pub fn new<S: AsRef<str>>(tags: &[S], patterns: &[S]) -> Result<Self, DispatcherError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(&format!("^(?:{p})"))
                    .map_err(|e| DispatcherError::invalid_pattern(p, e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            static_tags: TagSet::parse_list(tags),
            patterns,
            colons: compile(":+")?,
            dots: compile(r"\.+")?,
        })
    }

    pub fn from_config(config: &TsdbHandlerConfig) -> Result<Self, DispatcherError> {
        Self::new(&config.tags, &config.tagsinmetric)
    }

    /// Derive the metric name and tag set for `path`
    pub fn name(&self, path: &str, host: &str) -> (String, TagSet) {
        let mut tags = TagSet::new();
        tags.insert("hostname", host);
        tags.merge(&self.static_tags);

        let segments: Vec<&str> = path.split('.').collect();
        if segments.first() == Some(&"instances") {
            if let Some(instance) = segments.get(1) {
                tags.insert("instance", *instance);
            }
        }
        let mut metric = segments.get(2..).unwrap_or_default().join(".");

        for pattern in &self.patterns {
            let Some(caps) = pattern.captures(&metric) else {
                continue;
            };
            let captured: Vec<(String, String)> = pattern
                .capture_names()
                .flatten()
                .filter_map(|group| {
                    caps.name(group)
                        .map(|m| (group.to_string(), m.as_str().to_string()))
                })
                .collect();

            for (key, value) in captured {
                if !value.is_empty() {
                    metric = metric.replace(&value, "");
                }
                tags.insert(key, value);
            }
        }

        let metric = self.colons.replace_all(&metric, "_");
        let metric = self.dots.replace_all(&metric, ".").into_owned();
        (metric, tags)
    }

    /// Convert a collected point into its wire form
    pub fn data_point(&self, point: &MetricPoint) -> TsdbDataPoint {
        let (metric, tags) = self.name(&point.path, &point.host);
        TsdbDataPoint {
            metric,
            timestamp: point.timestamp,
            value: point.value,
            tags,
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, DispatcherError> {
    Regex::new(pattern).map_err(|e| DispatcherError::invalid_pattern(pattern, e.to_string()))
}
