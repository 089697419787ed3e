//! TagSet - time-series tags attached to a data point

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered tag map (keys unique, later inserts win)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeMap<String, String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key=value` strings
    ///
    /// Splits on the first `=`. Entries with no `=`, or an empty key, are ignored.
    pub fn parse_list<S: AsRef<str>>(entries: &[S]) -> Self {
        let mut tags = Self::new();
        for entry in entries {
            if let Some((key, value)) = entry.as_ref().split_once('=') {
                if !key.is_empty() {
                    tags.insert(key, value);
                }
            }
        }
        tags
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Overlay `other` on top of self
    pub fn merge(&mut self, other: &TagSet) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = Self::new();
        for (k, v) in iter {
            tags.insert(k, v);
        }
        tags
    }
}
