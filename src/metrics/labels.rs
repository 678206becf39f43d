//! Dimensional label sets and their canonical string form.
//!
//! Series lookup happens by string key, so two label sets that differ only
//! in insertion order must serialize identically. Canonicalization (sort by
//! label name, join `key:value` pairs with commas) is the single function
//! every read and write path goes through.

/// An unordered set of `name → value` labels attached to a metric series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    pairs: Vec<(String, String)>,
}

impl LabelSet {
    /// An empty label set (series without dimensions).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label, builder-style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((name.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Canonical series key: labels sorted lexicographically by name,
    /// rendered as `key:value` pairs joined with commas.
    ///
    /// Note the `key:value` pairing (not the standard `key="value"` of the
    /// Prometheus text format); see [`registry`](super::registry) for why
    /// this is kept.
    pub fn canonical_key(&self) -> String {
        let mut sorted: Vec<&(String, String)> = self.pairs.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        sorted
            .iter()
            .map(|(name, value)| format!("{}:{}", name, value))
            .collect::<Vec<_>>()
            .join(",")
    }
}
