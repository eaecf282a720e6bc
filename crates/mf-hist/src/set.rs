//! Named collections of histograms merged member-wise.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mf_core::{Accumulator, Error, Result};

use crate::histogram::Histogram;

/// A named mapping of [`Histogram`]s sharing one merge schema.
///
/// Two sets merge only if they hold exactly the same names and every pair of
/// same-named histograms has identical axes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistogramSet {
    histograms: BTreeMap<String, Histogram>,
}

impl HistogramSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a histogram, returning the one previously stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, histogram: Histogram) -> Option<Histogram> {
        self.histograms.insert(name.into(), histogram)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, histogram: Histogram) -> Self {
        self.insert(name, histogram);
        self
    }

    /// Histogram by name.
    pub fn get(&self, name: &str) -> Option<&Histogram> {
        self.histograms.get(name)
    }

    /// Mutable histogram by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Histogram> {
        self.histograms.get_mut(name)
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.histograms.keys().map(String::as_str)
    }

    /// `(name, histogram)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Histogram)> {
        self.histograms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of histograms.
    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    /// Whether the set holds no histograms.
    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }

    /// Fill the one-dimensional histogram `name`.
    pub fn fill(&mut self, name: &str, category: &str, values: &[f64]) -> Result<()> {
        self.histograms
            .get_mut(name)
            .ok_or_else(|| Error::Validation(format!("unknown histogram '{name}'")))?
            .fill(category, values)
    }

    /// Total entries across every histogram and category, flows included.
    pub fn grand_total(&self) -> u64 {
        self.histograms.values().map(Histogram::grand_total).sum()
    }
}

impl Accumulator for HistogramSet {
    fn absorb(&mut self, other: &Self) -> Result<()> {
        if !self.histograms.keys().eq(other.histograms.keys()) {
            return Err(Error::AxisMismatch(format!(
                "histogram sets differ: [{}] vs [{}]",
                self.names().collect::<Vec<_>>().join(", "),
                other.names().collect::<Vec<_>>().join(", ")
            )));
        }
        for (name, ours) in &self.histograms {
            ours.ensure_compatible(&other.histograms[name])
                .map_err(|e| Error::AxisMismatch(format!("histogram '{name}': {e}")))?;
        }
        for (name, ours) in self.histograms.iter_mut() {
            ours.absorb(&other.histograms[name])?;
        }
        Ok(())
    }
}
