//! Categorical × binned histogram with explicit flow accounting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mf_core::{Accumulator, Error, Result};

use crate::axis::{AxisBin, BinAxis, CategoryAxis};

/// Under/overflow and NaN totals along one axis (summed over the others).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowCounts {
    /// Entries below the low edge.
    pub underflow: u64,
    /// Entries at or above the high edge.
    pub overflow: u64,
    /// NaN entries.
    pub nan: u64,
}

/// Counting histogram over one categorical axis and one or more [`BinAxis`].
///
/// Storage is a dense `u64` block per category label. Each numeric axis
/// contributes `bins + 3` slots (underflow, regular bins, overflow, NaN), so
/// no filled value is ever dropped.
///
/// Deserialized histograms are checked like constructed ones: at least one
/// axis, and every count block sized to the axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHistogram")]
pub struct Histogram {
    label: String,
    category_axis: CategoryAxis,
    axes: Vec<BinAxis>,
    counts: BTreeMap<String, Vec<u64>>,
}

impl Histogram {
    /// Create an empty histogram. At least one numeric axis is required.
    pub fn new(
        label: impl Into<String>,
        category_axis: CategoryAxis,
        axes: Vec<BinAxis>,
    ) -> Result<Self> {
        if axes.is_empty() {
            return Err(Error::Validation("histogram needs at least one numeric axis".into()));
        }
        let size = axes.iter().try_fold(1usize, |acc, a| acc.checked_mul(a.slots()));
        if size.is_none() {
            return Err(Error::Validation("histogram storage exceeds usize".into()));
        }
        Ok(Self { label: label.into(), category_axis, axes, counts: BTreeMap::new() })
    }

    /// Create an empty one-dimensional histogram.
    pub fn new_1d(label: impl Into<String>, category_axis: CategoryAxis, axis: BinAxis) -> Self {
        Self { label: label.into(), category_axis, axes: vec![axis], counts: BTreeMap::new() }
    }

    /// Quantity label (e.g. `"Counts"`).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The categorical axis.
    pub fn category_axis(&self) -> &CategoryAxis {
        &self.category_axis
    }

    /// The numeric axes in fill order.
    pub fn axes(&self) -> &[BinAxis] {
        &self.axes
    }

    /// Category labels that received at least one entry.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Whether nothing has been filled yet.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Fill a one-dimensional histogram with `values` under `category`.
    ///
    /// An empty slice is a no-op.
    pub fn fill(&mut self, category: &str, values: &[f64]) -> Result<()> {
        if self.axes.len() != 1 {
            return Err(Error::AxisMismatch(format!(
                "1-D fill on a histogram with {} numeric axes",
                self.axes.len()
            )));
        }
        self.fill_nd(category, &[values])
    }

    /// Fill with one column per numeric axis; all columns must have equal length.
    pub fn fill_nd(&mut self, category: &str, columns: &[&[f64]]) -> Result<()> {
        if columns.len() != self.axes.len() {
            return Err(Error::AxisMismatch(format!(
                "histogram has {} numeric axes, got {} columns",
                self.axes.len(),
                columns.len()
            )));
        }
        let n = columns[0].len();
        if let Some((k, col)) = columns.iter().enumerate().find(|(_, c)| c.len() != n) {
            return Err(Error::Shape(format!(
                "fill column {k} ('{}') has {} values, expected {n}",
                self.axes[k].name(),
                col.len()
            )));
        }
        if n == 0 {
            return Ok(());
        }

        let strides = self.strides();
        let size = self.storage_len();
        let axes = &self.axes;
        let block = self.counts.entry(category.to_string()).or_insert_with(|| vec![0; size]);
        for row in 0..n {
            let mut flat = 0usize;
            for (k, axis) in axes.iter().enumerate() {
                flat += axis.slot(columns[k][row]) * strides[k];
            }
            block[flat] += 1;
        }
        Ok(())
    }

    /// Count stored at one located bin per numeric axis.
    ///
    /// Unknown categories read as zero.
    pub fn get(&self, category: &str, bins: &[AxisBin]) -> Result<u64> {
        let flat = self.flat_index(bins)?;
        Ok(self.counts.get(category).map_or(0, |block| block[flat]))
    }

    /// Regular-bin contents of a one-dimensional histogram (flows excluded).
    pub fn values(&self, category: &str) -> Result<Vec<u64>> {
        if self.axes.len() != 1 {
            return Err(Error::AxisMismatch(format!(
                "1-D values requested on a histogram with {} numeric axes",
                self.axes.len()
            )));
        }
        let bins = self.axes[0].bins();
        Ok(match self.counts.get(category) {
            Some(block) => block[1..=bins].to_vec(),
            None => vec![0; bins],
        })
    }

    /// Flow totals along numeric axis `axis`, summed over all other axes.
    pub fn flow(&self, category: &str, axis: usize) -> Result<FlowCounts> {
        let a = self.axes.get(axis).ok_or_else(|| {
            Error::AxisMismatch(format!("axis {axis} out of range ({} axes)", self.axes.len()))
        })?;
        let mut out = FlowCounts::default();
        let Some(block) = self.counts.get(category) else {
            return Ok(out);
        };
        let strides = self.strides();
        let slots = a.slots();
        for (flat, &c) in block.iter().enumerate() {
            if c == 0 {
                continue;
            }
            let slot = (flat / strides[axis]) % slots;
            if slot == 0 {
                out.underflow += c;
            } else if slot == a.bins() + 1 {
                out.overflow += c;
            } else if slot == a.bins() + 2 {
                out.nan += c;
            }
        }
        Ok(out)
    }

    /// Total entries for `category`, flows included.
    pub fn total(&self, category: &str) -> u64 {
        self.counts.get(category).map_or(0, |block| block.iter().sum())
    }

    /// Total entries over all categories, flows included.
    pub fn grand_total(&self) -> u64 {
        self.counts.values().flat_map(|b| b.iter()).sum()
    }

    /// Fail with [`Error::AxisMismatch`] unless `other` has the same quantity
    /// label and identical axes.
    pub fn ensure_compatible(&self, other: &Histogram) -> Result<()> {
        if self.label != other.label {
            return Err(Error::AxisMismatch(format!(
                "quantity '{}' vs '{}'",
                self.label, other.label
            )));
        }
        if self.category_axis != other.category_axis {
            return Err(Error::AxisMismatch(format!(
                "category axis '{}' vs '{}'",
                self.category_axis.name(),
                other.category_axis.name()
            )));
        }
        if self.axes != other.axes {
            let describe = |axes: &[BinAxis]| {
                axes.iter()
                    .map(|a| format!("{}({}, {}, {})", a.name(), a.bins(), a.low(), a.high()))
                    .collect::<Vec<_>>()
                    .join(" x ")
            };
            return Err(Error::AxisMismatch(format!(
                "{} vs {}",
                describe(&self.axes),
                describe(&other.axes)
            )));
        }
        Ok(())
    }

    fn storage_len(&self) -> usize {
        self.axes.iter().map(BinAxis::slots).product()
    }

    /// Row-major strides, last axis fastest.
    fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1usize; self.axes.len()];
        for k in (0..self.axes.len().saturating_sub(1)).rev() {
            strides[k] = strides[k + 1] * self.axes[k + 1].slots();
        }
        strides
    }

    fn flat_index(&self, bins: &[AxisBin]) -> Result<usize> {
        if bins.len() != self.axes.len() {
            return Err(Error::AxisMismatch(format!(
                "histogram has {} numeric axes, got {} bin indices",
                self.axes.len(),
                bins.len()
            )));
        }
        let strides = self.strides();
        let mut flat = 0usize;
        for (k, (axis, &bin)) in self.axes.iter().zip(bins).enumerate() {
            let slot = axis.slot_of(bin).ok_or_else(|| {
                Error::Validation(format!("{bin:?} out of range on axis '{}'", axis.name()))
            })?;
            flat += slot * strides[k];
        }
        Ok(flat)
    }
}

#[derive(Deserialize)]
struct RawHistogram {
    label: String,
    category_axis: CategoryAxis,
    axes: Vec<BinAxis>,
    counts: BTreeMap<String, Vec<u64>>,
}

impl TryFrom<RawHistogram> for Histogram {
    type Error = Error;

    fn try_from(raw: RawHistogram) -> Result<Self> {
        let mut h = Histogram::new(raw.label, raw.category_axis, raw.axes)?;
        let size = h.storage_len();
        if let Some((category, block)) = raw.counts.iter().find(|(_, b)| b.len() != size) {
            return Err(Error::Shape(format!(
                "category '{category}' has {} slots, axes need {size}",
                block.len()
            )));
        }
        h.counts = raw.counts;
        Ok(h)
    }
}

impl Accumulator for Histogram {
    fn absorb(&mut self, other: &Self) -> Result<()> {
        self.ensure_compatible(other)?;
        for (category, theirs) in &other.counts {
            match self.counts.get_mut(category) {
                Some(ours) => ours.iter_mut().zip(theirs).for_each(|(a, b)| *a += b),
                None => {
                    self.counts.insert(category.clone(), theirs.clone());
                }
            }
        }
        Ok(())
    }
}
