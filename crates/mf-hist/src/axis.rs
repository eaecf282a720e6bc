//! Histogram axis definitions.

use serde::{Deserialize, Serialize};

use mf_core::{Error, Result};

/// Where a value lands on one [`BinAxis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisBin {
    /// Below the low edge.
    Underflow,
    /// Regular bin `0..bins`.
    Bin(usize),
    /// At or above the high edge.
    Overflow,
    /// NaN input.
    NaN,
}

/// Regular binning: `bins` equal-width bins over `[low, high)`.
///
/// Deserialization goes through [`BinAxis::new`], so a stored axis obeys the
/// same checks as a constructed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBinAxis")]
pub struct BinAxis {
    name: String,
    label: String,
    bins: usize,
    low: f64,
    high: f64,
}

impl BinAxis {
    /// Create a regular axis. `bins` must be positive and `low < high`, both finite.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        bins: usize,
        low: f64,
        high: f64,
    ) -> Result<Self> {
        let name = name.into();
        if bins == 0 || bins.checked_add(3).is_none() {
            return Err(Error::Validation(format!("axis '{name}': invalid bin count {bins}")));
        }
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(Error::Validation(format!(
                "axis '{name}': invalid range [{low}, {high})"
            )));
        }
        Ok(Self { name, label: label.into(), bins, low, high })
    }

    /// Axis name (used as the fill keyword).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of regular bins.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Lower edge of the first bin.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper edge of the last bin.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Bin width.
    pub fn width(&self) -> f64 {
        (self.high - self.low) / self.bins as f64
    }

    /// Bin edges (length = `bins + 1`).
    pub fn edges(&self) -> Vec<f64> {
        let w = self.width();
        (0..=self.bins)
            .map(|i| if i == self.bins { self.high } else { self.low + i as f64 * w })
            .collect()
    }

    /// Locate `value` on this axis.
    pub fn index(&self, value: f64) -> AxisBin {
        if value.is_nan() {
            AxisBin::NaN
        } else if value < self.low {
            AxisBin::Underflow
        } else if value >= self.high {
            AxisBin::Overflow
        } else {
            let i = ((value - self.low) / self.width()).floor() as usize;
            // rounding can push values just below `high` onto `bins`
            AxisBin::Bin(i.min(self.bins - 1))
        }
    }

    /// Storage slots: underflow, `bins` regular bins, overflow, NaN.
    pub(crate) fn slots(&self) -> usize {
        self.bins + 3
    }

    /// Storage slot `value` falls into.
    pub(crate) fn slot(&self, value: f64) -> usize {
        match self.index(value) {
            AxisBin::Underflow => 0,
            AxisBin::Bin(i) => i + 1,
            AxisBin::Overflow => self.bins + 1,
            AxisBin::NaN => self.bins + 2,
        }
    }

    /// Storage slot of a located bin, `None` for an out-of-range regular bin.
    pub(crate) fn slot_of(&self, bin: AxisBin) -> Option<usize> {
        match bin {
            AxisBin::Underflow => Some(0),
            AxisBin::Bin(i) if i < self.bins => Some(i + 1),
            AxisBin::Bin(_) => None,
            AxisBin::Overflow => Some(self.bins + 1),
            AxisBin::NaN => Some(self.bins + 2),
        }
    }
}

#[derive(Deserialize)]
struct RawBinAxis {
    name: String,
    label: String,
    bins: usize,
    low: f64,
    high: f64,
}

impl TryFrom<RawBinAxis> for BinAxis {
    type Error = Error;

    fn try_from(raw: RawBinAxis) -> Result<Self> {
        BinAxis::new(raw.name, raw.label, raw.bins, raw.low, raw.high)
    }
}

/// Categorical axis: one storage block per distinct string label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAxis {
    name: String,
    label: String,
}

impl CategoryAxis {
    /// Create a categorical axis.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self { name: name.into(), label: label.into() }
    }

    /// Axis name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }
}
