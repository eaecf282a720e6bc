//! Per-chunk analysis output and its merge.

use serde::{Deserialize, Serialize};

use mf_core::{Accumulator, Result};
use mf_hist::{CutflowCounter, HistogramSet};

/// Histograms and cutflow produced by one chunk (or merged from many).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// Booked histograms keyed by name.
    pub histograms: HistogramSet,
    /// Selection cutflow.
    pub cutflow: CutflowCounter,
}

impl Accumulator for AnalysisOutput {
    fn absorb(&mut self, other: &Self) -> Result<()> {
        // merge the cutflow into a copy first so a histogram mismatch leaves `self` intact
        let mut cutflow = self.cutflow.clone();
        cutflow.absorb(&other.cutflow)?;
        self.histograms.absorb(&other.histograms)?;
        self.cutflow = cutflow;
        Ok(())
    }
}

/// Merge two chunk outputs; usable as the operator of a reduction tree.
pub fn combine(a: &AnalysisOutput, b: &AnalysisOutput) -> Result<AnalysisOutput> {
    a.merge(b)
}
