//! # mf-hist
//!
//! Mergeable accumulators for per-chunk analysis results:
//!
//! - [`Histogram`]: one categorical axis (e.g. dataset) × one or more regular
//!   binned axes, with per-axis underflow/overflow/NaN slots.
//! - [`HistogramSet`]: named collection of histograms merged member-wise.
//! - [`CutflowCounter`]: ordered stage → count mapping.
//!
//! All three implement [`mf_core::Accumulator`]; merging is associative and
//! commutative and fails without side effects on schema mismatch.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod axis;
pub mod cutflow;
pub mod histogram;
pub mod set;

pub use axis::{AxisBin, BinAxis, CategoryAxis};
pub use cutflow::{CutflowCounter, EventFlags, ObjectCount};
pub use histogram::{FlowCounts, Histogram};
pub use set::HistogramSet;
