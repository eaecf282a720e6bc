//! Ordered stage → count bookkeeping for selection cutflows.

use serde::{Deserialize, Serialize};

use mf_columnar::{Mask, PairRecord, RecordArray};
use mf_core::{Accumulator, Error, Result};

/// Something whose surviving-object count can be booked.
pub trait ObjectCount {
    /// Number of surviving objects.
    fn object_count(&self) -> usize;
}

/// Masks count their `true` elements.
impl ObjectCount for Mask {
    fn object_count(&self) -> usize {
        self.count_true()
    }
}

/// Record arrays count all their elements.
impl ObjectCount for RecordArray {
    fn object_count(&self) -> usize {
        self.total_count()
    }
}

impl ObjectCount for PairRecord<'_> {
    fn object_count(&self) -> usize {
        self.total_count()
    }
}

/// Something that yields a pass/fail decision per event.
pub trait EventFlags {
    /// Number of passing events.
    fn events_passing(&self) -> usize;
}

/// An event passes if any of its elements is `true`.
impl EventFlags for Mask {
    fn events_passing(&self) -> usize {
        self.any_per_event().into_iter().filter(|&b| b).count()
    }
}

/// Event-level flags pass when `true`.
impl EventFlags for [bool] {
    fn events_passing(&self) -> usize {
        self.iter().filter(|&&b| b).count()
    }
}

impl EventFlags for Vec<bool> {
    fn events_passing(&self) -> usize {
        self.as_slice().events_passing()
    }
}

/// Ordered mapping from stage name to accumulated count.
///
/// Stages are appended in first-use order; adding to an existing stage
/// increments it. Counts are expected, but not required, to be
/// non-increasing along the stage list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CutflowCounter {
    stages: Vec<(String, u64)>,
}

impl CutflowCounter {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a counter with the given stages, all at zero.
    pub fn with_stages<I, S>(stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = Self::new();
        for s in stages {
            let s: String = s.into();
            out.add(&s, 0);
        }
        out
    }

    /// Add a scalar count (e.g. events processed).
    pub fn add_event_count(&mut self, stage: &str, count: u64) {
        self.add(stage, count);
    }

    /// Add the number of surviving objects.
    pub fn add_object_count<C: ObjectCount + ?Sized>(&mut self, stage: &str, survivors: &C) {
        self.add(stage, survivors.object_count() as u64);
    }

    /// Add the number of events with at least one passing element.
    pub fn add_any_per_event_count<F: EventFlags + ?Sized>(&mut self, stage: &str, flags: &F) {
        self.add(stage, flags.events_passing() as u64);
    }

    /// Count booked for `stage`.
    pub fn get(&self, stage: &str) -> Option<u64> {
        self.stages.iter().find(|(s, _)| s == stage).map(|&(_, c)| c)
    }

    /// `(stage, count)` pairs in stage order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.stages.iter().map(|(s, c)| (s.as_str(), *c))
    }

    /// Stage names in order.
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|(s, _)| s.as_str())
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether no stage has been booked.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Whether counts never increase from one stage to the next.
    pub fn is_non_increasing(&self) -> bool {
        self.stages.windows(2).all(|w| w[1].1 <= w[0].1)
    }

    fn add(&mut self, stage: &str, count: u64) {
        match self.stages.iter_mut().find(|(s, _)| s == stage) {
            Some((_, c)) => *c += count,
            None => self.stages.push((stage.to_string(), count)),
        }
    }
}

impl Accumulator for CutflowCounter {
    fn absorb(&mut self, other: &Self) -> Result<()> {
        if !self.stage_names().eq(other.stage_names()) {
            return Err(Error::SchemaMismatch(format!(
                "cutflow stages differ: [{}] vs [{}]",
                self.stage_names().collect::<Vec<_>>().join(", "),
                other.stage_names().collect::<Vec<_>>().join(", ")
            )));
        }
        for ((_, ours), (_, theirs)) in self.stages.iter_mut().zip(&other.stages) {
            *ours += theirs;
        }
        Ok(())
    }
}
