//! Per-event counts and offsets shared by all ragged containers.

use std::ops::Range;

use mf_core::{Error, Result};

/// Event boundaries into a flat buffer.
///
/// `offsets` has length `event_count() + 1`. Event `i` owns
/// `flat[offsets[i]..offsets[i + 1]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLayout {
    counts: Vec<usize>,
    offsets: Vec<usize>,
}

impl EventLayout {
    /// Build a layout from non-negative per-event counts.
    ///
    /// Counts whose sum does not fit in `usize` are a [`Error::Shape`].
    pub fn new(counts: Vec<usize>) -> Result<Self> {
        let mut offsets = Vec::with_capacity(counts.len() + 1);
        let mut acc = 0usize;
        offsets.push(acc);
        for (event, &c) in counts.iter().enumerate() {
            acc = acc.checked_add(c).ok_or_else(|| {
                Error::Shape(format!("counts overflow at event {event} (count {c})"))
            })?;
            offsets.push(acc);
        }
        Ok(Self { counts, offsets })
    }

    /// Layout of counts that partition a buffer already held in memory.
    pub(crate) fn from_bounded(counts: Vec<usize>) -> Self {
        let mut offsets = Vec::with_capacity(counts.len() + 1);
        offsets.push(0);
        for &c in &counts {
            offsets.push(offsets[offsets.len() - 1] + c);
        }
        Self { counts, offsets }
    }

    /// Build a layout from signed counts as delivered by ntuple readers.
    ///
    /// Negative counts are a [`Error::Shape`].
    pub fn from_counts(counts: &[i64]) -> Result<Self> {
        let counts = counts
            .iter()
            .enumerate()
            .map(|(event, &c)| {
                usize::try_from(c).map_err(|_| {
                    Error::Shape(format!("negative count {c} for event {event}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(counts)
    }

    /// Per-event element counts.
    #[inline]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Prefix sums of the counts (`len = event_count() + 1`).
    #[inline]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Number of events.
    #[inline]
    pub fn event_count(&self) -> usize {
        self.counts.len()
    }

    /// Sum of all counts, i.e. the required flat buffer length.
    #[inline]
    pub fn total_count(&self) -> usize {
        *self.offsets.last().unwrap_or(&0)
    }

    /// Flat index range of event `event`.
    ///
    /// # Panics
    /// Panics if `event >= event_count()`.
    #[inline]
    pub fn range(&self, event: usize) -> Range<usize> {
        self.offsets[event]..self.offsets[event + 1]
    }

    /// Event index owning every flat position, in flat order.
    ///
    /// The result has `total_count()` entries.
    pub fn parents(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.total_count());
        for (event, &c) in self.counts.iter().enumerate() {
            out.extend(std::iter::repeat_n(event, c));
        }
        out
    }

    /// Fail with [`Error::Shape`] unless `len` matches the flat length.
    pub(crate) fn ensure_flat_len(&self, what: &str, len: usize) -> Result<()> {
        if len != self.total_count() {
            return Err(Error::Shape(format!(
                "{what} has {len} values, counts sum to {}",
                self.total_count()
            )));
        }
        Ok(())
    }

    /// Fail with [`Error::Shape`] unless both layouts have identical counts.
    pub(crate) fn ensure_same(&self, what: &str, other: &EventLayout) -> Result<()> {
        if self.counts != other.counts {
            return Err(Error::Shape(format!(
                "{what} counts do not match ({} events / {} elements vs {} events / {} elements)",
                other.event_count(),
                other.total_count(),
                self.event_count(),
                self.total_count()
            )));
        }
        Ok(())
    }

    /// Fail with [`Error::Shape`] unless `len` matches the event count.
    pub(crate) fn ensure_event_len(&self, what: &str, len: usize) -> Result<()> {
        if len != self.event_count() {
            return Err(Error::Shape(format!(
                "{what} has {len} entries for {} events",
                self.event_count()
            )));
        }
        Ok(())
    }

    /// Layout keeping only the events flagged in `keep`.
    pub(crate) fn select(&self, keep: &[bool]) -> EventLayout {
        let counts = self.counts.iter().zip(keep).filter(|&(_, &k)| k).map(|(&c, _)| c).collect();
        EventLayout::from_bounded(counts)
    }
}

impl Default for EventLayout {
    fn default() -> Self {
        Self::from_bounded(Vec::new())
    }
}
