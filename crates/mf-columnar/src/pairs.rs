//! Same-event combinatorics over record arrays.
//!
//! Pairs are enumerated event by event from local element indices, so memory
//! grows with the number of pairs actually produced and never with a global
//! cross product. A [`PairRecord`] stores only flat indices into its source
//! records; field values are projected on demand.

use mf_core::{Error, Result};

use crate::layout::EventLayout;
use crate::ragged::{Mask, RaggedArray};
use crate::record::RecordArray;

/// Ragged array of `(first, second)` record pairs, one list per event.
#[derive(Debug, Clone)]
pub struct PairRecord<'a> {
    left: &'a RecordArray,
    right: &'a RecordArray,
    layout: EventLayout,
    first: Vec<usize>,
    second: Vec<usize>,
}

/// All unordered pairs `(i, j)`, `i < j`, within each event.
///
/// Pairs are emitted in lexicographic `(i, j)` order of local indices. An
/// event with fewer than two records contributes no pairs.
pub fn distinct_pairs(records: &RecordArray) -> PairRecord<'_> {
    let layout = records.layout();
    let n_pairs: usize = layout.counts().iter().map(|&n| n * n.saturating_sub(1) / 2).sum();
    let mut counts = Vec::with_capacity(layout.event_count());
    let mut first = Vec::with_capacity(n_pairs);
    let mut second = Vec::with_capacity(n_pairs);

    for event in 0..layout.event_count() {
        let r = layout.range(event);
        let n = r.len();
        counts.push(n * n.saturating_sub(1) / 2);
        for i in r.clone() {
            for j in (i + 1)..r.end {
                first.push(i);
                second.push(j);
            }
        }
    }

    PairRecord {
        left: records,
        right: records,
        layout: EventLayout::from_bounded(counts),
        first,
        second,
    }
}

/// All ordered pairs `(i, j)` with `i` from `left` and `j` from `right` in the
/// same event, in lexicographic order.
///
/// Both inputs must have the same number of events.
pub fn cartesian_pairs<'a>(
    left: &'a RecordArray,
    right: &'a RecordArray,
) -> Result<PairRecord<'a>> {
    if left.event_count() != right.event_count() {
        return Err(Error::Shape(format!(
            "cartesian pairs over {} vs {} events",
            left.event_count(),
            right.event_count()
        )));
    }
    let mut counts = Vec::with_capacity(left.event_count());
    let mut first = Vec::new();
    let mut second = Vec::new();

    for event in 0..left.event_count() {
        let l = left.layout().range(event);
        let r = right.layout().range(event);
        counts.push(l.len() * r.len());
        for i in l {
            for j in r.clone() {
                first.push(i);
                second.push(j);
            }
        }
    }

    Ok(PairRecord { left, right, layout: EventLayout::from_bounded(counts), first, second })
}

impl<'a> PairRecord<'a> {
    /// Event boundaries of the pair lists.
    #[inline]
    pub fn layout(&self) -> &EventLayout {
        &self.layout
    }

    /// Number of pairs per event.
    #[inline]
    pub fn counts(&self) -> &[usize] {
        self.layout.counts()
    }

    /// Number of events.
    #[inline]
    pub fn event_count(&self) -> usize {
        self.layout.event_count()
    }

    /// Total number of pairs.
    #[inline]
    pub fn total_count(&self) -> usize {
        self.first.len()
    }

    /// View of the first element of every pair.
    pub fn first(&self) -> PairSide<'_> {
        PairSide { layout: &self.layout, source: self.left, indices: &self.first }
    }

    /// View of the second element of every pair.
    pub fn second(&self) -> PairSide<'_> {
        PairSide { layout: &self.layout, source: self.right, indices: &self.second }
    }

    /// Local (within-event) indices of every pair.
    pub fn local_indices(&self) -> RaggedArray<(usize, usize)> {
        let left_offsets = self.left.layout().offsets();
        let right_offsets = self.right.layout().offsets();
        let mut flat = Vec::with_capacity(self.total_count());
        for event in 0..self.event_count() {
            for k in self.layout.range(event) {
                flat.push((
                    self.first[k] - left_offsets[event],
                    self.second[k] - right_offsets[event],
                ));
            }
        }
        RaggedArray::from_parts(self.layout.clone(), flat)
    }

    /// Keep the pairs where `mask` is true.
    pub fn filter(&self, mask: &Mask) -> Result<PairRecord<'a>> {
        self.layout.ensure_same("pair mask", mask.layout())?;
        let keep = mask.flat();
        let pick = |idx: &[usize]| -> Vec<usize> {
            idx.iter().zip(keep).filter(|&(_, &k)| k).map(|(&i, _)| i).collect()
        };
        Ok(PairRecord {
            left: self.left,
            right: self.right,
            layout: EventLayout::from_bounded(mask.count_per_event()),
            first: pick(&self.first),
            second: pick(&self.second),
        })
    }
}

/// One side (`first` or `second`) of a [`PairRecord`].
#[derive(Debug, Clone, Copy)]
pub struct PairSide<'p> {
    layout: &'p EventLayout,
    source: &'p RecordArray,
    indices: &'p [usize],
}

impl PairSide<'_> {
    /// Project a source field onto the pair layout.
    pub fn field(&self, name: &str) -> Result<RaggedArray<f64>> {
        let idx = self.source.position(name).ok_or_else(|| Error::MissingField(name.to_string()))?;
        let column = self.source.column(idx);
        let flat = self.indices.iter().map(|&i| column[i]).collect();
        Ok(RaggedArray::from_parts(self.layout.clone(), flat))
    }
}
