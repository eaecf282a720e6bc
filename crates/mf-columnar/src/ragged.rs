//! Variable-length-per-event arrays: flat values + an [`EventLayout`].

use mf_core::Result;

use crate::layout::EventLayout;

/// A jagged array: one flat buffer split into events by `counts`.
///
/// Invariant: `flat().len() == layout().total_count()`.
#[derive(Debug, Clone, PartialEq)]
pub struct RaggedArray<T> {
    layout: EventLayout,
    flat: Vec<T>,
}

/// Per-element boolean selection with the layout of the array it filters.
pub type Mask = RaggedArray<bool>;

impl<T> RaggedArray<T> {
    /// Build from unsigned counts and a flat buffer.
    pub fn new(counts: Vec<usize>, flat: Vec<T>) -> Result<Self> {
        Self::from_layout(EventLayout::new(counts)?, flat)
    }

    /// Build from signed counts (negative counts are a shape error).
    pub fn from_counts(counts: &[i64], flat: Vec<T>) -> Result<Self> {
        Self::from_layout(EventLayout::from_counts(counts)?, flat)
    }

    /// Build from an existing layout, checking the flat length.
    pub fn from_layout(layout: EventLayout, flat: Vec<T>) -> Result<Self> {
        layout.ensure_flat_len("flat buffer", flat.len())?;
        Ok(Self { layout, flat })
    }

    /// Pair a layout with a buffer already known to match it.
    pub(crate) fn from_parts(layout: EventLayout, flat: Vec<T>) -> Self {
        debug_assert_eq!(layout.total_count(), flat.len());
        Self { layout, flat }
    }

    /// Build from nested per-event vectors.
    pub fn from_events(events: Vec<Vec<T>>) -> Self {
        let counts = events.iter().map(Vec::len).collect();
        let flat = events.into_iter().flatten().collect();
        Self { layout: EventLayout::from_bounded(counts), flat }
    }

    /// Event boundaries.
    #[inline]
    pub fn layout(&self) -> &EventLayout {
        &self.layout
    }

    /// Per-event element counts.
    #[inline]
    pub fn counts(&self) -> &[usize] {
        self.layout.counts()
    }

    /// Number of events.
    #[inline]
    pub fn event_count(&self) -> usize {
        self.layout.event_count()
    }

    /// Total number of elements across all events.
    #[inline]
    pub fn total_count(&self) -> usize {
        self.flat.len()
    }

    /// Flat values in event order.
    #[inline]
    pub fn flat(&self) -> &[T] {
        &self.flat
    }

    /// Consume the array and return its flat values in event order.
    pub fn flatten(self) -> Vec<T> {
        self.flat
    }

    /// Values of event `event`.
    ///
    /// # Panics
    /// Panics if `event >= event_count()`.
    #[inline]
    pub fn event(&self, event: usize) -> &[T] {
        &self.flat[self.layout.range(event)]
    }

    /// Iterator over per-event slices.
    pub fn events(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        (0..self.event_count()).map(move |e| self.event(e))
    }

    /// Apply `f` to every element, keeping the layout.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> RaggedArray<U> {
        RaggedArray { layout: self.layout.clone(), flat: self.flat.iter().map(f).collect() }
    }

    /// Combine two arrays with identical counts element by element.
    pub fn zip_with<U, V>(
        &self,
        other: &RaggedArray<U>,
        mut f: impl FnMut(&T, &U) -> V,
    ) -> Result<RaggedArray<V>> {
        self.layout.ensure_same("right operand", &other.layout)?;
        let flat = self.flat.iter().zip(&other.flat).map(|(a, b)| f(a, b)).collect();
        Ok(RaggedArray { layout: self.layout.clone(), flat })
    }

    /// Keep the elements where `mask` is true, preserving event grouping and order.
    pub fn filter(&self, mask: &Mask) -> Result<Self>
    where
        T: Clone,
    {
        self.layout.ensure_same("mask", &mask.layout)?;
        let flat = self
            .flat
            .iter()
            .zip(&mask.flat)
            .filter_map(|(v, &keep)| keep.then(|| v.clone()))
            .collect();
        Ok(Self { layout: EventLayout::from_bounded(mask.count_per_event()), flat })
    }

    /// Keep whole events where `keep` is true; the event axis shrinks.
    pub fn select_events(&self, keep: &[bool]) -> Result<Self>
    where
        T: Clone,
    {
        self.layout.ensure_event_len("event selection", keep.len())?;
        let mut flat = Vec::new();
        for (event, _) in keep.iter().enumerate().filter(|&(_, &k)| k) {
            flat.extend_from_slice(self.event(event));
        }
        Ok(Self { layout: self.layout.select(keep), flat })
    }
}

impl Mask {
    /// A mask with every element set to `value`.
    pub fn filled(layout: &EventLayout, value: bool) -> Self {
        Self { layout: layout.clone(), flat: vec![value; layout.total_count()] }
    }

    /// Elementwise AND of two masks with identical counts.
    pub fn and(&self, other: &Mask) -> Result<Mask> {
        self.zip_with(other, |&a, &b| a && b)
    }

    /// Elementwise OR of two masks with identical counts.
    pub fn or(&self, other: &Mask) -> Result<Mask> {
        self.zip_with(other, |&a, &b| a || b)
    }

    /// Elementwise negation.
    pub fn invert(&self) -> Mask {
        self.map(|&v| !v)
    }

    /// Total number of `true` elements.
    pub fn count_true(&self) -> usize {
        self.flat.iter().filter(|&&v| v).count()
    }

    /// Number of `true` elements in each event.
    pub fn count_per_event(&self) -> Vec<usize> {
        self.events().map(|ev| ev.iter().filter(|&&v| v).count()).collect()
    }

    /// Whether each event contains at least one `true` element.
    pub fn any_per_event(&self) -> Vec<bool> {
        self.events().map(|ev| ev.iter().any(|&v| v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_core::Error;

    fn sample() -> RaggedArray<i32> {
        RaggedArray::from_events(vec![vec![1, 2, 3], vec![], vec![4, 5]])
    }

    #[test]
    fn construction_checks_flat_len() {
        let err = RaggedArray::new(vec![2, 1], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
        assert!(RaggedArray::new(vec![2, 1], vec![1.0, 2.0, 3.0]).is_ok());
    }

    #[test]
    fn events_and_counts() {
        let a = sample();
        assert_eq!(a.counts(), &[3, 0, 2]);
        assert_eq!(a.event(0), &[1, 2, 3]);
        assert!(a.event(1).is_empty());
        assert_eq!(a.event(2), &[4, 5]);
        assert_eq!(a.total_count(), 5);
        assert_eq!(a.event_count(), 3);
    }

    #[test]
    fn filter_preserves_grouping() {
        let a = sample();
        let m = a.map(|&v| v % 2 == 1);
        let f = a.filter(&m).unwrap();
        assert_eq!(f.counts(), &[2, 0, 1]);
        assert_eq!(f.flat(), &[1, 3, 5]);
        // source untouched
        assert_eq!(a.flat(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn filter_rejects_foreign_mask() {
        let a = sample();
        let m = Mask::from_events(vec![vec![true; 3], vec![true], vec![true]]);
        assert!(matches!(a.filter(&m), Err(Error::Shape(_))));
    }

    #[test]
    fn identity_and_all_false_masks() {
        let a = sample();
        assert_eq!(a.filter(&Mask::filled(a.layout(), true)).unwrap(), a);
        let none = a.filter(&Mask::filled(a.layout(), false)).unwrap();
        assert_eq!(none.counts(), &[0, 0, 0]);
        assert!(none.flat().is_empty());
    }

    #[test]
    fn mask_reductions() {
        let m = Mask::from_events(vec![vec![true, false], vec![], vec![false, false], vec![true]]);
        assert_eq!(m.count_true(), 2);
        assert_eq!(m.count_per_event(), vec![1, 0, 0, 1]);
        assert_eq!(m.any_per_event(), vec![true, false, false, true]);
        assert_eq!(m.invert().count_true(), 2);
    }

    #[test]
    fn mask_logic() {
        let a = Mask::from_events(vec![vec![true, false, true]]);
        let b = Mask::from_events(vec![vec![true, true, false]]);
        assert_eq!(a.and(&b).unwrap().flat(), &[true, false, false]);
        assert_eq!(a.or(&b).unwrap().flat(), &[true, true, true]);
    }

    #[test]
    fn select_events_drops_whole_events() {
        let a = sample();
        let s = a.select_events(&[false, true, true]).unwrap();
        assert_eq!(s.counts(), &[0, 2]);
        assert_eq!(s.flat(), &[4, 5]);
        assert!(a.select_events(&[true]).is_err());
    }

    #[test]
    fn zip_with_requires_same_counts() {
        let a = RaggedArray::from_events(vec![vec![1.0, 2.0], vec![3.0]]);
        let b = RaggedArray::from_events(vec![vec![10.0, 20.0], vec![30.0]]);
        let s = a.zip_with(&b, |x, y| x + y).unwrap();
        assert_eq!(s.flat(), &[11.0, 22.0, 33.0]);
        let c = RaggedArray::from_events(vec![vec![1.0], vec![2.0, 3.0]]);
        assert!(a.zip_with(&c, |x, y| x + y).is_err());
    }
}
