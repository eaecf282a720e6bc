//! Record arrays: several named `f64` columns sharing one [`EventLayout`].

use mf_core::{Error, Result};

use crate::layout::EventLayout;
use crate::ragged::{Mask, RaggedArray};

/// A ragged array of structured records.
///
/// All columns have the same flat length and are index-aligned; masking and
/// event selection are applied to every column at once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordArray {
    layout: EventLayout,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl RecordArray {
    /// Build from signed per-event counts and named flat columns.
    ///
    /// Fails with [`Error::Shape`] on negative counts or a column whose length
    /// differs from the sum of the counts.
    pub fn from_counts<I, S>(counts: &[i64], fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        Self::from_layout(EventLayout::from_counts(counts)?, fields)
    }

    /// Build from an existing layout and named flat columns.
    pub fn from_layout<I, S>(layout: EventLayout, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut columns = Vec::new();
        for (name, values) in fields {
            let name = name.into();
            if names.contains(&name) {
                return Err(Error::Validation(format!("duplicate field '{name}'")));
            }
            layout.ensure_flat_len(&format!("field '{name}'"), values.len())?;
            names.push(name);
            columns.push(values);
        }
        Ok(Self { layout, names, columns })
    }

    /// Event boundaries shared by every column.
    #[inline]
    pub fn layout(&self) -> &EventLayout {
        &self.layout
    }

    /// Per-event record counts.
    #[inline]
    pub fn counts(&self) -> &[usize] {
        self.layout.counts()
    }

    /// Number of events.
    #[inline]
    pub fn event_count(&self) -> usize {
        self.layout.event_count()
    }

    /// Total number of records across all events.
    #[inline]
    pub fn total_count(&self) -> usize {
        self.layout.total_count()
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Whether a field exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Borrow one field as a ragged view.
    pub fn field(&self, name: &str) -> Result<FieldView<'_>> {
        let idx = self.position(name).ok_or_else(|| Error::MissingField(name.to_string()))?;
        Ok(FieldView { layout: &self.layout, values: &self.columns[idx] })
    }

    /// Flat values of one field in event order.
    pub fn flatten(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self.field(name)?.values.to_vec())
    }

    /// Keep the records where `mask` is true, in every column.
    pub fn filter(&self, mask: &Mask) -> Result<RecordArray> {
        self.layout.ensure_same("mask", mask.layout())?;
        let keep = mask.flat();
        let columns: Vec<Vec<f64>> = self
            .columns
            .iter()
            .map(|col| col.iter().zip(keep).filter(|&(_, &k)| k).map(|(&v, _)| v).collect())
            .collect();
        Ok(RecordArray {
            layout: EventLayout::from_bounded(mask.count_per_event()),
            names: self.names.clone(),
            columns,
        })
    }

    /// Keep whole events where `keep` is true; the event axis shrinks.
    pub fn select_events(&self, keep: &[bool]) -> Result<RecordArray> {
        self.layout.ensure_event_len("event selection", keep.len())?;
        let columns: Vec<Vec<f64>> = self
            .columns
            .iter()
            .map(|col| {
                let mut out = Vec::new();
                for (event, _) in keep.iter().enumerate().filter(|&(_, &k)| k) {
                    out.extend_from_slice(&col[self.layout.range(event)]);
                }
                out
            })
            .collect();
        Ok(RecordArray { layout: self.layout.select(keep), names: self.names.clone(), columns })
    }

    /// Raw column by position, used by pair projections.
    pub(crate) fn column(&self, idx: usize) -> &[f64] {
        &self.columns[idx]
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// Borrowed view of one [`RecordArray`] field with its layout.
///
/// Comparisons produce a [`Mask`] with identical counts, computed per flat
/// element; every selection cut is built from these.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    layout: &'a EventLayout,
    values: &'a [f64],
}

impl<'a> FieldView<'a> {
    /// Event boundaries.
    pub fn layout(&self) -> &'a EventLayout {
        self.layout
    }

    /// Flat values in event order.
    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    /// Values of event `event`.
    ///
    /// # Panics
    /// Panics if `event >= event_count()` of the owning record array.
    pub fn event(&self, event: usize) -> &'a [f64] {
        &self.values[self.layout.range(event)]
    }

    /// Apply `f` to every value, keeping the layout.
    pub fn map<U>(&self, mut f: impl FnMut(f64) -> U) -> RaggedArray<U> {
        let flat = self.values.iter().map(|&v| f(v)).collect();
        RaggedArray::from_parts(self.layout.clone(), flat)
    }

    /// Mask of the values satisfying `pred`.
    pub fn mask_where(&self, pred: impl FnMut(f64) -> bool) -> Mask {
        self.map(pred)
    }

    /// `value > threshold`
    pub fn gt(&self, threshold: f64) -> Mask {
        self.mask_where(|v| v > threshold)
    }

    /// `value >= threshold`
    pub fn ge(&self, threshold: f64) -> Mask {
        self.mask_where(|v| v >= threshold)
    }

    /// `value < threshold`
    pub fn lt(&self, threshold: f64) -> Mask {
        self.mask_where(|v| v < threshold)
    }

    /// `value <= threshold`
    pub fn le(&self, threshold: f64) -> Mask {
        self.mask_where(|v| v <= threshold)
    }

    /// `value == target`
    pub fn eq_value(&self, target: f64) -> Mask {
        self.mask_where(|v| v == target)
    }

    /// `value != target`
    pub fn ne_value(&self, target: f64) -> Mask {
        self.mask_where(|v| v != target)
    }
}
