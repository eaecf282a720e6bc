//! Per-chunk muon input as handed over by the data-source collaborator.

use std::collections::HashMap;

use mf_columnar::RecordArray;
use mf_core::{Error, Result};

/// Per-muon attributes every chunk must provide.
pub const MUON_FIELDS: [&str; 12] = [
    "pt",
    "eta",
    "phi",
    "mass",
    "charge",
    "isGlobal",
    "softId",
    "vtxIdx",
    "pfRelIso04_all",
    "x",
    "y",
    "z",
];

/// One chunk of events: a dataset label, per-event muon counts and flat
/// per-muon columns aligned to those counts.
#[derive(Debug, Clone, Default)]
pub struct MuonChunk {
    /// Dataset label used as the histogram category.
    pub dataset: String,
    /// `nMuon` per event.
    pub n_muon: Vec<i64>,
    /// Flat columns keyed by [`MUON_FIELDS`] name.
    pub columns: HashMap<String, Vec<f64>>,
}

impl MuonChunk {
    /// Create an empty chunk for `dataset`.
    pub fn new(dataset: impl Into<String>) -> Self {
        Self { dataset: dataset.into(), ..Default::default() }
    }

    /// Set the per-event muon counts.
    pub fn with_counts(mut self, n_muon: Vec<i64>) -> Self {
        self.n_muon = n_muon;
        self
    }

    /// Set one flat per-muon column.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.insert(name.into(), values);
        self
    }

    /// Build a chunk from NanoAOD-style branch columns (`nMuon`, `Muon_pt`, …).
    ///
    /// Branches arrive as `f64`; `nMuon` values must be integral.
    pub fn from_branches(
        dataset: impl Into<String>,
        branches: &HashMap<String, Vec<f64>>,
    ) -> Result<Self> {
        let n_muon = match branches.get("nMuon") {
            Some(counts) => counts
                .iter()
                .enumerate()
                .map(|(event, &c)| {
                    if c.fract() != 0.0 || !c.is_finite() {
                        return Err(Error::Shape(format!(
                            "nMuon for event {event} is not an integer: {c}"
                        )));
                    }
                    Ok(c as i64)
                })
                .collect::<Result<Vec<_>>>()?,
            None => return Err(Error::MissingField("nMuon".into())),
        };
        let mut chunk = Self::new(dataset).with_counts(n_muon);
        for field in MUON_FIELDS {
            if let Some(values) = branches.get(&format!("Muon_{field}")) {
                chunk.columns.insert(field.to_string(), values.clone());
            }
        }
        Ok(chunk)
    }

    /// Number of events.
    pub fn event_count(&self) -> usize {
        self.n_muon.len()
    }

    /// Assemble the muon record array.
    ///
    /// A chunk without events may omit columns; otherwise every
    /// [`MUON_FIELDS`] column is required and must match `sum(n_muon)`.
    pub fn muons(&self) -> Result<RecordArray> {
        let mut fields = Vec::with_capacity(MUON_FIELDS.len());
        for name in MUON_FIELDS {
            let values = match self.columns.get(name) {
                Some(v) => v.clone(),
                None if self.n_muon.is_empty() => Vec::new(),
                None => return Err(Error::MissingField(name.to_string())),
            };
            fields.push((name, values));
        }
        RecordArray::from_counts(&self.n_muon, fields)
    }
}
