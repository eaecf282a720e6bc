//! The fixed set of histograms booked for every chunk.

use mf_core::Result;
use mf_hist::{BinAxis, CategoryAxis, Histogram, HistogramSet};

/// Definition of one booked histogram: a `dataset` category axis plus one
/// regular axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramDef {
    /// Key in the [`HistogramSet`].
    pub name: &'static str,
    /// Numeric axis name.
    pub axis: &'static str,
    /// Numeric axis label.
    pub label: &'static str,
    /// Number of bins.
    pub bins: usize,
    /// Low edge.
    pub low: f64,
    /// High edge.
    pub high: f64,
}

/// Category axis shared by every booked histogram.
pub const DATASET_AXIS: (&str, &str) = ("dataset", "Primary dataset");

/// Single-muon transverse momentum.
pub const MUON_PT: &str = "muon_pt";
/// Single-muon pseudorapidity.
pub const MUON_ETA: &str = "muon_eta";
/// Single-muon azimuth.
pub const MUON_PHI: &str = "muon_phi";
/// Dimuon invariant mass.
pub const DIMU_MASS: &str = "dimu_mass";
/// Dimuon transverse momentum.
pub const DIMU_PT: &str = "dimu_pt";
/// Dimuon pseudorapidity.
pub const DIMU_ETA: &str = "dimu_eta";
/// Dimuon azimuth.
pub const DIMU_PHI: &str = "dimu_phi";

/// Every histogram produced per chunk.
pub const HISTOGRAMS: [HistogramDef; 7] = [
    HistogramDef {
        name: MUON_PT,
        axis: "pt",
        label: r"$p_{T,\mu}$ [GeV]",
        bins: 3000,
        low: 0.25,
        high: 300.0,
    },
    HistogramDef {
        name: MUON_ETA,
        axis: "eta",
        label: r"$\eta_{\mu}$",
        bins: 60,
        low: -3.0,
        high: 3.0,
    },
    HistogramDef {
        name: MUON_PHI,
        axis: "phi",
        label: r"$\phi_{\mu}$",
        bins: 70,
        low: -3.5,
        high: 3.5,
    },
    HistogramDef {
        name: DIMU_MASS,
        axis: "mass",
        label: r"$m_{\mu\mu}$ [GeV]",
        bins: 3600,
        low: 0.25,
        high: 120.0,
    },
    HistogramDef {
        name: DIMU_PT,
        axis: "pt",
        label: r"$p_{T,\mu\mu}$ [GeV]",
        bins: 3000,
        low: 0.25,
        high: 300.0,
    },
    HistogramDef {
        name: DIMU_ETA,
        axis: "eta",
        label: r"$\eta_{\mu\mu}$",
        bins: 100,
        low: -5.0,
        high: 5.0,
    },
    HistogramDef {
        name: DIMU_PHI,
        axis: "phi",
        label: r"$\phi_{\mu\mu}$",
        bins: 70,
        low: -3.5,
        high: 3.5,
    },
];

/// Book empty histograms for `defs`.
pub fn book_histograms(defs: &[HistogramDef]) -> Result<HistogramSet> {
    let mut set = HistogramSet::new();
    for def in defs {
        let axis = BinAxis::new(def.axis, def.label, def.bins, def.low, def.high)?;
        let category = CategoryAxis::new(DATASET_AXIS.0, DATASET_AXIS.1);
        set.insert(def.name, Histogram::new_1d("Counts", category, axis));
    }
    Ok(set)
}
