//! DimuonProcessor: per-chunk selection, cutflow and histogram filling.

use mf_columnar::{RecordArray, distinct_pairs};
use mf_core::Result;
use mf_hist::CutflowCounter;

use crate::book::{
    DIMU_ETA, DIMU_MASS, DIMU_PHI, DIMU_PT, HISTOGRAMS, MUON_ETA, MUON_PHI, MUON_PT,
    book_histograms,
};
use crate::chunk::MuonChunk;
use crate::config::SelectionConfig;
use crate::kinematics::{LorentzVector, candidate_p4};
use crate::output::AnalysisOutput;

/// Every event in the chunk.
pub const ALL_EVENTS: &str = "all events";
/// Every muon before cuts.
pub const ALL_MUONS: &str = "all muons";
/// Muons passing the soft id.
pub const SOFT_MUON: &str = "soft muon";
/// ... that are also global muons.
pub const GLOBAL_MUON: &str = "global muon";
/// ... above the pt threshold.
pub const PT_CUT: &str = "pt cut";
/// ... inside the eta acceptance.
pub const ETA_CUT: &str = "eta cut";
/// ... isolated.
pub const ISO_MUON: &str = "iso muon";
/// ... attached to a valid vertex.
pub const VALID_VTX: &str = "valid vtx";
/// Events with at least two surviving muons.
pub const TWO_MUONS: &str = "two muons";
/// Events with at least one opposite-charge pair.
pub const OPPOSITE_CHARGE: &str = "opposite charge";
/// Events with at least one opposite-charge pair from a common vertex.
pub const SAME_VTX: &str = "same vtx";

/// Cutflow stages in booking order.
pub const STAGES: [&str; 11] = [
    ALL_EVENTS,
    ALL_MUONS,
    SOFT_MUON,
    GLOBAL_MUON,
    PT_CUT,
    ETA_CUT,
    ISO_MUON,
    VALID_VTX,
    TWO_MUONS,
    OPPOSITE_CHARGE,
    SAME_VTX,
];

/// Runs the dimuon selection on one chunk at a time.
///
/// Processing is pure: each call builds a fresh [`AnalysisOutput`] and
/// either returns it whole or fails without publishing anything.
#[derive(Debug, Clone)]
pub struct DimuonProcessor {
    config: SelectionConfig,
    template: AnalysisOutput,
}

impl DimuonProcessor {
    /// Processor with the reference selection.
    pub fn new() -> Result<Self> {
        Self::with_config(SelectionConfig::default())
    }

    /// Processor with custom thresholds.
    pub fn with_config(config: SelectionConfig) -> Result<Self> {
        config.validate()?;
        let template = AnalysisOutput {
            histograms: book_histograms(&HISTOGRAMS)?,
            cutflow: CutflowCounter::with_stages(STAGES),
        };
        Ok(Self { config, template })
    }

    /// Active thresholds.
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// All-zero output with the full schema; the seed of any reduction.
    pub fn identity(&self) -> AnalysisOutput {
        self.template.clone()
    }

    /// Select muons and dimuons in `chunk` and fill the histograms.
    pub fn process(&self, chunk: &MuonChunk) -> Result<AnalysisOutput> {
        let cfg = &self.config;
        let mut out = self.identity();
        let cutflow = &mut out.cutflow;

        let muons = chunk.muons()?;
        cutflow.add_event_count(ALL_EVENTS, muons.event_count() as u64);
        cutflow.add_object_count(ALL_MUONS, &muons);

        let muons = apply_cut(&muons, cutflow, SOFT_MUON, "softId", |v| v > cfg.min_soft_id)?;
        let muons =
            apply_cut(&muons, cutflow, GLOBAL_MUON, "isGlobal", |v| v > cfg.min_is_global)?;
        let muons = apply_cut(&muons, cutflow, PT_CUT, "pt", |v| v > cfg.min_pt)?;
        let muons = apply_cut(&muons, cutflow, ETA_CUT, "eta", |v| v.abs() <= cfg.max_abs_eta)?;
        let muons =
            apply_cut(&muons, cutflow, ISO_MUON, "pfRelIso04_all", |v| v < cfg.max_rel_iso)?;
        let muons =
            apply_cut(&muons, cutflow, VALID_VTX, "vtxIdx", |v| v != cfg.invalid_vtx_idx)?;

        let two_muons: Vec<bool> = muons.counts().iter().map(|&n| n >= cfg.min_muons).collect();
        cutflow.add_any_per_event_count(TWO_MUONS, &two_muons);
        let candidates = muons.select_events(&two_muons)?;
        let dimuons = distinct_pairs(&candidates);

        let opposite_charge = dimuons
            .first()
            .field("charge")?
            .zip_with(&dimuons.second().field("charge")?, |a, b| a * b < 0.0)?;
        cutflow.add_any_per_event_count(OPPOSITE_CHARGE, &opposite_charge);
        let dimuons = dimuons.filter(&opposite_charge)?;

        let same_idx = dimuons
            .first()
            .field("vtxIdx")?
            .zip_with(&dimuons.second().field("vtxIdx")?, |a, b| a == b)?;
        let close_z = dimuons
            .first()
            .field("z")?
            .zip_with(&dimuons.second().field("z")?, |a, b| (a - b).abs() < cfg.max_delta_z)?;
        let same_vtx = same_idx.or(&close_z)?;
        cutflow.add_any_per_event_count(SAME_VTX, &same_vtx);
        let dimuons = dimuons.filter(&same_vtx)?;

        let dataset = chunk.dataset.as_str();
        let hists = &mut out.histograms;
        hists.fill(MUON_PT, dataset, muons.field("pt")?.values())?;
        hists.fill(MUON_ETA, dataset, muons.field("eta")?.values())?;
        hists.fill(MUON_PHI, dataset, muons.field("phi")?.values())?;

        let p4 = candidate_p4(&dimuons)?.flatten();
        let column = |f: fn(&LorentzVector) -> f64| p4.iter().map(f).collect::<Vec<_>>();
        hists.fill(DIMU_MASS, dataset, &column(LorentzVector::mass))?;
        hists.fill(DIMU_PT, dataset, &column(LorentzVector::pt))?;
        hists.fill(DIMU_ETA, dataset, &column(LorentzVector::eta))?;
        hists.fill(DIMU_PHI, dataset, &column(LorentzVector::phi))?;

        tracing::debug!(
            dataset,
            events = chunk.event_count(),
            muons = muons.total_count(),
            dimuons = p4.len(),
            "chunk processed"
        );
        Ok(out)
    }
}

/// Filter `muons` on one field and book the survivors under `stage`.
fn apply_cut(
    muons: &RecordArray,
    cutflow: &mut CutflowCounter,
    stage: &str,
    field: &str,
    pass: impl FnMut(f64) -> bool,
) -> Result<RecordArray> {
    let mask = muons.field(field)?.mask_where(pass);
    cutflow.add_object_count(stage, &mask);
    muons.filter(&mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::MUON_FIELDS;

    /// Chunk where every muon gets `base` values, then per-field overrides.
    fn chunk(n_muon: Vec<i64>, overrides: &[(&str, Vec<f64>)]) -> MuonChunk {
        let n = n_muon.iter().sum::<i64>() as usize;
        let mut c = MuonChunk::new("test").with_counts(n_muon);
        for f in MUON_FIELDS {
            let base = match f {
                "pt" => 10.0,
                "mass" => 0.1057,
                "isGlobal" | "softId" => 1.0,
                "pfRelIso04_all" => 0.05,
                _ => 0.0,
            };
            c = c.with_column(f, vec![base; n]);
        }
        for (f, v) in overrides {
            c = c.with_column(*f, v.clone());
        }
        c
    }

    #[test]
    fn object_cuts_are_sequential() {
        // muon 0 fails soft id, muon 1 fails pt, muon 2 fails eta, muon 3 passes
        let c = chunk(
            vec![4],
            &[
                ("softId", vec![0.0, 1.0, 1.0, 1.0]),
                ("pt", vec![1.0, 2.0, 10.0, 10.0]),
                ("eta", vec![0.0, 0.0, 2.5, -2.4]),
                ("charge", vec![1.0, -1.0, 1.0, -1.0]),
            ],
        );
        let out = DimuonProcessor::new().unwrap().process(&c).unwrap();
        let cf = &out.cutflow;
        assert_eq!(cf.get(ALL_EVENTS), Some(1));
        assert_eq!(cf.get(ALL_MUONS), Some(4));
        assert_eq!(cf.get(SOFT_MUON), Some(3));
        assert_eq!(cf.get(GLOBAL_MUON), Some(3));
        // muon 0 was already removed, so its pt does not count here
        assert_eq!(cf.get(PT_CUT), Some(2));
        assert_eq!(cf.get(ETA_CUT), Some(1));
        assert_eq!(cf.get(ISO_MUON), Some(1));
        assert_eq!(cf.get(VALID_VTX), Some(1));
        assert_eq!(cf.get(TWO_MUONS), Some(0));
        assert_eq!(cf.get(OPPOSITE_CHARGE), Some(0));
        assert_eq!(cf.get(SAME_VTX), Some(0));
        let after_events: Vec<u64> = cf.iter().skip(1).map(|(_, n)| n).collect();
        assert!(after_events.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn close_in_z_recovers_different_vertices() {
        let c = chunk(
            vec![2, 2],
            &[
                ("charge", vec![1.0, -1.0, 1.0, -1.0]),
                ("vtxIdx", vec![0.0, 1.0, 0.0, 1.0]),
                ("z", vec![0.0, 0.1, 0.0, 0.5]),
            ],
        );
        let out = DimuonProcessor::new().unwrap().process(&c).unwrap();
        assert_eq!(out.cutflow.get(TWO_MUONS), Some(2));
        assert_eq!(out.cutflow.get(OPPOSITE_CHARGE), Some(2));
        assert_eq!(out.cutflow.get(SAME_VTX), Some(1));
        assert_eq!(out.histograms.get(DIMU_MASS).unwrap().total("test"), 1);
    }

    #[test]
    fn custom_thresholds() {
        let cfg = SelectionConfig { min_pt: 20.0, ..Default::default() };
        let c = chunk(vec![2], &[("charge", vec![1.0, -1.0])]);
        let out = DimuonProcessor::with_config(cfg).unwrap().process(&c).unwrap();
        assert_eq!(out.cutflow.get(PT_CUT), Some(0));
        assert_eq!(out.histograms.grand_total(), 0);
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = SelectionConfig { min_muons: 0, ..Default::default() };
        assert!(DimuonProcessor::with_config(cfg).is_err());
    }

    #[test]
    fn identity_has_full_schema() {
        let p = DimuonProcessor::new().unwrap();
        let id = p.identity();
        assert_eq!(id.cutflow.stage_names().collect::<Vec<_>>(), STAGES.to_vec());
        assert!(id.cutflow.iter().all(|(_, c)| c == 0));
        assert_eq!(id.histograms.len(), 7);
        assert_eq!(id.histograms.grand_total(), 0);
    }
}
