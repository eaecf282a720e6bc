//! Selection thresholds.

use serde::{Deserialize, Serialize};

use mf_core::{Error, Result};

/// Cut values for the dimuon selection.
///
/// The defaults are the reference selection; deserialized configs may
/// override any subset of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Soft muon: `softId > min_soft_id`.
    pub min_soft_id: f64,
    /// Global muon: `isGlobal > min_is_global`.
    pub min_is_global: f64,
    /// `pt > min_pt` (GeV).
    pub min_pt: f64,
    /// `|eta| <= max_abs_eta`.
    pub max_abs_eta: f64,
    /// `pfRelIso04_all < max_rel_iso`.
    pub max_rel_iso: f64,
    /// Muons with `vtxIdx == invalid_vtx_idx` are dropped.
    pub invalid_vtx_idx: f64,
    /// Events need at least this many surviving muons to form pairs.
    pub min_muons: usize,
    /// Pairs on different vertices still pass if `|z1 - z2| < max_delta_z` (cm).
    pub max_delta_z: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_soft_id: 0.0,
            min_is_global: 0.0,
            min_pt: 3.0,
            max_abs_eta: 2.4,
            max_rel_iso: 0.4,
            invalid_vtx_idx: -1.0,
            min_muons: 2,
            max_delta_z: 0.2,
        }
    }
}

impl SelectionConfig {
    /// Check that every threshold is usable.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("min_soft_id", self.min_soft_id),
            ("min_is_global", self.min_is_global),
            ("min_pt", self.min_pt),
            ("max_abs_eta", self.max_abs_eta),
            ("max_rel_iso", self.max_rel_iso),
            ("invalid_vtx_idx", self.invalid_vtx_idx),
            ("max_delta_z", self.max_delta_z),
        ];
        if let Some((name, v)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::Validation(format!("{name} must be finite, got {v}")));
        }
        if self.max_abs_eta < 0.0 {
            return Err(Error::Validation(format!(
                "max_abs_eta must be >= 0, got {}",
                self.max_abs_eta
            )));
        }
        if self.max_delta_z < 0.0 {
            return Err(Error::Validation(format!(
                "max_delta_z must be >= 0, got {}",
                self.max_delta_z
            )));
        }
        if self.min_muons < 2 {
            return Err(Error::Validation(format!(
                "min_muons must be >= 2 to form pairs, got {}",
                self.min_muons
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        SelectionConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: SelectionConfig = serde_json::from_str(r#"{"min_pt": 4.5}"#).unwrap();
        assert_eq!(cfg.min_pt, 4.5);
        assert_eq!(cfg.max_abs_eta, 2.4);
        assert_eq!(cfg.min_muons, 2);
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = SelectionConfig { min_muons: 1, ..Default::default() };
        assert!(cfg.validate().is_err());
        let cfg = SelectionConfig { max_delta_z: -0.1, ..Default::default() };
        assert!(cfg.validate().is_err());
        let cfg = SelectionConfig { min_pt: f64::NAN, ..Default::default() };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("min_pt"));
    }
}
