//! Four-vector arithmetic for pair candidates.

use std::ops::Add;

use mf_columnar::{PairRecord, PairSide, RaggedArray};
use mf_core::Result;

/// Cartesian four-momentum `(px, py, pz, E)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LorentzVector {
    /// x momentum.
    pub px: f64,
    /// y momentum.
    pub py: f64,
    /// z momentum.
    pub pz: f64,
    /// Energy.
    pub e: f64,
}

impl LorentzVector {
    /// Build from collider coordinates.
    pub fn from_pt_eta_phi_m(pt: f64, eta: f64, phi: f64, mass: f64) -> Self {
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let p = pt * eta.cosh();
        Self { px, py, pz, e: (p * p + mass * mass).sqrt() }
    }

    /// Transverse momentum.
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Pseudorapidity; ±inf along the beam axis, NaN for a null momentum.
    pub fn eta(&self) -> f64 {
        (self.pz / self.pt()).asinh()
    }

    /// Azimuth in `(-π, π]`.
    pub fn phi(&self) -> f64 {
        self.py.atan2(self.px)
    }

    /// Squared invariant mass.
    pub fn mass2(&self) -> f64 {
        self.e * self.e - self.px * self.px - self.py * self.py - self.pz * self.pz
    }

    /// Invariant mass, signed: space-like vectors give `-sqrt(-m²)`.
    pub fn mass(&self) -> f64 {
        let m2 = self.mass2();
        m2.abs().sqrt().copysign(m2)
    }
}

impl Add for LorentzVector {
    type Output = LorentzVector;

    fn add(self, rhs: Self) -> Self {
        Self { px: self.px + rhs.px, py: self.py + rhs.py, pz: self.pz + rhs.pz, e: self.e + rhs.e }
    }
}

/// Four-momenta of one pair side, from its `pt, eta, phi, mass` fields.
pub fn side_p4(side: PairSide<'_>) -> Result<RaggedArray<LorentzVector>> {
    let pt = side.field("pt")?;
    let eta = side.field("eta")?;
    let phi = side.field("phi")?;
    let mass = side.field("mass")?;
    let flat = pt
        .flat()
        .iter()
        .zip(eta.flat())
        .zip(phi.flat().iter().zip(mass.flat()))
        .map(|((&pt, &eta), (&phi, &m))| LorentzVector::from_pt_eta_phi_m(pt, eta, phi, m))
        .collect();
    RaggedArray::from_layout(pt.layout().clone(), flat)
}

/// Summed four-momentum of every pair.
pub fn candidate_p4(pairs: &PairRecord<'_>) -> Result<RaggedArray<LorentzVector>> {
    side_p4(pairs.first())?.zip_with(&side_p4(pairs.second())?, |a, b| *a + *b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mf_columnar::{RecordArray, distinct_pairs};

    const MU_MASS: f64 = 0.105_658_375_5;

    #[test]
    fn roundtrip_coordinates() {
        let v = LorentzVector::from_pt_eta_phi_m(25.0, -1.3, 2.1, MU_MASS);
        assert_relative_eq!(v.pt(), 25.0, epsilon = 1e-12);
        assert_relative_eq!(v.eta(), -1.3, epsilon = 1e-12);
        assert_relative_eq!(v.phi(), 2.1, epsilon = 1e-12);
        assert_relative_eq!(v.mass(), MU_MASS, epsilon = 1e-6);
    }

    #[test]
    fn back_to_back_pair_mass() {
        // massless, back-to-back in the transverse plane: m = 2 pt
        let a = LorentzVector::from_pt_eta_phi_m(10.0, 0.0, 0.0, 0.0);
        let b = LorentzVector::from_pt_eta_phi_m(10.0, 0.0, std::f64::consts::PI, 0.0);
        let s = a + b;
        assert_relative_eq!(s.mass(), 20.0, epsilon = 1e-9);
        assert!(s.pt() < 1e-9);
    }

    #[test]
    fn null_momentum_has_nan_eta() {
        let v = LorentzVector { px: 0.0, py: 0.0, pz: 0.0, e: 1.0 };
        assert!(v.eta().is_nan());
        let v = LorentzVector { px: 0.0, py: 0.0, pz: 2.0, e: 3.0 };
        assert_eq!(v.eta(), f64::INFINITY);
    }

    #[test]
    fn space_like_mass_is_negative() {
        let v = LorentzVector { px: 3.0, py: 0.0, pz: 0.0, e: 0.0 };
        assert_relative_eq!(v.mass(), -3.0);
    }

    #[test]
    fn candidates_follow_pair_layout() {
        let muons = RecordArray::from_counts(
            &[1, 3],
            [
                ("pt", vec![5.0, 10.0, 20.0, 30.0]),
                ("eta", vec![0.0, 0.5, -0.5, 1.0]),
                ("phi", vec![0.0, 0.1, 0.2, -3.0]),
                ("mass", vec![MU_MASS; 4]),
            ],
        )
        .unwrap();
        let pairs = distinct_pairs(&muons);
        let p4 = candidate_p4(&pairs).unwrap();
        assert_eq!(p4.counts(), &[0, 3]);
        let expected = LorentzVector::from_pt_eta_phi_m(10.0, 0.5, 0.1, MU_MASS)
            + LorentzVector::from_pt_eta_phi_m(30.0, 1.0, -3.0, MU_MASS);
        assert_relative_eq!(p4.event(1)[1].mass(), expected.mass(), epsilon = 1e-12);
    }
}
