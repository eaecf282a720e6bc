//! Merge algebra and fill accounting over random inputs.

use mf_core::Accumulator;
use mf_hist::{BinAxis, CategoryAxis, CutflowCounter, Histogram, HistogramSet};
use proptest::prelude::*;

const CATEGORIES: &[&str] = &["DoubleMuon", "Charmonium", "MC"];

fn empty_hist() -> Histogram {
    Histogram::new_1d(
        "Counts",
        CategoryAxis::new("dataset", "Primary dataset"),
        BinAxis::new("mass", "m", 12, 0.25, 12.25).unwrap(),
    )
}

/// A histogram filled with random values across random categories.
fn filled_hist() -> impl Strategy<Value = Histogram> {
    proptest::collection::vec((0usize..CATEGORIES.len(), -5.0f64..20.0), 0..40).prop_map(|fills| {
        let mut h = empty_hist();
        for (c, v) in fills {
            h.fill(CATEGORIES[c], &[v]).unwrap();
        }
        h
    })
}

fn filled_set() -> impl Strategy<Value = HistogramSet> {
    (filled_hist(), filled_hist()).prop_map(|(a, b)| HistogramSet::new().with("a", a).with("b", b))
}

fn cutflow() -> impl Strategy<Value = CutflowCounter> {
    proptest::collection::vec(0u64..1000, 4).prop_map(|counts| {
        let mut cf = CutflowCounter::new();
        for (stage, c) in ["all", "one", "two", "three"].into_iter().zip(counts) {
            cf.add_event_count(stage, c);
        }
        cf
    })
}

proptest! {
    #[test]
    fn histogram_merge_commutes(a in filled_hist(), b in filled_hist()) {
        prop_assert_eq!(a.merge(&b).unwrap(), b.merge(&a).unwrap());
    }

    #[test]
    fn histogram_merge_associates(a in filled_hist(), b in filled_hist(), c in filled_hist()) {
        let left = a.merge(&b).unwrap().merge(&c).unwrap();
        let right = a.merge(&b.merge(&c).unwrap()).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn empty_histogram_is_identity(a in filled_hist()) {
        prop_assert_eq!(a.merge(&empty_hist()).unwrap(), a);
    }

    #[test]
    fn set_merge_commutes_and_associates(a in filled_set(), b in filled_set(), c in filled_set()) {
        prop_assert_eq!(a.merge(&b).unwrap(), b.merge(&a).unwrap());
        let left = a.merge(&b).unwrap().merge(&c).unwrap();
        let right = a.merge(&b.merge(&c).unwrap()).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn cutflow_merge_commutes_and_associates(a in cutflow(), b in cutflow(), c in cutflow()) {
        prop_assert_eq!(a.merge(&b).unwrap(), b.merge(&a).unwrap());
        let left = a.merge(&b).unwrap().merge(&c).unwrap();
        let right = a.merge(&b.merge(&c).unwrap()).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn bins_plus_flows_equal_fills(values in proptest::collection::vec(prop_oneof![
        -50.0f64..50.0,
        Just(f64::NAN),
        Just(f64::INFINITY),
    ], 0..200)) {
        let mut h = empty_hist();
        h.fill("DoubleMuon", &values).unwrap();
        let flow = h.flow("DoubleMuon", 0).unwrap();
        let in_range: u64 = h.values("DoubleMuon").unwrap().iter().sum();
        prop_assert_eq!(in_range + flow.underflow + flow.overflow + flow.nan, values.len() as u64);
        prop_assert_eq!(h.total("DoubleMuon"), values.len() as u64);
    }
}
