//! Tests for value domains and filter normalization

use rstest::rstest;

use captree::domain::{
    build_tree, find_node, normalize_filter, value_domain, FilterNormalizer, SpendRow,
    ValueFilter,
};

fn range(min: f64, max: f64) -> ValueFilter {
    ValueFilter::new(min, max).expect("valid range")
}

fn leaves(values: &[f64]) -> Vec<SpendRow> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| SpendRow::new("A", "B", "C", &format!("x{}", i), *value))
        .collect()
}

// ============================================================
// Range analyzer
// ============================================================

#[rstest]
#[case(&[], range(0.0, 1.0))]
#[case(&[42.0], range(0.0, 42.0))]
#[case(&[42.0, 42.0], range(0.0, 42.0))]
#[case(&[100.0, 5000.0], range(100.0, 5000.0))]
#[case(&[300.0, 7.0, 90.0], range(7.0, 300.0))]
#[case(&[0.0, -5.0, 2.5], range(0.0, 1.0))]
#[case(&[2.5, 12.0], range(0.0, 12.0))]
fn given_leaf_values_when_analyzing_then_domain(
    #[case] values: &[f64],
    #[case] expected: ValueFilter,
) {
    let root = build_tree(&leaves(values));

    assert_eq!(value_domain(&root), expected);
}

#[test]
fn given_subtree_when_analyzing_then_only_its_leaves_count() {
    let root = build_tree(&[
        SpendRow::new("A", "B", "C", "x1", 10.0),
        SpendRow::new("A", "B", "C", "x2", 20.0),
        SpendRow::new("Z", "Y", "X", "z1", 900.0),
    ]);

    let a = find_node(&root, Some("1")).unwrap();
    assert_eq!(a.id(), "A");

    assert_eq!(value_domain(a), range(10.0, 20.0));
    assert_eq!(value_domain(&root), range(10.0, 900.0));
}

#[test]
fn given_leaf_node_when_analyzing_then_domain_of_its_own_value() {
    let root = build_tree(&[SpendRow::new("A", "B", "C", "x1", 10.0)]);

    let leaf = find_node(&root, Some("4")).unwrap();
    assert_eq!(value_domain(leaf), range(0.0, 10.0));
}

// ============================================================
// Filter normalizer
// ============================================================

#[rstest]
#[case(&[150.0], None)]
#[case(&[50.0], Some(range(10.0, 50.0)))]
#[case(&[30.0, 20.0], Some(range(20.0, 30.0)))]
#[case(&[5.0, 50.0], None)]
#[case(&[50.0, 150.0], None)]
#[case(&[10.0, 100.0], Some(range(10.0, 100.0)))]
#[case(&[], None)]
#[case(&[5.0], None)]
#[case(&[100.0], Some(range(10.0, 100.0)))]
#[case(&[60.0, 20.0, 40.0], Some(range(20.0, 40.0)))]
fn given_candidate_when_normalizing_against_10_100_then_expected(
    #[case] candidate: &[f64],
    #[case] expected: Option<ValueFilter>,
) {
    let domain = range(10.0, 100.0);

    assert_eq!(normalize_filter(domain, candidate), expected);
}

/// Documented quirk: a single value keeps the floor at the domain minimum,
/// even when a narrower floor was applied before.
#[test]
fn given_single_value_after_narrow_range_when_normalizing_then_floor_resets_to_domain_min() {
    let normalizer = FilterNormalizer::new(range(10.0, 100.0));

    let narrow = normalizer.normalize(&[40.0, 60.0]).unwrap();
    assert_eq!(narrow.min(), 40.0);

    let widened = normalizer.normalize(&[60.0]).unwrap();
    assert_eq!(widened, range(10.0, 60.0));
}

#[rstest]
#[case(&[f64::NAN])]
#[case(&[f64::NAN, 50.0])]
#[case(&[20.0, f64::NAN])]
#[case(&[f64::INFINITY])]
fn given_non_finite_candidate_when_normalizing_then_invalid(#[case] candidate: &[f64]) {
    assert!(normalize_filter(range(10.0, 100.0), candidate).is_none());
}
