//! Property-based invariant tests for the capability tree.
//!
//! 1. Node ids are unique and dense (`0..n`) across every built tree.
//! 2. Lookup by node id is idempotent.
//! 3. A new maximal positive integer leaf strictly raises the domain max.
//! 4. Every leaf returned for a filter lies within the filter.
//! 5. Normalized filters never leave their domain.

use std::collections::HashSet;

use captree::domain::{
    build_tree, filter_leaves, find_node, normalize_filter, value_domain, SpendRow, ValueFilter,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn level_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        1 => Just(Some(String::new())),
        8 => prop::sample::select(vec!["A", "B", "C"]).prop_map(|s| Some(s.to_string())),
    ]
}

fn id_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        8 => prop::sample::select(vec!["x1", "x2", "x3", "x4"]).prop_map(|s| Some(s.to_string())),
    ]
}

fn value_strategy() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None),
        4 => (1u32..5000).prop_map(|v| Some(f64::from(v))),
        1 => (-100.0f64..100.0).prop_map(Some),
    ]
}

fn row_strategy() -> impl Strategy<Value = SpendRow> {
    (
        level_strategy(),
        level_strategy(),
        level_strategy(),
        id_strategy(),
        value_strategy(),
    )
        .prop_map(|(level1, level2, level3, id, value)| SpendRow {
            level1,
            level2,
            level3,
            id,
            name: None,
            value,
        })
}

fn rows_strategy() -> impl Strategy<Value = Vec<SpendRow>> {
    prop::collection::vec(row_strategy(), 0..40)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Node ids are unique and dense
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn node_ids_unique_and_dense(rows in rows_strategy()) {
        let root = build_tree(&rows);

        let ids: HashSet<String> = root.iter().map(|n| n.node_id().to_string()).collect();
        let expected: HashSet<String> = (0..root.node_count()).map(|i| i.to_string()).collect();
        prop_assert_eq!(ids, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Lookup is idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn lookup_idempotent(rows in rows_strategy(), probe in 0usize..200) {
        let root = build_tree(&rows);
        let node_id = probe.to_string();

        let first = find_node(&root, Some(&node_id));
        let second = find_node(&root, Some(&node_id));

        prop_assert_eq!(first.is_some(), probe < root.node_count());
        match (first, second) {
            (Some(a), Some(b)) => prop_assert!(std::ptr::eq(a, b)),
            (None, None) => {}
            _ => prop_assert!(false, "lookup of {} changed between calls", node_id),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Domain monotonicity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn new_maximum_raises_domain_max(rows in rows_strategy(), step in 1u32..1000) {
        let before = value_domain(&build_tree(&rows));
        let new_max = before.max().floor() + f64::from(step);

        let mut grown = rows.clone();
        grown.push(SpendRow::new("A", "B", "C", "new-leaf", new_max));
        let after = value_domain(&build_tree(&grown));

        prop_assert!(after.max() > before.max(), "{} -> {}", before, after);
        prop_assert_eq!(after.max(), new_max);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Filter containment
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn filtered_leaves_within_filter(rows in rows_strategy(), lo in 0u32..3000, span in 0u32..3000) {
        let root = build_tree(&rows);
        let filter = ValueFilter::new(f64::from(lo), f64::from(lo + span));
        prop_assert!(filter.is_some());

        for node in root.iter().filter(|n| n.is_branch()) {
            let node_id = node.node_id().to_string();
            let leaves = filter_leaves(&root, Some(&node_id), filter);
            prop_assert!(leaves.is_some(), "branch {} must resolve", node_id);

            for leaf in leaves.unwrap_or_default() {
                let value = leaf.value();
                prop_assert!(value.is_some(), "leaf without value returned");
                prop_assert!(
                    filter.is_some_and(|f| value.is_some_and(|v| f.contains(v))),
                    "{:?} outside {:?}", value, filter
                );
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Normalized filters stay inside the domain
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn normalized_filter_within_domain(
        a in 0u32..5000,
        b in 0u32..5000,
        candidate in prop::collection::vec(-10.0f64..6000.0, 0..4),
    ) {
        let domain = ValueFilter::new(f64::from(a.min(b)), f64::from(a.max(b)));
        prop_assert!(domain.is_some());
        let Some(domain) = domain else { return Ok(()); };

        if let Some(filter) = normalize_filter(domain, &candidate) {
            prop_assert!(filter.min() >= domain.min());
            prop_assert!(filter.max() <= domain.max());
            prop_assert!(filter.min() <= filter.max());
        }
    }
}
