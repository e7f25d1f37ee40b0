//! Value domains and value filters.
//!
//! The domain of a subtree is the range a filter may move in. User input is
//! reconciled with that domain by [`FilterNormalizer`].

use std::fmt;

use serde::Serialize;

use crate::domain::node::TreeNode;

/// Inclusive numeric range `[min, max]` with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueFilter {
    min: f64,
    max: f64,
}

impl ValueFilter {
    /// Domain used when a subtree has no qualifying values.
    pub const DEFAULT_DOMAIN: ValueFilter = ValueFilter { min: 0.0, max: 1.0 };

    /// `None` unless `min <= max` (NaN bounds are rejected).
    pub fn new(min: f64, max: f64) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for ValueFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

fn is_positive_integer(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value.fract() == 0.0
}

/// Domain of all leaf values reachable from `node`.
///
/// Only distinct positive integers count. No value gives `[0, 1]`, a single
/// value `v` gives `[0, v]`.
pub fn value_domain(node: &TreeNode) -> ValueFilter {
    let mut values: Vec<f64> = node
        .iter()
        .filter_map(TreeNode::value)
        .filter(|value| is_positive_integer(*value))
        .collect();
    values.sort_by(f64::total_cmp);
    values.dedup();

    match values.as_slice() {
        [] => ValueFilter::DEFAULT_DOMAIN,
        [only] => ValueFilter {
            min: 0.0,
            max: *only,
        },
        [first, .., last] => ValueFilter {
            min: *first,
            max: *last,
        },
    }
}

/// Reconciles raw range input with a domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterNormalizer {
    domain: ValueFilter,
}

impl FilterNormalizer {
    pub fn new(domain: ValueFilter) -> Self {
        Self { domain }
    }

    pub fn domain(&self) -> ValueFilter {
        self.domain
    }

    /// Turn `candidate` into a filter inside the domain, or `None` if it does not fit.
    ///
    /// A single value `v` yields `[domain.min, v]`: the floor stays pinned to the
    /// domain minimum. With two or more values the two smallest form the range.
    pub fn normalize(&self, candidate: &[f64]) -> Option<ValueFilter> {
        let ValueFilter { min, max } = self.domain;
        match candidate {
            [] => None,
            [value] => (*value >= min && *value <= max).then_some(ValueFilter { min, max: *value }),
            _ => {
                let mut sorted = candidate.to_vec();
                sorted.sort_by(f64::total_cmp);
                let [lo, hi, ..] = sorted.as_slice() else {
                    return None;
                };
                (*lo >= min && *hi <= max).then_some(ValueFilter { min: *lo, max: *hi })
            }
        }
    }
}

/// One-shot form of [`FilterNormalizer::normalize`].
pub fn normalize_filter(domain: ValueFilter, candidate: &[f64]) -> Option<ValueFilter> {
    FilterNormalizer::new(domain).normalize(candidate)
}
