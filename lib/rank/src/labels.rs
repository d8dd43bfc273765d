//! Graded relevance labels for ranking.
//!
//! The listwise objective needs per-group candidate counts and integer
//! relevance labels. We use the sub-category as the group (the "query"
//! unit) and derive labels from value-score rank within the group:
//! higher value rescales to a higher label in `0..=MAX_LABEL`.

use cartx_core::Product;
use std::collections::BTreeMap;

/// Label ceiling. Graded-relevance losses cap the label scale; labels
/// never exceed this value.
pub const MAX_LABEL: u32 = 30;

/// One labeled group of training rows. `indices` point into the usable
/// row set the labels were built from.
#[derive(Debug, Clone)]
pub struct LabeledGroup {
    pub key: String,
    pub indices: Vec<usize>,
    pub labels: Vec<u32>,
}

impl LabeledGroup {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Partition `products` by sub-category and assign relevance labels.
///
/// Within a group, members are ranked ascending by value score (stable
/// on ties) and ranks are rescaled linearly to `0..=MAX_LABEL`. Groups
/// of size 1 and constant-value groups collapse to label 0. Labels are
/// non-decreasing in value score by construction.
pub fn build_groups_and_labels(products: &[Product]) -> Vec<LabeledGroup> {
    let mut by_group: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, p) in products.iter().enumerate() {
        by_group.entry(p.sub_category.as_str()).or_default().push(i);
    }

    by_group
        .into_iter()
        .map(|(key, indices)| {
            let labels = label_group(products, &indices);
            LabeledGroup {
                key: key.to_string(),
                indices,
                labels,
            }
        })
        .collect()
}

fn label_group(products: &[Product], indices: &[usize]) -> Vec<u32> {
    let n = indices.len();
    let values: Vec<f64> = indices
        .iter()
        .map(|&i| products[i].value_score.unwrap_or(0.0))
        .collect();

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if n < 2 || max <= min {
        return vec![0; n];
    }

    // Stable ascending rank by value score; ties keep input order.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut labels = vec![0u32; n];
    let span = (n - 1) as f64;
    for (rank, &pos) in order.iter().enumerate() {
        let scaled = (rank as f64 / span * f64::from(MAX_LABEL)).round() as u32;
        labels[pos] = scaled.min(MAX_LABEL);
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(sub: &str, value: f64) -> Product {
        Product::new("sku", "item", sub, 1.0).with_value(1.0, value)
    }

    #[test]
    fn test_singleton_group_gets_label_zero() {
        let products = vec![product("Poultry", 5.0)];
        let groups = build_groups_and_labels(&products);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].labels, vec![0]);
    }

    #[test]
    fn test_constant_value_group_collapses_to_zero() {
        let products = vec![
            product("Dairy", 1.5),
            product("Dairy", 1.5),
            product("Dairy", 1.5),
        ];
        let groups = build_groups_and_labels(&products);
        assert_eq!(groups[0].labels, vec![0, 0, 0]);
    }

    #[test]
    fn test_labels_span_full_range() {
        let products: Vec<Product> = (0..4).map(|i| product("Poultry", f64::from(i))).collect();
        let groups = build_groups_and_labels(&products);
        assert_eq!(*groups[0].labels.iter().min().unwrap(), 0);
        assert_eq!(*groups[0].labels.iter().max().unwrap(), MAX_LABEL);
    }

    #[test]
    fn test_labels_monotonic_in_value_score() {
        let products = vec![
            product("Poultry", 2.0),
            product("Poultry", 0.5),
            product("Poultry", 1.0),
            product("Poultry", 1.25),
        ];
        let groups = build_groups_and_labels(&products);
        let labels = &groups[0].labels;
        // value order: 0.5 < 1.0 < 1.25 < 2.0
        assert!(labels[1] < labels[2]);
        assert!(labels[2] < labels[3]);
        assert!(labels[3] < labels[0]);
    }

    #[test]
    fn test_groups_partition_by_sub_category() {
        let products = vec![
            product("Poultry", 1.0),
            product("Seafood", 2.0),
            product("Poultry", 3.0),
        ];
        let groups = build_groups_and_labels(&products);
        assert_eq!(groups.len(), 2);
        let total: usize = groups.iter().map(LabeledGroup::len).sum();
        assert_eq!(total, 3);
    }
}
