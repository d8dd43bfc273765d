//! Pairwise-logistic linear ranking model.
//!
//! Trains a linear scorer on within-group label-discordant pairs: for a
//! pair (better, worse) the loss is `ln(1 + exp(-(s_b - s_w)))`, the
//! classic RankNet objective restricted to a linear function. Groups are
//! the listwise unit: pairs never cross group boundaries, and the
//! train/validation split is group-disjoint.

use crate::labels::LabeledGroup;
use cartx_core::FEATURE_COUNT;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A trained linear scorer over the feature contract. Raw scores are
/// only meaningful for ordering; the bias exists so standardization can
/// be folded into the weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRankModel {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LinearRankModel {
    /// Raw score for one sanitized feature row.
    #[must_use]
    pub fn score(&self, features: &[f64]) -> f64 {
        self.bias
            + self
                .weights
                .iter()
                .zip(features.iter())
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

/// Training hyperparameters.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub learning_rate: f64,
    pub max_epochs: usize,
    /// Epochs without validation improvement before stopping.
    pub patience: usize,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            learning_rate: 0.05,
            max_epochs: 200,
            patience: 20,
        }
    }
}

/// A (better, worse) row-index pair with strictly different labels.
type Pair = (usize, usize);

/// Train on labeled groups over the given feature rows.
///
/// With two or more groups, a deterministic group-disjoint 80/20 split
/// is used and training stops early on validation pair loss; with a
/// single group all pairs train without validation.
pub fn train(rows: &[[f64; FEATURE_COUNT]], groups: &[LabeledGroup], opts: &TrainOptions) -> LinearRankModel {
    let (train_groups, val_groups) = split_groups(groups);

    let train_pairs = collect_pairs(&train_groups);
    let val_pairs = collect_pairs(&val_groups);
    info!(
        "Ranking pairs: {} train, {} validation ({} / {} groups)",
        train_pairs.len(),
        val_pairs.len(),
        train_groups.len(),
        val_groups.len()
    );

    // Standardize features for stable gradients; folded back below.
    let (means, stds) = column_stats(rows);
    let scaled: Vec<[f64; FEATURE_COUNT]> = rows
        .iter()
        .map(|row| {
            let mut out = [0.0; FEATURE_COUNT];
            for k in 0..FEATURE_COUNT {
                out[k] = (row[k] - means[k]) / stds[k];
            }
            out
        })
        .collect();

    let mut weights = [0.0f64; FEATURE_COUNT];
    let mut best_weights = weights;
    let mut best_loss = f64::INFINITY;
    let mut stale_epochs = 0;

    for _epoch in 0..opts.max_epochs {
        for &(better, worse) in &train_pairs {
            let margin: f64 = (0..FEATURE_COUNT)
                .map(|k| weights[k] * (scaled[better][k] - scaled[worse][k]))
                .sum();
            // d/ds ln(1 + e^-s) = sigmoid(s) - 1
            let grad = sigmoid(margin) - 1.0;
            for k in 0..FEATURE_COUNT {
                weights[k] -= opts.learning_rate * grad * (scaled[better][k] - scaled[worse][k]);
            }
        }

        if val_pairs.is_empty() {
            continue;
        }
        let loss = pair_loss(&scaled, &weights, &val_pairs);
        if loss + 1e-9 < best_loss {
            best_loss = loss;
            best_weights = weights;
            stale_epochs = 0;
        } else {
            stale_epochs += 1;
            if stale_epochs >= opts.patience {
                break;
            }
        }
    }

    let final_weights = if val_pairs.is_empty() { weights } else { best_weights };

    // Fold standardization into the weights so score() consumes raw rows.
    let mut folded = vec![0.0f64; FEATURE_COUNT];
    let mut bias = 0.0;
    for k in 0..FEATURE_COUNT {
        folded[k] = final_weights[k] / stds[k];
        bias -= final_weights[k] * means[k] / stds[k];
    }

    LinearRankModel {
        weights: folded,
        bias,
    }
}

/// Deterministic group-disjoint 80/20 split: groups arrive sorted by
/// key; the last fifth (at least one when >=2 groups) validates.
fn split_groups(groups: &[LabeledGroup]) -> (Vec<&LabeledGroup>, Vec<&LabeledGroup>) {
    if groups.len() < 2 {
        return (groups.iter().collect(), Vec::new());
    }
    let val_count = (groups.len() / 5).max(1);
    let split = groups.len() - val_count;
    (
        groups[..split].iter().collect(),
        groups[split..].iter().collect(),
    )
}

fn collect_pairs(groups: &[&LabeledGroup]) -> Vec<Pair> {
    let mut pairs = Vec::new();
    for group in groups {
        for a in 0..group.len() {
            for b in (a + 1)..group.len() {
                match group.labels[a].cmp(&group.labels[b]) {
                    std::cmp::Ordering::Greater => {
                        pairs.push((group.indices[a], group.indices[b]));
                    }
                    std::cmp::Ordering::Less => {
                        pairs.push((group.indices[b], group.indices[a]));
                    }
                    std::cmp::Ordering::Equal => {}
                }
            }
        }
    }
    pairs
}

fn pair_loss(rows: &[[f64; FEATURE_COUNT]], weights: &[f64; FEATURE_COUNT], pairs: &[Pair]) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }
    let total: f64 = pairs
        .iter()
        .map(|&(better, worse)| {
            let margin: f64 = (0..FEATURE_COUNT)
                .map(|k| weights[k] * (rows[better][k] - rows[worse][k]))
                .sum();
            (1.0 + (-margin).exp()).ln()
        })
        .sum();
    total / pairs.len() as f64
}

fn column_stats(rows: &[[f64; FEATURE_COUNT]]) -> ([f64; FEATURE_COUNT], [f64; FEATURE_COUNT]) {
    let n = rows.len().max(1) as f64;
    let mut means = [0.0f64; FEATURE_COUNT];
    for row in rows {
        for k in 0..FEATURE_COUNT {
            means[k] += row[k];
        }
    }
    for m in &mut means {
        *m /= n;
    }

    let mut stds = [0.0f64; FEATURE_COUNT];
    for row in rows {
        for k in 0..FEATURE_COUNT {
            let d = row[k] - means[k];
            stds[k] += d * d;
        }
    }
    for s in &mut stds {
        *s = (*s / n).sqrt();
        if *s <= 1e-12 {
            *s = 1.0;
        }
    }
    (means, stds)
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
