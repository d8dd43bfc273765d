//! The value ranker: budget cutoff, relevance guard, score fusion.

use crate::labels::{build_groups_and_labels, LabeledGroup, MAX_LABEL};
use crate::model::{train, LinearRankModel, TrainOptions};
use cartx_core::{Candidate, Error, Product, Result, FEATURE_COUNT, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{error, info, warn};

/// Ranker tuning knobs. The relevance floor and fusion weight are
/// dataset-specific, so they are parameters rather than constants.
#[derive(Debug, Clone)]
pub struct RankerConfig {
    /// Candidates with `search_score` at or below this are treated as
    /// irrelevant to the query and dropped before scoring.
    pub relevance_floor: f64,
    /// Multiplier on `search_score` in the fused score. Relevance
    /// dominates; the value score breaks ties.
    pub relevance_weight: f64,
    /// Minimum usable rows required to fit the model.
    pub min_train_rows: usize,
    pub train: TrainOptions,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            relevance_floor: 0.01,
            relevance_weight: 5.0,
            min_train_rows: 10,
            train: TrainOptions::default(),
        }
    }
}

/// Model state: either a trained scorer or the rule-based fallback.
enum RankerModel {
    Untrained,
    Trained(LinearRankModel),
}

pub struct ValueRanker {
    model: RankerModel,
    config: RankerConfig,
}

#[derive(Serialize, Deserialize)]
struct RankerArtifact {
    feature_names: Vec<String>,
    weights: Vec<f64>,
    bias: f64,
}

impl Default for ValueRanker {
    fn default() -> Self {
        Self::new(RankerConfig::default())
    }
}

impl ValueRanker {
    #[must_use]
    pub fn new(config: RankerConfig) -> Self {
        Self {
            model: RankerModel::Untrained,
            config,
        }
    }

    #[must_use]
    pub fn is_trained(&self) -> bool {
        matches!(self.model, RankerModel::Trained(_))
    }

    /// Rank `candidates` under a hard budget cutoff and return the best
    /// `top_n` by fused score. An empty result is a normal outcome, not
    /// an error: the budget filter and the relevance guard may both
    /// legitimately empty the set.
    #[must_use]
    pub fn rank(&self, candidates: Vec<Candidate>, budget: f64, top_n: usize) -> Vec<Candidate> {
        let affordable: Vec<Candidate> = candidates
            .into_iter()
            .filter(|c| c.product.package_price <= budget)
            .collect();
        if affordable.is_empty() {
            warn!("No products within budget {:.2}", budget);
            return Vec::new();
        }

        // Relevance guard: near-zero search scores mean the candidate
        // only survived retrieval because the pool was wider than the
        // catalog. Unscored candidates pass through.
        let has_scores = affordable.iter().any(|c| c.search_score.is_some());
        let relevant: Vec<Candidate> = if has_scores {
            let floor = self.config.relevance_floor;
            affordable
                .into_iter()
                .filter(|c| c.search_score.map_or(true, |s| s > floor))
                .collect()
        } else {
            affordable
        };
        if relevant.is_empty() {
            warn!("No relevant products for query after low-score filtering");
            return Vec::new();
        }

        let mut scored: Vec<(f64, Candidate)> = relevant
            .into_iter()
            .map(|c| (self.fused_score(&c), c))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_n);
        scored.into_iter().map(|(_, c)| c).collect()
    }

    fn fused_score(&self, candidate: &Candidate) -> f64 {
        let base = match &self.model {
            RankerModel::Trained(model) => model.score(&candidate.product.features.sanitized()),
            RankerModel::Untrained => {
                candidate.product.value_score.unwrap_or(0.0) + candidate.product.discount_pct
            }
        };
        match candidate.search_score {
            Some(s) => base + s * self.config.relevance_weight,
            None => base,
        }
    }

    /// Fit the ranking model. Logs and leaves the prior model state
    /// untouched when there is too little usable data.
    pub fn fit(&mut self, products: &[Product]) {
        let usable: Vec<Product> = products
            .iter()
            .filter(|p| p.price_per_100g.is_some() && p.value_score.is_some())
            .cloned()
            .collect();
        info!("Rows after dropping incomplete: {}", usable.len());

        if usable.len() < self.config.min_train_rows {
            error!(
                "Too few rows ({}) to train ranker; keeping previous model state",
                usable.len()
            );
            return;
        }

        let groups = build_groups_and_labels(&usable);
        log_label_stats(&groups);

        let rows: Vec<[f64; FEATURE_COUNT]> =
            usable.iter().map(|p| p.features.sanitized()).collect();
        let model = train(&rows, &groups, &self.config.train);
        log_top_weights(&model);
        self.model = RankerModel::Trained(model);
        info!("Ranker training complete");
    }

    // ── Persistence ──────────────────────────────────────────────────

    pub fn save(&self, path: &Path) -> Result<()> {
        let model = match &self.model {
            RankerModel::Trained(m) => m,
            RankerModel::Untrained => {
                return Err(Error::Storage(
                    "cannot persist an untrained ranker".to_string(),
                ))
            }
        };
        let artifact = RankerArtifact {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            weights: model.weights.clone(),
            bias: model.bias,
        };
        let data =
            bincode::serialize(&artifact).map_err(|e| Error::Serialization(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, &data)?;
        std::fs::rename(&tmp, path)?;
        info!("Ranker model saved to {}", path.display());
        Ok(())
    }

    /// Load a persisted ranker, failing fast when the artifact's feature
    /// list disagrees with the current feature contract.
    pub fn load(path: &Path, config: RankerConfig) -> Result<Self> {
        let data = std::fs::read(path)?;
        let artifact: RankerArtifact =
            bincode::deserialize(&data).map_err(|e| Error::Serialization(e.to_string()))?;

        let expected: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        if artifact.feature_names != expected {
            return Err(Error::SchemaMismatch {
                expected,
                actual: artifact.feature_names,
            });
        }

        info!("Ranker model loaded from {}", path.display());
        Ok(Self {
            model: RankerModel::Trained(LinearRankModel {
                weights: artifact.weights,
                bias: artifact.bias,
            }),
            config,
        })
    }
}

fn log_label_stats(groups: &[LabeledGroup]) {
    let (mut lo, mut hi) = (MAX_LABEL, 0);
    let mut total = 0usize;
    for g in groups {
        for &l in &g.labels {
            lo = lo.min(l);
            hi = hi.max(l);
        }
        total += g.len();
    }
    let avg = if groups.is_empty() {
        0.0
    } else {
        total as f64 / groups.len() as f64
    };
    info!(
        "Relevance label range: {} - {}; {} groups, avg size {:.1}",
        lo,
        hi,
        groups.len(),
        avg
    );
}

fn log_top_weights(model: &LinearRankModel) {
    let mut ranked: Vec<(&str, f64)> = FEATURE_NAMES
        .iter()
        .zip(model.weights.iter())
        .map(|(&name, &w)| (name, w.abs()))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(5);
    info!("Top 5 features by |weight|: {:?}", ranked);
}
