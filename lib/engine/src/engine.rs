//! The recommendation engine: retrieval, soft location filters, value
//! ranking, presentation rounding.

use cartx_core::{soft_retain, Candidate, Error, Result};
use cartx_index::RetrievalIndex;
use cartx_rank::ValueRanker;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How many candidates to pull from retrieval before filtering and
    /// ranking. Wider than `top_n` so the budget cutoff and location
    /// filters have slack to work with.
    pub overretrieve: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { overretrieve: 50 }
    }
}

/// One presentation-ready recommendation row. Monetary fields are
/// rounded to cents and the discount is expressed in percent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub sku: String,
    pub name: String,
    pub brand: String,
    pub sub_category: String,
    pub package_price: f64,
    pub price_per_100g: Option<f64>,
    pub discount_pct: f64,
    pub value_score: Option<f64>,
    pub availability_score: f64,
    pub is_special: bool,
    pub city: String,
    pub state: String,
    pub product_url: String,
    pub search_score: Option<f64>,
}

impl From<Candidate> for Recommendation {
    fn from(candidate: Candidate) -> Self {
        let p = candidate.product;
        Self {
            sku: p.sku,
            name: p.name,
            brand: p.brand,
            sub_category: p.sub_category,
            package_price: round2(p.package_price),
            price_per_100g: p.price_per_100g.map(round2),
            discount_pct: round1(p.discount_pct * 100.0),
            value_score: p.value_score.map(round2),
            availability_score: round2(p.availability_score),
            is_special: p.is_special,
            city: p.city,
            state: p.state,
            product_url: p.product_url,
            search_score: candidate.search_score,
        }
    }
}

/// Owns the retrieval index and the ranker; the two never talk to each
/// other except through this pipeline.
pub struct RecommendationEngine {
    index: RetrievalIndex,
    ranker: ValueRanker,
    config: EngineConfig,
}

impl RecommendationEngine {
    #[must_use]
    pub fn new(index: RetrievalIndex, ranker: ValueRanker) -> Self {
        Self::with_config(index, ranker, EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(index: RetrievalIndex, ranker: ValueRanker, config: EngineConfig) -> Self {
        Self {
            index,
            ranker,
            config,
        }
    }

    #[must_use]
    pub fn index(&self) -> &RetrievalIndex {
        &self.index
    }

    /// Recommend up to `top_n` products for a free-text query under a
    /// hard budget cutoff.
    ///
    /// Location filters are soft: when no candidate matches the
    /// requested city (or state) the filter is skipped rather than
    /// returning nothing. An empty result after ranking is a normal
    /// outcome.
    pub fn recommend(
        &self,
        query: &str,
        budget: f64,
        city: Option<&str>,
        state: Option<&str>,
        top_n: usize,
    ) -> Result<Vec<Recommendation>> {
        if budget <= 0.0 {
            return Err(Error::InvalidBudget(budget));
        }

        let mut candidates = self.index.search(query, self.config.overretrieve)?;
        debug!("Retrieved {} candidates for {:?}", candidates.len(), query);

        if let Some(city) = city {
            candidates = soft_retain(candidates, |c| {
                c.product.city.eq_ignore_ascii_case(city)
            });
        }
        if let Some(state) = state {
            candidates = soft_retain(candidates, |c| {
                c.product.state.eq_ignore_ascii_case(state)
            });
        }

        let ranked = self.ranker.rank(candidates, budget, top_n);
        info!(
            "Query {:?}: {} recommendations under budget {:.2}",
            query,
            ranked.len(),
            budget
        );
        Ok(ranked.into_iter().map(Recommendation::from).collect())
    }
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartx_core::Product;
    use cartx_index::IndexConfig;

    fn sample_catalog() -> Vec<Product> {
        vec![
            Product::new("p1", "Fresh Chicken Breast", "Poultry", 8.0)
                .with_value(0.8, 1.5)
                .with_location("Springfield", "IL"),
            Product::new("p2", "Chicken Thighs Bulk", "Poultry", 6.0)
                .with_value(0.6, 2.0)
                .with_discount(0.15)
                .with_availability(0.85)
                .with_location("Shelbyville", "IL"),
            Product::new("p3", "Premium Chicken Breast", "Poultry", 25.0)
                .with_value(2.5, 0.5)
                .with_location("Springfield", "IL"),
            Product::new("p4", "Whole Milk 2L", "Dairy", 3.0)
                .with_value(0.15, 1.0)
                .with_location("Springfield", "IL"),
        ]
    }

    fn engine() -> RecommendationEngine {
        let mut index = RetrievalIndex::new(IndexConfig {
            prefer_lexical: true,
            ..IndexConfig::default()
        });
        index.build(sample_catalog());
        RecommendationEngine::new(index, ValueRanker::default())
    }

    #[test]
    fn test_recommend_rejects_non_positive_budget() {
        let e = engine();
        assert!(matches!(
            e.recommend("chicken", 0.0, None, None, 5),
            Err(Error::InvalidBudget(_))
        ));
        assert!(matches!(
            e.recommend("chicken", -3.0, None, None, 5),
            Err(Error::InvalidBudget(_))
        ));
    }

    #[test]
    fn test_recommend_filters_by_budget() {
        let e = engine();
        let recs = e.recommend("chicken breast", 10.0, None, None, 5).unwrap();
        assert!(!recs.is_empty());
        assert!(recs.iter().all(|r| r.package_price <= 10.0));
        assert!(recs.iter().all(|r| r.sku != "p3"));
    }

    #[test]
    fn test_city_filter_is_soft() {
        let e = engine();
        // No candidate is in this city; the filter must not empty the set.
        let recs = e
            .recommend("chicken", 10.0, Some("Nowhere"), None, 5)
            .unwrap();
        assert!(!recs.is_empty());
    }

    #[test]
    fn test_city_filter_applies_when_it_matches() {
        let e = engine();
        let recs = e
            .recommend("chicken", 10.0, Some("shelbyville"), None, 5)
            .unwrap();
        assert!(!recs.is_empty());
        assert!(recs.iter().all(|r| r.city == "Shelbyville"));
    }

    #[test]
    fn test_discount_presented_in_percent() {
        let e = engine();
        let recs = e.recommend("chicken thighs", 10.0, None, None, 5).unwrap();
        let thighs = recs.iter().find(|r| r.sku == "p2").unwrap();
        assert_eq!(thighs.discount_pct, 15.0);
    }

    #[test]
    fn test_availability_carried_into_output() {
        let e = engine();
        let recs = e.recommend("chicken thighs", 10.0, None, None, 5).unwrap();
        let thighs = recs.iter().find(|r| r.sku == "p2").unwrap();
        assert_eq!(thighs.availability_score, 0.85);
    }

    #[test]
    fn test_irrelevant_query_yields_empty() {
        let e = engine();
        let recs = e.recommend("zyzzyva", 10.0, None, None, 5).unwrap();
        assert!(recs.is_empty());
    }
}
