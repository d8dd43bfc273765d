//! The basket planner: one recommendation pass per shopping-list item
//! under an equal split of the total budget.

use crate::engine::{round2, Recommendation, RecommendationEngine};
use cartx_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Alternatives carried per basket line beyond the best match.
const ALTERNATIVES_PER_ITEM: usize = 2;

/// One shopping-list item resolved against the catalog. `best_match`
/// is `None` when nothing matched the query at any price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasketLine {
    pub query: String,
    pub best_match: Option<Recommendation>,
    pub alternatives: Vec<Recommendation>,
    pub estimated_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Basket {
    pub total_budget: f64,
    pub estimated_total: f64,
    pub within_budget: bool,
    pub lines: Vec<BasketLine>,
}

pub struct BasketPlanner<'a> {
    engine: &'a RecommendationEngine,
}

impl<'a> BasketPlanner<'a> {
    #[must_use]
    pub fn new(engine: &'a RecommendationEngine) -> Self {
        Self { engine }
    }

    /// Plan a basket for a list of free-text items under a shared
    /// budget, split equally across items.
    ///
    /// When an item finds nothing under its share, the search retries
    /// at the full budget so the line carries a match even if it blows
    /// the split. `within_budget` reports whether the summed best
    /// matches still fit.
    pub fn plan(
        &self,
        items: &[String],
        total_budget: f64,
        city: Option<&str>,
        state: Option<&str>,
    ) -> Result<Basket> {
        if items.is_empty() {
            return Err(Error::EmptyItemList);
        }
        if total_budget <= 0.0 {
            return Err(Error::InvalidBudget(total_budget));
        }

        let per_item = total_budget / items.len() as f64;
        info!(
            "Planning basket: {} items, {:.2} each from {:.2} total",
            items.len(),
            per_item,
            total_budget
        );

        let mut lines = Vec::with_capacity(items.len());
        let mut estimated_total = 0.0;

        for item in items {
            let mut recs =
                self.engine
                    .recommend(item, per_item, city, state, 1 + ALTERNATIVES_PER_ITEM)?;
            if recs.is_empty() {
                warn!(
                    "No match for {:?} under the per-item share; retrying at full budget",
                    item
                );
                recs = self.engine.recommend(
                    item,
                    total_budget,
                    city,
                    state,
                    1 + ALTERNATIVES_PER_ITEM,
                )?;
            }

            let mut iter = recs.into_iter();
            let best_match = iter.next();
            let alternatives: Vec<Recommendation> = iter.collect();
            let estimated_cost = best_match.as_ref().map_or(0.0, |r| r.package_price);
            estimated_total += estimated_cost;

            lines.push(BasketLine {
                query: item.clone(),
                best_match,
                alternatives,
                estimated_cost: round2(estimated_cost),
            });
        }

        let estimated_total = round2(estimated_total);
        Ok(Basket {
            total_budget,
            estimated_total,
            within_budget: estimated_total <= total_budget,
            lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartx_core::Product;
    use cartx_index::{IndexConfig, RetrievalIndex};
    use cartx_rank::ValueRanker;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("c1", "Fresh Chicken Breast", "Poultry", 8.0).with_value(0.8, 1.5),
            Product::new("c2", "Chicken Thighs", "Poultry", 6.0).with_value(0.6, 2.0),
            Product::new("m1", "Whole Milk 2L", "Dairy", 3.0).with_value(0.15, 1.0),
            Product::new("b1", "Artisan Bread Loaf", "Bakery", 35.0).with_value(3.5, 0.2),
        ]
    }

    fn engine() -> RecommendationEngine {
        let mut index = RetrievalIndex::new(IndexConfig {
            prefer_lexical: true,
            ..IndexConfig::default()
        });
        index.build(catalog());
        RecommendationEngine::new(index, ValueRanker::default())
    }

    #[test]
    fn test_plan_rejects_empty_list() {
        let e = engine();
        let planner = BasketPlanner::new(&e);
        assert!(matches!(
            planner.plan(&[], 40.0, None, None),
            Err(Error::EmptyItemList)
        ));
    }

    #[test]
    fn test_plan_rejects_non_positive_budget() {
        let e = engine();
        let planner = BasketPlanner::new(&e);
        let items = vec!["milk".to_string()];
        assert!(matches!(
            planner.plan(&items, 0.0, None, None),
            Err(Error::InvalidBudget(_))
        ));
    }

    #[test]
    fn test_plan_one_line_per_item() {
        let e = engine();
        let planner = BasketPlanner::new(&e);
        let items = vec!["chicken".to_string(), "milk".to_string()];
        let basket = planner.plan(&items, 40.0, None, None).unwrap();
        assert_eq!(basket.lines.len(), 2);
        assert_eq!(basket.lines[0].query, "chicken");
        assert!(basket.lines[0].best_match.is_some());
        assert!(basket.within_budget);
    }

    #[test]
    fn test_estimated_total_sums_best_matches() {
        let e = engine();
        let planner = BasketPlanner::new(&e);
        let items = vec!["chicken".to_string(), "milk".to_string()];
        let basket = planner.plan(&items, 40.0, None, None).unwrap();
        let summed: f64 = basket.lines.iter().map(|l| l.estimated_cost).sum();
        assert!((basket.estimated_total - summed).abs() < 1e-9);
    }

    #[test]
    fn test_expensive_item_retries_at_full_budget() {
        let e = engine();
        let planner = BasketPlanner::new(&e);
        // Per-item share is 40/3 ~ 13.33; bread costs 35, so the line
        // only resolves through the full-budget retry.
        let items = vec![
            "chicken".to_string(),
            "milk".to_string(),
            "bread".to_string(),
        ];
        let basket = planner.plan(&items, 40.0, None, None).unwrap();
        let bread = &basket.lines[2];
        assert_eq!(bread.query, "bread");
        assert_eq!(
            bread.best_match.as_ref().map(|r| r.sku.as_str()),
            Some("b1")
        );
        assert_eq!(bread.estimated_cost, 35.0);
        assert!(!basket.within_budget);
    }

    #[test]
    fn test_unmatchable_item_gets_empty_line() {
        let e = engine();
        let planner = BasketPlanner::new(&e);
        let items = vec!["zyzzyva".to_string()];
        let basket = planner.plan(&items, 40.0, None, None).unwrap();
        assert!(basket.lines[0].best_match.is_none());
        assert_eq!(basket.lines[0].estimated_cost, 0.0);
        assert!(basket.within_budget);
    }
}
