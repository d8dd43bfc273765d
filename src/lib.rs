//! # cartX
//!
//! A budget-aware product recommendation engine.
//!
//! cartX answers free-text product queries under a hard budget cutoff,
//! plans whole shopping baskets against a shared budget, and forecasts
//! the next price of any catalog sku. Every learned component carries a
//! deterministic fallback, so the pipeline degrades instead of failing:
//! retrieval falls back from dense embeddings to TF-IDF, the ranker to
//! a value-plus-discount rule, the forecaster to the last known price.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! cargo install cartx
//! cartx build --catalog catalog.json
//! cartx recommend "chicken breast" --budget 15
//! cartx basket "chicken,milk,bread" --budget 40
//! cartx forecast milk-1l --history history.json
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use cartx::prelude::*;
//!
//! let catalog = vec![
//!     Product::new("c1", "Fresh Chicken Breast", "Poultry", 8.0).with_value(0.8, 1.5),
//!     Product::new("m1", "Whole Milk 2L", "Dairy", 3.0).with_value(0.15, 1.0),
//! ];
//!
//! let mut index = RetrievalIndex::new(IndexConfig::default());
//! index.build(catalog);
//!
//! let engine = RecommendationEngine::new(index, ValueRanker::default());
//! let recs = engine.recommend("chicken", 10.0, None, None, 5).unwrap();
//! assert_eq!(recs[0].sku, "c1");
//! ```
//!
//! ## Crate Structure
//!
//! cartX is composed of several crates:
//!
//! - `cartx-core` - Shared types (Product, Candidate, feature contract, errors)
//! - `cartx-index` - Retrieval index (hash embeddings with TF-IDF fallback)
//! - `cartx-rank` - Value ranker (pairwise linear model with rule fallback)
//! - `cartx-forecast` - Price forecaster (ridge regression with last-price fallback)
//! - `cartx-engine` - Recommendation pipeline and basket planner

// Re-export core types
pub use cartx_core::{
    Candidate, Error, FeatureVector, PriceObservation, Product, Result, FEATURE_COUNT,
    FEATURE_NAMES,
};

// Re-export the retrieval index
pub use cartx_index::{IndexConfig, IndexMode, RetrievalIndex};

// Re-export the ranker
pub use cartx_rank::{RankerConfig, ValueRanker};

// Re-export the forecaster
pub use cartx_forecast::{Confidence, Forecast, ForecastConfig, PriceForecaster, Trend};

// Re-export the engine
pub use cartx_engine::{
    Basket, BasketLine, BasketPlanner, EngineConfig, Recommendation, RecommendationEngine,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Basket, BasketLine, BasketPlanner, Candidate, Confidence, EngineConfig, Error,
        FeatureVector, Forecast, ForecastConfig, IndexConfig, IndexMode, PriceForecaster,
        PriceObservation, Product, RankerConfig, Recommendation, RecommendationEngine, Result,
        RetrievalIndex, Trend, ValueRanker,
    };
}
