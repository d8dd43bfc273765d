//! # cartx Engine
//!
//! The recommendation pipeline for cartx: free-text query in,
//! budget-aware ranked product rows out.
//!
//! [`RecommendationEngine`] wires retrieval (cartx-index) to ranking
//! (cartx-rank) with soft location filters in between; soft means a
//! filter that would empty the candidate set is skipped instead.
//! [`BasketPlanner`] runs that pipeline once per shopping-list item
//! under an equal split of a shared budget, retrying at the full budget
//! when an item's share is too small for any match.
//!
//! ## Example
//!
//! ```rust
//! use cartx_core::Product;
//! use cartx_engine::RecommendationEngine;
//! use cartx_index::{IndexConfig, RetrievalIndex};
//! use cartx_rank::ValueRanker;
//!
//! let mut index = RetrievalIndex::new(IndexConfig {
//!     prefer_lexical: true,
//!     ..IndexConfig::default()
//! });
//! index.build(vec![
//!     Product::new("c1", "Fresh Chicken Breast", "Poultry", 8.0).with_value(0.8, 1.5),
//!     Product::new("m1", "Whole Milk 2L", "Dairy", 3.0).with_value(0.15, 1.0),
//! ]);
//!
//! let engine = RecommendationEngine::new(index, ValueRanker::default());
//! let recs = engine.recommend("chicken", 10.0, None, None, 5).unwrap();
//! assert_eq!(recs[0].sku, "c1");
//! ```

pub mod basket;
pub mod engine;

pub use basket::{Basket, BasketLine, BasketPlanner};
pub use engine::{EngineConfig, Recommendation, RecommendationEngine};
