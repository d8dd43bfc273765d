//! # cartx Rank
//!
//! The value ranker for the cartx recommendation engine.
//!
//! Reorders retrieval candidates under a hard budget cutoff using a
//! fused score: a learned linear ranking model (trained on graded
//! relevance labels derived from value-score rank within sub-category
//! groups) plus a weighted retrieval score. When no trained model is
//! available the ranker degrades to a deterministic rule,
//! `value_score + discount_pct`, instead of failing.
//!
//! ## Example
//!
//! ```rust
//! use cartx_core::{Candidate, Product};
//! use cartx_rank::ValueRanker;
//!
//! let candidates = vec![
//!     Candidate::new(Product::new("a", "Cheap Chicken", "Poultry", 5.0).with_value(0.5, 2.0)),
//!     Candidate::new(Product::new("b", "Pricey Chicken", "Poultry", 20.0).with_value(2.0, 0.5)),
//! ];
//!
//! let ranker = ValueRanker::default(); // untrained: rule-based fallback
//! let ranked = ranker.rank(candidates, 10.0, 5);
//! assert_eq!(ranked.len(), 1);
//! assert_eq!(ranked[0].product.sku, "a");
//! ```

pub mod labels;
pub mod model;
pub mod ranker;

pub use labels::{build_groups_and_labels, LabeledGroup, MAX_LABEL};
pub use model::{LinearRankModel, TrainOptions};
pub use ranker::{RankerConfig, ValueRanker};
