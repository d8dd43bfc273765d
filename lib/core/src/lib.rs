//! # cartx Core
//!
//! Core data model for the cartx recommendation engine.
//!
//! This crate provides the types every other crate in the workspace
//! builds on:
//!
//! - [`Product`] - One immutable catalog row with its feature vector
//! - [`Candidate`] - A retrieval result awaiting ranking
//! - [`FeatureVector`] - The fixed, ordered feature contract
//! - [`PriceObservation`] - One dated price point for the forecaster
//! - [`soft_retain`] - The shared "filter only if non-emptying" policy
//!
//! ## Example
//!
//! ```rust
//! use cartx_core::{Product, Candidate};
//!
//! let product = Product::new("sku-42", "Cheap Chicken", "Poultry", 5.0)
//!     .with_value(0.5, 2.0);
//! let candidate = Candidate::scored(product, 0.87);
//! assert_eq!(candidate.search_score, Some(0.87));
//! ```

pub mod error;
pub mod features;
pub mod filter;
pub mod history;
pub mod product;

pub use error::{Error, Result};
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use filter::soft_retain;
pub use history::PriceObservation;
pub use product::{Candidate, Product};
