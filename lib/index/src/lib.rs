//! # cartx Index
//!
//! Retrieval index for the cartx recommendation engine.
//!
//! Maps a free-text query to a ranked candidate set via vector
//! similarity over product names. Two modes, chosen at build time:
//!
//! - **Semantic**: dense hash-trigram embeddings, L2-normalized so the
//!   inner product is cosine similarity
//! - **Lexical**: sparse TF-IDF rows (word 1-2 grams), used as a
//!   permanent fallback when the semantic encoder cannot be initialized
//!
//! The index is built once over a catalog snapshot and is read-only
//! afterwards; searching before build/load is an initialization bug and
//! fails with [`cartx_core::Error::IndexNotReady`].
//!
//! ## Example
//!
//! ```rust
//! use cartx_core::Product;
//! use cartx_index::{RetrievalIndex, IndexConfig};
//!
//! let catalog = vec![
//!     Product::new("sku-1", "Fresh Chicken Breast", "Poultry", 5.0),
//!     Product::new("sku-2", "Whole Milk 2L", "Dairy", 3.0),
//! ];
//!
//! let mut index = RetrievalIndex::new(IndexConfig::default());
//! index.build(catalog);
//!
//! let candidates = index.search("chicken", 10).unwrap();
//! assert_eq!(candidates[0].product.sku, "sku-1");
//! ```

pub mod encoder;
pub mod index;
pub mod tfidf;
pub mod vector;

pub use encoder::{HashEncoder, DEFAULT_EMBED_DIM};
pub use index::{IndexConfig, IndexMode, RetrievalIndex};
pub use tfidf::{SparseVector, TfIdfModel};
pub use vector::Vector;
