//! The retrieval index: free-text query -> ranked candidate set.
//!
//! Built once over a catalog snapshot and read-only afterwards. The
//! index keeps one embedding (or sparse row) per catalog row, aligned
//! by position; position is the only linkage between the two tables.

use crate::encoder::HashEncoder;
use crate::tfidf::{SparseVector, TfIdfModel};
use crate::vector::Vector;
use cartx_core::{Candidate, Error, Product, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

const CATALOG_FILE: &str = "catalog.bin";
const SEMANTIC_FILE: &str = "semantic.index";
const LEXICAL_FILE: &str = "lexical.index";

/// Index configuration.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Dimension of the dense embedding space.
    pub embed_dim: usize,
    /// Skip the semantic encoder entirely and build lexical-only.
    pub prefer_lexical: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            embed_dim: crate::encoder::DEFAULT_EMBED_DIM,
            prefer_lexical: false,
        }
    }
}

/// Which mode a built index operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    Empty,
    Semantic,
    Lexical,
}

enum IndexState {
    Empty,
    Semantic {
        encoder: HashEncoder,
        vectors: Vec<Vector>,
    },
    Lexical {
        model: TfIdfModel,
        matrix: Vec<SparseVector>,
    },
}

pub struct RetrievalIndex {
    state: IndexState,
    catalog: Vec<Product>,
    config: IndexConfig,
}

impl RetrievalIndex {
    #[must_use]
    pub fn new(config: IndexConfig) -> Self {
        Self {
            state: IndexState::Empty,
            catalog: Vec::new(),
            config,
        }
    }

    #[must_use]
    pub fn mode(&self) -> IndexMode {
        match self.state {
            IndexState::Empty => IndexMode::Empty,
            IndexState::Semantic { .. } => IndexMode::Semantic,
            IndexState::Lexical { .. } => IndexMode::Lexical,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Build the index over a catalog snapshot.
    ///
    /// Tries the semantic encoder first; if it cannot be initialized the
    /// build falls back to the lexical TF-IDF model permanently, with no
    /// runtime re-attempt.
    pub fn build(&mut self, catalog: Vec<Product>) {
        if self.config.prefer_lexical {
            self.build_lexical(catalog);
            return;
        }

        match HashEncoder::new(self.config.embed_dim) {
            Ok(encoder) => {
                info!("Encoding {} product names (dim={})", catalog.len(), encoder.dim());
                let vectors = catalog
                    .iter()
                    .map(|p| encoder.encode(&p.name))
                    .collect::<Vec<_>>();
                self.state = IndexState::Semantic { encoder, vectors };
                self.catalog = catalog;
                info!("Semantic index built with {} vectors", self.catalog.len());
            }
            Err(e) => {
                warn!("Semantic encoder unavailable ({}). Using TF-IDF fallback.", e);
                self.build_lexical(catalog);
            }
        }
    }

    fn build_lexical(&mut self, catalog: Vec<Product>) {
        let names: Vec<&str> = catalog.iter().map(|p| p.name.as_str()).collect();
        let (model, matrix) = TfIdfModel::fit_transform(&names);
        info!(
            "TF-IDF index built: {} rows, vocab size {}",
            matrix.len(),
            model.vocab_size()
        );
        self.state = IndexState::Lexical { model, matrix };
        self.catalog = catalog;
    }

    /// Return the `top_k` catalog rows most similar to `query`, each
    /// annotated with a cosine `search_score`, sorted descending.
    /// Ties keep the underlying row order; duplicates are not removed.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<Candidate>> {
        let scores: Vec<f32> = match &self.state {
            IndexState::Empty => return Err(Error::IndexNotReady),
            IndexState::Semantic { encoder, vectors } => {
                // Rows are stored normalized, so inner product = cosine.
                let q = encoder.encode(query);
                vectors.iter().map(|v| q.dot(v)).collect()
            }
            IndexState::Lexical { model, matrix } => {
                let q = model.transform(query);
                matrix.iter().map(|row| q.dot(row)).collect()
            }
        };

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order.truncate(top_k);

        Ok(order
            .into_iter()
            .map(|i| Candidate::scored(self.catalog[i].clone(), f64::from(scores[i])))
            .collect())
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Persist the index to a directory: the aligned catalog snapshot
    /// plus the mode-specific artifact.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        write_artifact(&dir.join(CATALOG_FILE), &self.catalog)?;

        match &self.state {
            IndexState::Empty => return Err(Error::IndexNotReady),
            IndexState::Semantic { encoder, vectors } => {
                write_artifact(&dir.join(SEMANTIC_FILE), &(encoder, vectors))?;
            }
            IndexState::Lexical { model, matrix } => {
                write_artifact(&dir.join(LEXICAL_FILE), &(model, matrix))?;
            }
        }
        info!("Search index saved to {}", dir.display());
        Ok(())
    }

    /// Load a persisted index. Tries the semantic artifact first, falls
    /// back to the lexical one, and as a last resort rebuilds the
    /// lexical model from the raw catalog snapshot.
    pub fn load(dir: &Path, config: IndexConfig) -> Result<Self> {
        let catalog_path = dir.join(CATALOG_FILE);
        if !catalog_path.exists() {
            return Err(Error::Storage(format!(
                "Product index not found at {}",
                catalog_path.display()
            )));
        }
        let catalog: Vec<Product> = read_artifact(&catalog_path)?;

        let semantic_path = dir.join(SEMANTIC_FILE);
        if semantic_path.exists() {
            let (encoder, vectors): (HashEncoder, Vec<Vector>) = read_artifact(&semantic_path)?;
            if vectors.len() != catalog.len() {
                return Err(Error::Storage(
                    "semantic index and catalog snapshot are misaligned".to_string(),
                ));
            }
            info!("Semantic search index loaded from {}", dir.display());
            return Ok(Self {
                state: IndexState::Semantic { encoder, vectors },
                catalog,
                config,
            });
        }

        let lexical_path = dir.join(LEXICAL_FILE);
        if lexical_path.exists() {
            let (model, matrix): (TfIdfModel, Vec<SparseVector>) = read_artifact(&lexical_path)?;
            if matrix.len() != catalog.len() {
                return Err(Error::Storage(
                    "lexical index and catalog snapshot are misaligned".to_string(),
                ));
            }
            info!("TF-IDF search index loaded from {}", dir.display());
            return Ok(Self {
                state: IndexState::Lexical { model, matrix },
                catalog,
                config,
            });
        }

        info!("No index artifact found; rebuilding TF-IDF index from catalog snapshot");
        let mut index = Self::new(IndexConfig {
            prefer_lexical: true,
            ..config
        });
        index.build(catalog);
        Ok(index)
    }
}

fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = bincode::serialize(value).map_err(|e| Error::Serialization(e.to_string()))?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, &data)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn read_artifact<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = std::fs::read(path)?;
    bincode::deserialize(&data).map_err(|e| Error::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Vec<Product> {
        vec![
            Product::new("sku-1", "Fresh Chicken Breast", "Poultry", 5.0),
            Product::new("sku-2", "Whole Milk 2L", "Dairy", 3.0),
            Product::new("sku-3", "White Bread Loaf", "Bakery", 2.0),
            Product::new("sku-4", "Chicken Thighs", "Poultry", 4.0),
        ]
    }

    #[test]
    fn test_search_before_build_fails() {
        let index = RetrievalIndex::new(IndexConfig::default());
        assert!(matches!(
            index.search("chicken", 10),
            Err(Error::IndexNotReady)
        ));
    }

    #[test]
    fn test_semantic_search_ranks_matching_products_first() {
        let mut index = RetrievalIndex::new(IndexConfig::default());
        index.build(sample_catalog());
        assert_eq!(index.mode(), IndexMode::Semantic);

        let results = index.search("chicken breast", 4).unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].product.sku, "sku-1");

        // Scores sorted descending
        let scores: Vec<f64> = results.iter().filter_map(|c| c.search_score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_lexical_fallback_mode() {
        let mut index = RetrievalIndex::new(IndexConfig {
            prefer_lexical: true,
            ..IndexConfig::default()
        });
        index.build(sample_catalog());
        assert_eq!(index.mode(), IndexMode::Lexical);

        let results = index.search("whole milk", 2).unwrap();
        assert_eq!(results[0].product.sku, "sku-2");
        assert!(results[0].search_score.unwrap() > 0.9);
    }

    #[test]
    fn test_search_respects_top_k() {
        let mut index = RetrievalIndex::new(IndexConfig::default());
        index.build(sample_catalog());
        assert_eq!(index.search("chicken", 2).unwrap().len(), 2);
        // top_k larger than the catalog returns everything
        assert_eq!(index.search("chicken", 100).unwrap().len(), 4);
    }

    #[test]
    fn test_lexical_roundtrip_reproduces_results() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = RetrievalIndex::new(IndexConfig {
            prefer_lexical: true,
            ..IndexConfig::default()
        });
        index.build(sample_catalog());
        index.save(dir.path()).unwrap();

        let reloaded = RetrievalIndex::load(dir.path(), IndexConfig::default()).unwrap();
        assert_eq!(reloaded.mode(), IndexMode::Lexical);

        let before = index.search("chicken breast", 4).unwrap();
        let after = reloaded.search("chicken breast", 4).unwrap();
        assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(after.iter()) {
            assert_eq!(a.product.sku, b.product.sku);
            let (sa, sb) = (a.search_score.unwrap(), b.search_score.unwrap());
            assert!((sa - sb).abs() < 1e-9);
        }
    }

    #[test]
    fn test_load_rebuilds_lexical_when_artifact_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = RetrievalIndex::new(IndexConfig::default());
        index.build(sample_catalog());
        index.save(dir.path()).unwrap();

        // Drop the semantic artifact: load should rebuild lexical from
        // the catalog snapshot rather than fail.
        std::fs::remove_file(dir.path().join(SEMANTIC_FILE)).unwrap();
        let reloaded = RetrievalIndex::load(dir.path(), IndexConfig::default()).unwrap();
        assert_eq!(reloaded.mode(), IndexMode::Lexical);
        assert_eq!(reloaded.len(), 4);
        assert!(!reloaded.search("milk", 2).unwrap().is_empty());
    }

    #[test]
    fn test_load_without_catalog_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RetrievalIndex::load(dir.path(), IndexConfig::default()),
            Err(Error::Storage(_))
        ));
    }

    #[test]
    fn test_save_empty_index_fails() {
        let dir = tempfile::tempdir().unwrap();
        let index = RetrievalIndex::new(IndexConfig::default());
        assert!(matches!(index.save(dir.path()), Err(Error::IndexNotReady)));
    }
}
