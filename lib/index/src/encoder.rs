//! Hash-based text encoder.
//!
//! Embeds product names into fixed-dimension normalized vectors by
//! hashing character trigrams and whole words into vector positions.
//! Deterministic, dependency-free, and good enough for short catalog
//! names; cosine over these vectors behaves like a fuzzy n-gram match.

use crate::vector::Vector;
use cartx_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Default embedding dimension.
pub const DEFAULT_EMBED_DIM: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashEncoder {
    dim: usize,
}

impl HashEncoder {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidConfig(
                "encoder dimension must be non-zero".to_string(),
            ));
        }
        Ok(Self { dim })
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Encode text into a normalized `dim`-dimensional vector.
    /// Empty text encodes to the zero vector.
    #[must_use]
    pub fn encode(&self, text: &str) -> Vector {
        let mut components = vec![0.0f32; self.dim];
        let normalized = text.to_lowercase();

        for trigram in generate_trigrams(&normalized) {
            let pos = (hash_str(&trigram) as usize) % self.dim;
            components[pos] += 1.0;
        }

        // Words contribute more than individual trigrams
        for word in normalized.split_whitespace() {
            let pos = (hash_str(word) as usize) % self.dim;
            components[pos] += 2.0;
        }

        let mut vector = Vector::new(components);
        vector.normalize();
        vector
    }
}

fn hash_str(s: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}

/// Character trigrams over the space-padded input.
fn generate_trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();

    if chars.len() < 3 {
        return HashSet::new();
    }

    chars
        .windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dim_rejected() {
        assert!(HashEncoder::new(0).is_err());
    }

    #[test]
    fn test_same_text_same_vector() {
        let encoder = HashEncoder::new(64).unwrap();
        let v1 = encoder.encode("fresh chicken breast");
        let v2 = encoder.encode("fresh chicken breast");
        assert_eq!(v1.as_slice(), v2.as_slice());
    }

    #[test]
    fn test_vectors_are_normalized() {
        let encoder = HashEncoder::new(128).unwrap();
        let v = encoder.encode("whole milk 2l");
        assert!((v.norm() - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let encoder = HashEncoder::new(64).unwrap();
        let v = encoder.encode("");
        assert_eq!(v.norm(), 0.0);
    }

    #[test]
    fn test_similar_names_score_higher() {
        let encoder = HashEncoder::new(DEFAULT_EMBED_DIM).unwrap();
        let chicken = encoder.encode("chicken breast fillets");
        let chicken_q = encoder.encode("chicken breast");
        let bananas = encoder.encode("organic bananas");

        let close = chicken_q.cosine_similarity(&chicken);
        let far = chicken_q.cosine_similarity(&bananas);
        assert!(close > far, "expected {} > {}", close, far);
    }

    #[test]
    fn test_trigram_generation() {
        let trigrams = generate_trigrams("hello");
        assert!(trigrams.contains("hel"));
        assert!(trigrams.contains("ell"));
        assert!(trigrams.contains("llo"));
    }
}
