//! The feature contract shared by the ranking and forecasting models.
//!
//! Upstream feature engineering (out of scope here) produces one fixed,
//! ordered, numeric feature vector per product. Every model in this
//! workspace consumes that fixed shape and nothing else; there is no
//! dynamic column lookup downstream of this module.

use serde::{Deserialize, Serialize};

/// Number of features every catalog row exposes.
pub const FEATURE_COUNT: usize = 11;

/// Ordered feature names. Persisted model artifacts record the list they
/// were trained with; loading fails fast when the lists disagree.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "log_price_per_100g",
    "log_package_price",
    "discount_pct",
    "value_score",
    "is_special",
    "is_budget_brand",
    "is_estimated",
    "availability_score",
    "category_code",
    "sub_category_code",
    "state_code",
];

/// A fixed-size numeric feature vector aligned with [`FEATURE_NAMES`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// All-zero vector, the contract's default for missing features.
    #[inline]
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            values: [0.0; FEATURE_COUNT],
        }
    }

    /// Look up a feature by name. Unknown names and non-finite values
    /// yield 0.0; missing data never raises at scoring time.
    #[must_use]
    pub fn get(&self, name: &str) -> f64 {
        FEATURE_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| self.values[i])
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// Set a feature by name. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: f64) {
        if let Some(i) = FEATURE_NAMES.iter().position(|&n| n == name) {
            self.values[i] = value;
        }
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Values with non-finite entries replaced by 0.0, in contract order.
    #[must_use]
    pub fn sanitized(&self) -> [f64; FEATURE_COUNT] {
        let mut out = self.values;
        for v in &mut out {
            if !v.is_finite() {
                *v = 0.0;
            }
        }
        out
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::zeroed()
    }
}
