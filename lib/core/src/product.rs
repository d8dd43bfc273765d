use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};

/// One catalog row, immutable per build.
///
/// The retrieval catalog holds one row per `sku` (deduplicated upstream);
/// historical price observations for the same sku live in
/// [`crate::history::PriceObservation`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sub_category: String,
    pub package_price: f64,
    #[serde(default)]
    pub price_per_100g: Option<f64>,
    #[serde(default)]
    pub discount_pct: f64,
    #[serde(default)]
    pub value_score: Option<f64>,
    #[serde(default)]
    pub availability_score: f64,
    #[serde(default)]
    pub is_special: bool,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub product_url: String,
    #[serde(default)]
    pub features: FeatureVector,
}

impl Product {
    /// Minimal constructor; remaining fields start empty/zero and can be
    /// filled with the `with_*` builders.
    #[must_use]
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        sub_category: impl Into<String>,
        package_price: f64,
    ) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            brand: String::new(),
            category: String::new(),
            sub_category: sub_category.into(),
            package_price,
            price_per_100g: None,
            discount_pct: 0.0,
            value_score: None,
            availability_score: 0.0,
            is_special: false,
            city: String::new(),
            state: String::new(),
            product_url: String::new(),
            features: FeatureVector::zeroed(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, price_per_100g: f64, value_score: f64) -> Self {
        self.price_per_100g = Some(price_per_100g);
        self.value_score = Some(value_score);
        self.features.set("log_price_per_100g", (1.0 + price_per_100g).ln());
        self.features.set("value_score", value_score);
        self
    }

    #[must_use]
    pub fn with_discount(mut self, discount_pct: f64) -> Self {
        self.discount_pct = discount_pct;
        self.features.set("discount_pct", discount_pct);
        self
    }

    #[must_use]
    pub fn with_availability(mut self, availability_score: f64) -> Self {
        self.availability_score = availability_score;
        self.features.set("availability_score", availability_score);
        self
    }

    #[must_use]
    pub fn with_location(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.city = city.into();
        self.state = state.into();
        self
    }

    #[must_use]
    pub fn with_features(mut self, features: FeatureVector) -> Self {
        self.features = features;
        self
    }
}

/// A catalog row returned by retrieval, not yet budget-filtered or ranked.
///
/// `search_score` is `None` when a set is ranked without going through
/// retrieval first; the ranker's relevance guard only applies to scored
/// candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub product: Product,
    pub search_score: Option<f64>,
}

impl Candidate {
    #[inline]
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            product,
            search_score: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn scored(product: Product, search_score: f64) -> Self {
        Self {
            product,
            search_score: Some(search_score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_fills_feature_contract() {
        let p = Product::new("sku-1", "Cheap Chicken", "Poultry", 5.0)
            .with_value(0.5, 2.0)
            .with_discount(0.1)
            .with_availability(0.9);
        assert_eq!(p.features.get("value_score"), 2.0);
        assert_eq!(p.features.get("discount_pct"), 0.1);
        assert_eq!(p.features.get("availability_score"), 0.9);
        assert_eq!(p.availability_score, 0.9);
        assert!(p.features.get("log_price_per_100g") > 0.0);
    }

    #[test]
    fn test_candidate_score_annotation() {
        let p = Product::new("sku-1", "Fish", "Seafood", 8.0);
        assert!(Candidate::new(p.clone()).search_score.is_none());
        assert_eq!(Candidate::scored(p, 0.9).search_score, Some(0.9));
    }
}
