use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One historical price observation for a sku.
///
/// Unlike the retrieval catalog, price history keeps every observation:
/// multiple rows per sku with different dates. The categorical codes and
/// flags come from the upstream feature-engineering stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceObservation {
    pub sku: String,
    pub date: NaiveDate,
    pub price: f64,
    #[serde(default)]
    pub is_special: bool,
    #[serde(default)]
    pub is_estimated: bool,
    #[serde(default)]
    pub category_code: f64,
    #[serde(default)]
    pub sub_category_code: f64,
}

impl PriceObservation {
    #[must_use]
    pub fn new(sku: impl Into<String>, date: NaiveDate, price: f64) -> Self {
        Self {
            sku: sku.into(),
            date,
            price,
            is_special: false,
            is_estimated: false,
            category_code: 0.0,
            sub_category_code: 0.0,
        }
    }

    #[must_use]
    pub fn special(mut self) -> Self {
        self.is_special = true;
        self
    }
}
