//! Time-based feature construction for the price forecaster.

use cartx_core::PriceObservation;
use chrono::{Datelike, NaiveDate};

/// Candidate feature columns, in the order rows carry them.
pub const FORECAST_FEATURES: [&str; 11] = [
    "days_since_epoch",
    "day_of_year",
    "week_of_year",
    "month",
    "prev_price",
    "price_change",
    "rolling_mean",
    "is_special",
    "is_estimated",
    "category_code",
    "sub_category_code",
];

/// Fixed reference date for the `days_since_epoch` feature.
pub fn price_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid epoch date")
}

/// One featurized observation. `has_lag` is false for the first
/// observation of a sku, whose lag features default to 0 and which is
/// excluded from training.
#[derive(Debug, Clone)]
pub struct FeatureRow {
    pub sku: String,
    pub values: Vec<f64>,
    pub target: f64,
    pub has_lag: bool,
}

/// Build per-sku, time-ordered feature rows from raw observations.
/// Rows with non-finite prices are dropped.
pub fn build_time_features(history: &[PriceObservation]) -> Vec<FeatureRow> {
    let mut observations: Vec<&PriceObservation> =
        history.iter().filter(|o| o.price.is_finite()).collect();
    observations.sort_by(|a, b| a.sku.cmp(&b.sku).then(a.date.cmp(&b.date)));

    let epoch = price_epoch();
    let mut rows = Vec::with_capacity(observations.len());
    let mut run_start = 0usize;

    for (i, obs) in observations.iter().enumerate() {
        if i > 0 && observations[i - 1].sku != obs.sku {
            run_start = i;
        }
        let prev = (i > run_start).then(|| observations[i - 1].price);

        let window_start = run_start.max(i.saturating_sub(2));
        let window = &observations[window_start..=i];
        let rolling_mean =
            window.iter().map(|o| o.price).sum::<f64>() / window.len() as f64;

        let prev_price = prev.unwrap_or(0.0);
        let price_change = prev.map_or(0.0, |p| obs.price - p);

        let values = vec![
            (obs.date - epoch).num_days() as f64,
            f64::from(obs.date.ordinal()),
            f64::from(obs.date.iso_week().week()),
            f64::from(obs.date.month()),
            prev_price,
            price_change,
            rolling_mean,
            f64::from(u8::from(obs.is_special)),
            f64::from(u8::from(obs.is_estimated)),
            obs.category_code,
            obs.sub_category_code,
        ];

        rows.push(FeatureRow {
            sku: obs.sku.clone(),
            values,
            target: obs.price,
            has_lag: prev.is_some(),
        });
    }
    rows
}
