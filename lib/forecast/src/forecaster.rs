//! The price forecaster: ridge regression over per-sku history with a
//! last-known-price fallback for thin or untrained cases.

use crate::features::{build_time_features, FeatureRow, FORECAST_FEATURES};
use crate::ridge::Ridge;
use crate::scaler::StandardScaler;
use cartx_core::{Error, PriceObservation, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Direction of the predicted price move relative to the last
/// observed price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

/// How much to trust the forecast. `Low` marks fallback predictions
/// and thin histories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
}

/// One forecast payload. Prices are rounded to cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub sku: String,
    pub predicted_price: f64,
    pub last_known_price: f64,
    pub price_change: f64,
    pub trend: Trend,
    pub confidence: Confidence,
}

/// A single point of a sku's price timeline, for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: chrono::NaiveDate,
    pub price: f64,
    pub is_special: bool,
}

#[derive(Debug, Clone)]
pub struct ForecastConfig {
    /// Observations required per sku before the model is consulted.
    pub min_history: usize,
    /// Usable rows required to fit the model at all.
    pub min_train_rows: usize,
    /// Ridge regularization strength.
    pub alpha: f64,
    /// Predictions never go below this price.
    pub price_floor: f64,
    /// Absolute change that separates stable from rising or falling.
    pub trend_band: f64,
    /// Observation count at which confidence moves from low to medium.
    pub medium_confidence_at: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_history: 3,
            min_train_rows: 100,
            alpha: 1.0,
            price_floor: 0.10,
            trend_band: 0.20,
            medium_confidence_at: 5,
        }
    }
}

/// Model state: a fitted regressor with its scaler, or nothing.
enum ForecastModel {
    Untrained,
    Trained { ridge: Ridge, scaler: StandardScaler },
}

pub struct PriceForecaster {
    model: ForecastModel,
    config: ForecastConfig,
}

#[derive(Serialize, Deserialize)]
struct ForecastArtifact {
    feature_names: Vec<String>,
    ridge: Ridge,
    scaler: StandardScaler,
}

impl Default for PriceForecaster {
    fn default() -> Self {
        Self::new(ForecastConfig::default())
    }
}

impl PriceForecaster {
    #[must_use]
    pub fn new(config: ForecastConfig) -> Self {
        Self {
            model: ForecastModel::Untrained,
            config,
        }
    }

    #[must_use]
    pub fn is_trained(&self) -> bool {
        matches!(self.model, ForecastModel::Trained { .. })
    }

    /// Fit the regressor on featurized history. First-of-sku rows have
    /// no lag features and are excluded. Too little data logs a warning
    /// and keeps the prior model state.
    pub fn train(&mut self, history: &[PriceObservation]) {
        let rows: Vec<FeatureRow> = build_time_features(history)
            .into_iter()
            .filter(|r| r.has_lag)
            .collect();
        info!("Forecast training rows with lag features: {}", rows.len());

        if rows.len() < self.config.min_train_rows {
            warn!(
                "Too few rows ({}) to train forecaster; keeping previous model state",
                rows.len()
            );
            return;
        }

        let x: Vec<Vec<f64>> = rows.iter().map(|r| r.values.clone()).collect();
        let y: Vec<f64> = rows.iter().map(|r| r.target).collect();

        let (scaler, scaled) = StandardScaler::fit_transform(&x);
        let ridge = Ridge::fit(&scaled, &y, self.config.alpha);

        let mae = scaled
            .iter()
            .zip(y.iter())
            .map(|(row, &target)| (ridge.predict(row) - target).abs())
            .sum::<f64>()
            / y.len() as f64;
        info!("Forecaster trained on {} rows, in-sample MAE {:.3}", y.len(), mae);

        self.model = ForecastModel::Trained { ridge, scaler };
    }

    /// Predict the next price for `sku`. An unknown sku is an error;
    /// thin history or an untrained model degrades to the last known
    /// price with low confidence.
    ///
    /// Inference reuses the training featurization: the model scores
    /// the sku's most recent featurized observation.
    pub fn predict_next(&self, history: &[PriceObservation], sku: &str) -> Result<Forecast> {
        let sku_rows: Vec<PriceObservation> = history
            .iter()
            .filter(|o| o.sku == sku && o.price.is_finite())
            .cloned()
            .collect();
        let featurized = build_time_features(&sku_rows);
        let last = featurized
            .last()
            .ok_or_else(|| Error::SkuNotFound(sku.to_string()))?;
        let last_known = last.target;

        let usable_model = match &self.model {
            ForecastModel::Trained { ridge, scaler }
                if sku_rows.len() >= self.config.min_history =>
            {
                Some((ridge, scaler))
            }
            _ => None,
        };

        let Some((ridge, scaler)) = usable_model else {
            return Ok(Forecast {
                sku: sku.to_string(),
                predicted_price: round2(last_known),
                last_known_price: round2(last_known),
                price_change: 0.0,
                trend: Trend::Stable,
                confidence: Confidence::Low,
            });
        };

        let raw = ridge.predict(&scaler.transform_row(&last.values));
        let predicted = raw.max(self.config.price_floor);
        let change = predicted - last_known;

        let trend = if change > self.config.trend_band {
            Trend::Rising
        } else if change < -self.config.trend_band {
            Trend::Falling
        } else {
            Trend::Stable
        };
        let confidence = if sku_rows.len() >= self.config.medium_confidence_at {
            Confidence::Medium
        } else {
            Confidence::Low
        };

        Ok(Forecast {
            sku: sku.to_string(),
            predicted_price: round2(predicted),
            last_known_price: round2(last_known),
            price_change: round2(change),
            trend,
            confidence,
        })
    }

    /// The time-ordered price timeline for a sku, for display alongside
    /// a forecast.
    pub fn get_history(history: &[PriceObservation], sku: &str) -> Result<Vec<HistoryPoint>> {
        let mut points: Vec<HistoryPoint> = history
            .iter()
            .filter(|o| o.sku == sku && o.price.is_finite())
            .map(|o| HistoryPoint {
                date: o.date,
                price: o.price,
                is_special: o.is_special,
            })
            .collect();
        if points.is_empty() {
            return Err(Error::SkuNotFound(sku.to_string()));
        }
        points.sort_by_key(|p| p.date);
        Ok(points)
    }

    // ── Persistence ──────────────────────────────────────────────────

    pub fn save(&self, path: &Path) -> Result<()> {
        let (ridge, scaler) = match &self.model {
            ForecastModel::Trained { ridge, scaler } => (ridge, scaler),
            ForecastModel::Untrained => {
                return Err(Error::Storage(
                    "cannot persist an untrained forecaster".to_string(),
                ))
            }
        };
        let artifact = ForecastArtifact {
            feature_names: FORECAST_FEATURES.iter().map(|s| s.to_string()).collect(),
            ridge: ridge.clone(),
            scaler: scaler.clone(),
        };
        let data =
            bincode::serialize(&artifact).map_err(|e| Error::Serialization(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, &data)?;
        std::fs::rename(&tmp, path)?;
        info!("Forecast model saved to {}", path.display());
        Ok(())
    }

    /// Load a persisted forecaster, failing fast when the artifact's
    /// feature list disagrees with the current feature contract.
    pub fn load(path: &Path, config: ForecastConfig) -> Result<Self> {
        let data = std::fs::read(path)?;
        let artifact: ForecastArtifact =
            bincode::deserialize(&data).map_err(|e| Error::Serialization(e.to_string()))?;

        let expected: Vec<String> = FORECAST_FEATURES.iter().map(|s| s.to_string()).collect();
        if artifact.feature_names != expected {
            return Err(Error::SchemaMismatch {
                expected,
                actual: artifact.feature_names,
            });
        }

        info!("Forecast model loaded from {}", path.display());
        Ok(Self {
            model: ForecastModel::Trained {
                ridge: artifact.ridge,
                scaler: artifact.scaler,
            },
            config,
        })
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
