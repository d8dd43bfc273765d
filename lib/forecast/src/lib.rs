//! # cartx Forecast
//!
//! Price forecasting for the cartx recommendation engine.
//!
//! A ridge regression is fit over time features built from per-sku
//! price history (calendar position, lagged price, short rolling mean).
//! Skus with fewer than three observations, and any prediction made
//! before a model is trained, fall back to the last known price at low
//! confidence. Forecasts classify the predicted move as rising, falling
//! or stable around a configurable band.
//!
//! ## Example
//!
//! ```rust
//! use cartx_core::PriceObservation;
//! use cartx_forecast::PriceForecaster;
//! use chrono::NaiveDate;
//!
//! let day = |d: u32| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let history = vec![
//!     PriceObservation::new("milk-1l", day(1), 2.10),
//!     PriceObservation::new("milk-1l", day(8), 2.20),
//!     PriceObservation::new("milk-1l", day(15), 2.15),
//! ];
//!
//! let forecaster = PriceForecaster::default(); // untrained: fallback
//! let forecast = forecaster.predict_next(&history, "milk-1l").unwrap();
//! assert_eq!(forecast.predicted_price, 2.15);
//! ```

pub mod features;
pub mod forecaster;
pub mod ridge;
pub mod scaler;

pub use features::{build_time_features, FeatureRow, FORECAST_FEATURES};
pub use forecaster::{
    Confidence, Forecast, ForecastConfig, HistoryPoint, PriceForecaster, Trend,
};
pub use ridge::Ridge;
pub use scaler::StandardScaler;
