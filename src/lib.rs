//! Hybrid time-series forecasting for hourly weather data.
//!
//! Combines two complementary models:
//!
//! - a seasonal ARIMA capturing trend and the daily cycle, fitted by
//!   conditional least squares with automatic order selection, and
//! - a recurrent residual learner trained on the linear model's in-sample
//!   errors (optionally joined with auxiliary features such as dewpoint and
//!   pressure), correcting the structure the linear model misses.
//!
//! The final forecast is the pointwise sum of both components, and every
//! forecast point exposes its decomposition.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use hybrid_forecast::prelude::*;
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let (series, features) = synthetic_weather(start, 400, 42)?;
//!
//! let mut config = HybridConfig::new(24);
//! config.learner.epochs = 3;
//! config.learner.hidden_size = 8;
//! config.order = OrderChoice::Fixed(ModelOrder::default_for_period(24));
//!
//! let mut forecaster = HybridOrchestrator::new(config)?;
//! forecaster.train(&series, Some(&features))?;
//!
//! let forecast = forecaster.predict(24, None)?;
//! assert_eq!(forecast.horizon(), 24);
//! for point in forecast.points() {
//!     assert_eq!(point.combined(), point.linear + point.residual);
//! }
//! # Ok::<(), hybrid_forecast::ForecastError>(())
//! ```

pub mod core;
pub mod error;
pub mod hybrid;
pub mod models;
pub mod residual;
pub mod synthetic;
pub mod transform;
pub mod utils;

pub use error::{ForecastError, Result};
pub use hybrid::{HybridConfig, HybridOrchestrator};

/// Common imports for typical usage.
pub mod prelude {
    pub use crate::core::{
        FeatureMatrix, HybridForecast, HybridPoint, MissingValuePolicy, TimeSeries,
    };
    pub use crate::error::{ForecastError, Result};
    pub use crate::hybrid::{HybridConfig, HybridOrchestrator};
    pub use crate::models::seasonal::{ModelOrder, OrderChoice, SeasonalArima};
    pub use crate::residual::{LearnerConfig, ResidualSequenceLearner};
    pub use crate::synthetic::synthetic_weather;
    pub use crate::utils::{calculate_metrics, AccuracyMetrics, SummaryStats};
}
