//! Core data structures: time series, feature matrices, forecast results.

mod feature_matrix;
mod forecast;
mod time_series;

pub use feature_matrix::FeatureMatrix;
pub use forecast::{HybridForecast, HybridPoint};
pub use time_series::{MissingValuePolicy, TimeSeries};
