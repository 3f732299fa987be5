//! Forecasting models.

pub mod seasonal;

pub use seasonal::{ModelOrder, OrderChoice, SeasonalArima};
