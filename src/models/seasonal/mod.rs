//! Seasonal ARIMA: the linear half of the hybrid forecaster.

pub mod auto;
pub mod diff;
pub mod model;
pub mod order;

pub use auto::fit_auto;
pub use model::SeasonalArima;
pub use order::{ModelOrder, OrderChoice};
