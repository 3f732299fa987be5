//! Utility functions shared by the modeling components.

pub mod metrics;
pub mod optimization;
pub mod stats;

pub use metrics::{calculate_metrics, AccuracyMetrics};
pub use optimization::{nelder_mead, SimplexConfig, SimplexResult};
pub use stats::SummaryStats;
