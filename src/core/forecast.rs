//! Decomposed hybrid forecast results.

use chrono::{DateTime, Utc};

/// One forecast step, decomposed into its linear and residual parts.
///
/// The combined value is always derived from the parts via [`combined`],
/// never stored, so the provenance of every final value stays auditable.
///
/// [`combined`]: HybridPoint::combined
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridPoint {
    /// Forecast timestamp.
    pub timestamp: DateTime<Utc>,
    /// Contribution of the seasonal linear model.
    pub linear: f64,
    /// Contribution of the residual sequence learner.
    pub residual: f64,
}

impl HybridPoint {
    /// The final forecast value: linear component plus residual correction.
    pub fn combined(&self) -> f64 {
        self.linear + self.residual
    }
}

/// An ordered multi-step forecast with per-step decomposition.
#[derive(Debug, Clone, Default)]
pub struct HybridForecast {
    points: Vec<HybridPoint>,
}

impl HybridForecast {
    /// Assemble a forecast from aligned component series.
    ///
    /// Callers guarantee the three slices have equal length; this is an
    /// internal constructor used by the orchestrator after it has produced
    /// both components over the same horizon.
    pub(crate) fn from_components(
        timestamps: Vec<DateTime<Utc>>,
        linear: Vec<f64>,
        residual: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(timestamps.len(), linear.len());
        debug_assert_eq!(timestamps.len(), residual.len());
        let points = timestamps
            .into_iter()
            .zip(linear)
            .zip(residual)
            .map(|((timestamp, linear), residual)| HybridPoint {
                timestamp,
                linear,
                residual,
            })
            .collect();
        Self { points }
    }

    /// The forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    /// Check if the forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All forecast points.
    pub fn points(&self) -> &[HybridPoint] {
        &self.points
    }

    /// Forecast timestamps.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// The linear component of each step.
    pub fn linear_components(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.linear).collect()
    }

    /// The residual component of each step.
    pub fn residual_components(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.residual).collect()
    }

    /// The combined value of each step.
    pub fn combined_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.combined()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn make_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::hours(i as i64)).collect()
    }

    #[test]
    fn combined_is_sum_of_parts() {
        let forecast = HybridForecast::from_components(
            make_timestamps(3),
            vec![10.0, 11.0, 12.0],
            vec![0.5, -0.25, 0.0],
        );

        assert_eq!(forecast.horizon(), 3);
        for point in forecast.points() {
            assert_eq!(point.combined(), point.linear + point.residual);
        }
        assert_eq!(forecast.combined_values(), vec![10.5, 10.75, 12.0]);
    }

    #[test]
    fn component_accessors_preserve_order() {
        let forecast = HybridForecast::from_components(
            make_timestamps(2),
            vec![1.0, 2.0],
            vec![0.1, 0.2],
        );

        assert_eq!(forecast.linear_components(), vec![1.0, 2.0]);
        assert_eq!(forecast.residual_components(), vec![0.1, 0.2]);
        assert_eq!(forecast.timestamps().len(), 2);
        assert!(!forecast.is_empty());
    }

    #[test]
    fn default_forecast_is_empty() {
        let forecast = HybridForecast::default();
        assert!(forecast.is_empty());
        assert_eq!(forecast.horizon(), 0);
    }
}
