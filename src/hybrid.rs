//! Hybrid orchestrator combining the seasonal linear model with the
//! residual learner.
//!
//! Training is strictly sequential: the linear model fits first, because the
//! residual learner's targets only exist once the linear residuals do.
//! Forecasting is read-only; both components run independently and their
//! outputs are summed pointwise.

use crate::core::{FeatureMatrix, HybridForecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::seasonal::{fit_auto, ModelOrder, OrderChoice, SeasonalArima};
use crate::residual::{LearnerConfig, ResidualSequenceLearner};
use crate::utils::{calculate_metrics, AccuracyMetrics, SummaryStats};
use tracing::{debug, info};

/// Configuration for the hybrid forecaster.
///
/// Every recognized option lives here and is validated by
/// [`HybridOrchestrator::new`]; a bad value is rejected at construction, not
/// discovered mid-fit.
#[derive(Debug, Clone)]
pub struct HybridConfig {
    /// Seasonal period in observations (24 for hourly data with a daily
    /// cycle).
    pub seasonal_period: usize,
    /// How the seasonal order is chosen.
    pub order: OrderChoice,
    /// Residual learner hyperparameters.
    pub learner: LearnerConfig,
}

impl HybridConfig {
    /// Configuration with defaults for the given seasonal period.
    pub fn new(seasonal_period: usize) -> Self {
        Self {
            seasonal_period,
            order: OrderChoice::Auto,
            learner: LearnerConfig::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.seasonal_period < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal period must be at least 2, got {}",
                self.seasonal_period
            )));
        }
        if let OrderChoice::Fixed(order) = self.order {
            order.validate()?;
            if order.s != self.seasonal_period {
                return Err(ForecastError::InvalidParameter(format!(
                    "fixed order period {} does not match configured period {}",
                    order.s, self.seasonal_period
                )));
            }
        }
        self.learner.validate()
    }
}

/// Both trained components, only ever stored together.
#[derive(Debug, Clone)]
struct TrainedState {
    linear: SeasonalArima,
    residual: ResidualSequenceLearner,
}

/// Two-phase hybrid forecaster.
///
/// Starts untrained; [`train`] moves it to the trained state atomically, and
/// any sub-step failure leaves it untrained with no partial state. A failed
/// retrain also discards the previously trained state.
///
/// [`train`]: HybridOrchestrator::train
#[derive(Debug, Clone)]
pub struct HybridOrchestrator {
    config: HybridConfig,
    trained: Option<TrainedState>,
}

impl HybridOrchestrator {
    /// Create an untrained orchestrator, validating the configuration.
    pub fn new(config: HybridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            trained: None,
        })
    }

    /// Whether a successful train has completed.
    pub fn is_trained(&self) -> bool {
        self.trained.is_some()
    }

    /// Train both components on the series and optional features.
    ///
    /// Fits the seasonal model, extracts its residuals, then trains the
    /// residual learner on them. Errors from either component propagate
    /// unchanged.
    pub fn train(
        &mut self,
        series: &TimeSeries,
        features: Option<&FeatureMatrix>,
    ) -> Result<()> {
        self.trained = None;

        let linear = match self.config.order {
            OrderChoice::Auto => fit_auto(series, self.config.seasonal_period)?,
            OrderChoice::Fixed(order) => SeasonalArima::fit(series, order)?,
        };
        debug!(order = ?linear.order(), aic = linear.aic(), "linear model fitted");

        let residuals = linear.residuals()?;
        let residual = ResidualSequenceLearner::fit(&residuals, features, &self.config.learner)?;
        info!(
            order = ?linear.order(),
            residual_loss = residual.final_loss(),
            "hybrid model trained"
        );

        self.trained = Some(TrainedState { linear, residual });
        Ok(())
    }

    /// Forecast `horizon` steps ahead, decomposed per step.
    ///
    /// When future features are unavailable the residual learner repeats the
    /// last observed feature row; that persistence policy is an
    /// approximation, and callers wanting something better should pass real
    /// `future_features`.
    pub fn predict(
        &self,
        horizon: usize,
        future_features: Option<&FeatureMatrix>,
    ) -> Result<HybridForecast> {
        let state = self.trained.as_ref().ok_or(ForecastError::NotTrained)?;

        if let Some(matrix) = future_features {
            if matrix.len() != horizon {
                return Err(ForecastError::InputShape {
                    expected: horizon,
                    got: matrix.len(),
                });
            }
        }

        let linear = state.linear.forecast(horizon)?;
        let residual = state.residual.predict(horizon, future_features)?;

        Ok(HybridForecast::from_components(
            linear.timestamps().to_vec(),
            linear.values().to_vec(),
            residual,
        ))
    }

    /// The seasonal order selected during training.
    pub fn selected_order(&self) -> Result<ModelOrder> {
        self.trained
            .as_ref()
            .map(|s| s.linear.order())
            .ok_or(ForecastError::NotTrained)
    }

    /// Summary statistics of the training residuals.
    pub fn residual_stats(&self) -> Result<SummaryStats> {
        self.trained
            .as_ref()
            .map(|s| SummaryStats::from_values(s.linear.residual_values()))
            .ok_or(ForecastError::NotTrained)
    }

    /// Forecast over the holdout's horizon and score the combined values
    /// against it.
    pub fn evaluate(
        &self,
        holdout: &TimeSeries,
        future_features: Option<&FeatureMatrix>,
    ) -> Result<AccuracyMetrics> {
        let forecast = self.predict(holdout.len(), future_features)?;
        calculate_metrics(holdout.values(), &forecast.combined_values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn seasonal_series(n: usize) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let values = (0..n)
            .map(|i| {
                10.0 + 8.0 * (2.0 * std::f64::consts::PI * i as f64 / 24.0).sin()
                    + 0.5 * ((i * 13 % 29) as f64 - 14.0) / 14.0
            })
            .collect();
        TimeSeries::hourly(base, values).unwrap()
    }

    fn quick_config() -> HybridConfig {
        HybridConfig {
            seasonal_period: 24,
            order: OrderChoice::Fixed(ModelOrder::new(1, 1, 1, 1, 1, 1, 24)),
            learner: LearnerConfig {
                window_length: 24,
                hidden_size: 8,
                epochs: 3,
                ..LearnerConfig::default()
            },
        }
    }

    #[test]
    fn predict_before_train_fails() {
        let orchestrator = HybridOrchestrator::new(quick_config()).unwrap();
        assert!(matches!(
            orchestrator.predict(24, None),
            Err(ForecastError::NotTrained)
        ));
        assert!(matches!(
            orchestrator.selected_order(),
            Err(ForecastError::NotTrained)
        ));
    }

    #[test]
    fn failed_train_leaves_orchestrator_untrained() {
        let mut orchestrator = HybridOrchestrator::new(quick_config()).unwrap();
        let short = seasonal_series(30);
        assert!(orchestrator.train(&short, None).is_err());
        assert!(!orchestrator.is_trained());
        assert!(matches!(
            orchestrator.predict(1, None),
            Err(ForecastError::NotTrained)
        ));
    }

    #[test]
    fn train_then_predict_decomposes_each_point() {
        let mut orchestrator = HybridOrchestrator::new(quick_config()).unwrap();
        orchestrator.train(&seasonal_series(300), None).unwrap();
        assert!(orchestrator.is_trained());

        let forecast = orchestrator.predict(24, None).unwrap();
        assert_eq!(forecast.horizon(), 24);
        for point in forecast.points() {
            assert_eq!(point.combined(), point.linear + point.residual);
        }
    }

    #[test]
    fn predict_is_idempotent() {
        let mut orchestrator = HybridOrchestrator::new(quick_config()).unwrap();
        orchestrator.train(&seasonal_series(300), None).unwrap();

        let a = orchestrator.predict(12, None).unwrap();
        let b = orchestrator.predict(12, None).unwrap();
        assert_eq!(a.combined_values(), b.combined_values());
    }

    #[test]
    fn future_features_row_count_must_match_horizon() {
        let base = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let mut orchestrator = HybridOrchestrator::new(quick_config()).unwrap();
        orchestrator.train(&seasonal_series(300), None).unwrap();

        let future = FeatureMatrix::new(
            (0..23).map(|i| base + chrono::Duration::hours(i)).collect(),
            vec!["dewpoint".to_string()],
            (0..23).map(|i| vec![i as f64]).collect(),
        )
        .unwrap();
        assert!(matches!(
            orchestrator.predict(24, Some(&future)),
            Err(ForecastError::InputShape { expected: 24, got: 23 })
        ));
    }

    #[test]
    fn config_rejects_mismatched_fixed_period() {
        let config = HybridConfig {
            seasonal_period: 12,
            order: OrderChoice::Fixed(ModelOrder::default_for_period(24)),
            learner: LearnerConfig::default(),
        };
        assert!(matches!(
            HybridOrchestrator::new(config),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn residual_stats_cover_training_errors() {
        let mut orchestrator = HybridOrchestrator::new(quick_config()).unwrap();
        orchestrator.train(&seasonal_series(300), None).unwrap();

        let stats = orchestrator.residual_stats().unwrap();
        assert_eq!(stats.count, 300 - 25);
        assert!(stats.std_dev.is_finite());
    }
}
