//! Accuracy metrics for forecast evaluation.

use crate::error::{ForecastError, Result};

/// Accuracy metrics comparing forecasts against held-out observations.
#[derive(Debug, Clone)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error.
    pub mae: f64,
    /// Mean Squared Error.
    pub mse: f64,
    /// Root Mean Squared Error.
    pub rmse: f64,
    /// Mean Absolute Percentage Error (None if actuals contain zeros).
    pub mape: Option<f64>,
}

/// Calculate accuracy metrics between actual and predicted values.
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    if actual.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let n = actual.len() as f64;

    let mae = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n;

    let mse = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n;

    let mape = if actual.iter().any(|&a| a.abs() < 1e-10) {
        None
    } else {
        Some(
            actual
                .iter()
                .zip(predicted.iter())
                .map(|(a, p)| ((a - p) / a).abs())
                .sum::<f64>()
                / n
                * 100.0,
        )
    };

    Ok(AccuracyMetrics {
        mae,
        mse,
        rmse: mse.sqrt(),
        mape,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_forecast_scores_zero() {
        let actual = vec![10.0, 20.0, 30.0];
        let metrics = calculate_metrics(&actual, &actual).unwrap();
        assert_relative_eq!(metrics.mae, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.rmse, 0.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.mape.unwrap(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn constant_offset_measures_bias() {
        let actual = vec![10.0, 20.0, 30.0];
        let predicted = vec![12.0, 22.0, 32.0];
        let metrics = calculate_metrics(&actual, &predicted).unwrap();
        assert_relative_eq!(metrics.mae, 2.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.mse, 4.0, epsilon = 1e-10);
        assert_relative_eq!(metrics.rmse, 2.0, epsilon = 1e-10);
    }

    #[test]
    fn mape_unavailable_with_zero_actuals() {
        let metrics = calculate_metrics(&[0.0, 1.0], &[0.5, 1.5]).unwrap();
        assert!(metrics.mape.is_none());
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let result = calculate_metrics(&[1.0, 2.0], &[1.0]);
        assert!(matches!(
            result,
            Err(ForecastError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(calculate_metrics(&[], &[]).is_err());
    }
}
