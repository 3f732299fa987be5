//! Error types for the hybrid forecasting engine.

use thiserror::Error;

/// Result type alias for forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while fitting or forecasting.
///
/// Each variant names one specific failure mode; callers are expected to
/// branch on the variant rather than parse messages. Sub-component failures
/// propagate unchanged through the orchestrator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Series or window too short for the requested configuration.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// No candidate seasonal order converged during model selection.
    #[error("model fit failed: {0}")]
    ModelFit(String),

    /// Training loss became non-finite.
    #[error("training diverged at epoch {epoch}: loss is not finite")]
    TrainingDiverged { epoch: usize },

    /// Future-feature length or shape does not match the forecast horizon.
    #[error("input shape mismatch: expected {expected} rows, got {got}")]
    InputShape { expected: usize, got: usize },

    /// Predict called before a successful train.
    #[error("model must be trained before prediction")]
    NotTrained,

    /// Invalid hyperparameter or argument, rejected at construction time.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Timestamp ordering or grid violation.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Length mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Missing (NaN/Inf) values detected where they are not allowed.
    #[error("missing values detected in data")]
    MissingValues,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForecastError::InsufficientData { needed: 48, got: 20 };
        assert_eq!(err.to_string(), "insufficient data: need at least 48, got 20");

        let err = ForecastError::TrainingDiverged { epoch: 3 };
        assert_eq!(
            err.to_string(),
            "training diverged at epoch 3: loss is not finite"
        );

        let err = ForecastError::InputShape { expected: 24, got: 23 };
        assert_eq!(
            err.to_string(),
            "input shape mismatch: expected 24 rows, got 23"
        );

        let err = ForecastError::NotTrained;
        assert_eq!(err.to_string(), "model must be trained before prediction");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ForecastError::NotTrained;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
