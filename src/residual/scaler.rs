//! Fixed scaling parameters for the residual learner's channels.

use crate::error::{ForecastError, Result};
use crate::residual::align::AlignedData;
use crate::transform::ChannelScaler;

/// Per-channel scaling fitted once at training time.
///
/// The residual channel is min-max scaled to [0, 1]; each feature channel is
/// standardized to zero mean and unit variance. Prediction reuses these
/// parameters unchanged, so values outside the training range simply map
/// outside [0, 1].
#[derive(Debug, Clone)]
pub struct ScalingParameters {
    residual: ChannelScaler,
    features: Vec<ChannelScaler>,
}

impl ScalingParameters {
    /// Fit scaling parameters on aligned training data.
    pub fn fit(data: &AlignedData) -> Self {
        let residual = ChannelScaler::min_max(&data.residuals);
        let features = (0..data.num_features())
            .map(|c| {
                let column: Vec<f64> = data.features.iter().map(|row| row[c]).collect();
                ChannelScaler::standardize(&column)
            })
            .collect();
        Self { residual, features }
    }

    /// Number of feature channels the parameters were fitted on.
    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    /// Scale one residual value.
    pub fn scale_residual(&self, value: f64) -> f64 {
        self.residual.apply(value)
    }

    /// Map a scaled residual back to the original units.
    pub fn unscale_residual(&self, value: f64) -> f64 {
        self.residual.invert(value)
    }

    /// Scale one feature row.
    pub fn scale_features(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.features.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.features.len(),
                got: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.features.iter())
            .map(|(&v, scaler)| scaler.apply(v))
            .collect())
    }

    /// Build one network input row: scaled residual followed by scaled
    /// features.
    pub fn input_row(&self, residual: f64, features: &[f64]) -> Result<Vec<f64>> {
        let mut row = Vec::with_capacity(1 + self.features.len());
        row.push(self.scale_residual(residual));
        row.extend(self.scale_features(features)?);
        Ok(row)
    }
}
