//! Scaling transforms with reusable inverse parameters.

/// Location/scale statistics fitted on one data channel.
///
/// Computed once from training data and reused unchanged afterwards; the
/// transform never refits itself on new data.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelScaler {
    /// Center value (mean for z-score, min for min-max).
    pub center: f64,
    /// Scale value (std dev for z-score, range for min-max).
    pub scale: f64,
}

impl ChannelScaler {
    /// Fit z-score parameters (zero mean, unit variance).
    pub fn standardize(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                center: 0.0,
                scale: 1.0,
            };
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = if values.len() > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };
        let std = variance.sqrt();

        Self {
            center: mean,
            scale: if std < 1e-10 { 1.0 } else { std },
        }
    }

    /// Fit min-max parameters (maps the training range to [0, 1]).
    pub fn min_max(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                center: 0.0,
                scale: 1.0,
            };
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;

        Self {
            center: min,
            scale: if range < 1e-10 { 1.0 } else { range },
        }
    }

    /// Apply the transform to a single value.
    pub fn apply(&self, x: f64) -> f64 {
        (x - self.center) / self.scale
    }

    /// Invert the transform for a single value.
    pub fn invert(&self, x: f64) -> f64 {
        x * self.scale + self.center
    }

    /// Apply the transform to a slice.
    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&x| self.apply(x)).collect()
    }

    /// Invert the transform for a slice.
    pub fn inverse_transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&x| self.invert(x)).collect()
    }
}
