//! Statistical utility functions.

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the sample variance (n-1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Calculate the sample standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Summary statistics of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    /// Number of observations.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl SummaryStats {
    /// Summarize a slice of values.
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            count: values.len(),
            mean: mean(values),
            std_dev: std_dev(values),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_and_variance() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(mean(&values), 3.0, epsilon = 1e-10);
        assert_relative_eq!(variance(&values), 2.5, epsilon = 1e-10);
        assert_relative_eq!(std_dev(&values), 2.5_f64.sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn summary_stats_cover_extremes() {
        let stats = SummaryStats::from_values(&[2.0, -1.0, 4.0, 0.0]);
        assert_eq!(stats.count, 4);
        assert_relative_eq!(stats.mean, 1.25, epsilon = 1e-10);
        assert_eq!(stats.min, -1.0);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn empty_slice_yields_nan_mean() {
        assert!(mean(&[]).is_nan());
        assert_eq!(variance(&[]), 0.0);
    }
}
