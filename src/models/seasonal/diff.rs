//! Differencing and integration for the seasonal linear model.

/// Apply first differencing `d` times.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            break;
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Apply seasonal differencing once with the given period.
pub fn seasonal_difference(series: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || series.len() <= period {
        return Vec::new();
    }
    (period..series.len())
        .map(|i| series[i] - series[i - period])
        .collect()
}

/// Integrate (reverse first differencing) a forecast continuation.
///
/// `base` is the series the differencing was applied to; the returned values
/// continue it on the original scale.
pub fn integrate(forecast_diff: &[f64], base: &[f64], d: usize) -> Vec<f64> {
    if d == 0 {
        return forecast_diff.to_vec();
    }

    let mut result = forecast_diff.to_vec();
    for level in (0..d).rev() {
        let init = *difference(base, level).last().unwrap_or(&0.0);
        let mut cumsum = init;
        for value in &mut result {
            cumsum += *value;
            *value = cumsum;
        }
    }
    result
}

/// Integrate (reverse one round of seasonal differencing) a continuation.
///
/// `base` is the series before seasonal differencing; reconstructed values
/// are appended so horizons longer than one period chain off earlier
/// reconstructions.
pub fn seasonal_integrate(forecast_diff: &[f64], base: &[f64], period: usize) -> Vec<f64> {
    let mut extended = base.to_vec();
    for &value in forecast_diff {
        let prev = extended[extended.len() - period];
        extended.push(value + prev);
    }
    extended[base.len()..].to_vec()
}
