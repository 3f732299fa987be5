//! Seasonal ARIMA model estimated by conditional least squares.
//!
//! The multiplicative SARIMA structure is approximated additively: after
//! seasonal and regular differencing, an ARMA process with lag terms at
//! {1..p} ∪ {s..P·s} (and likewise for MA) is estimated on the differenced
//! series. Forecasts recursively extend that process with future shocks set
//! to zero, then integrate back through both differencing stages.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::seasonal::diff::{difference, integrate, seasonal_difference, seasonal_integrate};
use crate::models::seasonal::order::ModelOrder;
use crate::utils::optimization::{nelder_mead, SimplexConfig};
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// A fitted seasonal linear model.
///
/// Created by one [`fit`] call and immutable afterwards; owns everything
/// needed to extend the fitted process deterministically.
///
/// [`fit`]: SeasonalArima::fit
#[derive(Debug, Clone)]
pub struct SeasonalArima {
    order: ModelOrder,
    ar_lags: Vec<usize>,
    ma_lags: Vec<usize>,
    ar_coefficients: Vec<f64>,
    ma_coefficients: Vec<f64>,
    intercept: f64,
    /// Series at each seasonal differencing level; `levels[0]` is the
    /// original series, `levels[k]` has been seasonally differenced k times.
    levels: Vec<Vec<f64>>,
    /// Fully differenced series the ARMA terms operate on.
    differenced: Vec<f64>,
    /// One-step in-sample errors on the differenced scale.
    residuals: Vec<f64>,
    residual_variance: f64,
    aic: f64,
    residual_timestamps: Vec<DateTime<Utc>>,
    last_timestamp: DateTime<Utc>,
    step: Duration,
}

/// Lags touched by the AR or MA side: regular lags first, then seasonal.
fn lag_set(regular: usize, seasonal: usize, period: usize) -> Vec<usize> {
    let mut lags: Vec<usize> = (1..=regular).collect();
    for k in 1..=seasonal {
        let lag = k * period;
        if !lags.contains(&lag) {
            lags.push(lag);
        }
    }
    lags
}

/// One-step predictions over the differenced series.
///
/// Warm-up points use whatever AR/MA terms already have history, so every
/// returned residual is a genuine one-step error.
fn one_step_residuals(
    series: &[f64],
    intercept: f64,
    ar_lags: &[usize],
    ar: &[f64],
    ma_lags: &[usize],
    ma: &[f64],
) -> Vec<f64> {
    let n = series.len();
    let mut residuals = vec![0.0; n];
    for t in 0..n {
        let mut pred = intercept;
        for (&lag, &coef) in ar_lags.iter().zip(ar.iter()) {
            if t >= lag {
                pred += coef * (series[t - lag] - intercept);
            }
        }
        for (&lag, &coef) in ma_lags.iter().zip(ma.iter()) {
            if t >= lag {
                pred += coef * residuals[t - lag];
            }
        }
        residuals[t] = series[t] - pred;
    }
    residuals
}

/// Conditional sum of squares over the post-warm-up region.
fn conditional_sum_of_squares(
    series: &[f64],
    intercept: f64,
    ar_lags: &[usize],
    ar: &[f64],
    ma_lags: &[usize],
    ma: &[f64],
    start: usize,
) -> f64 {
    let residuals = one_step_residuals(series, intercept, ar_lags, ar, ma_lags, ma);
    residuals[start.min(residuals.len())..]
        .iter()
        .map(|r| r * r)
        .sum()
}

impl SeasonalArima {
    /// Fit a seasonal ARIMA of the given order to `series`.
    ///
    /// Requires at least two full seasonal cycles of data. Degenerate input
    /// (constant values, non-finite values) fails fast; an estimation that
    /// does not produce finite coefficients is a [`ForecastError::ModelFit`].
    pub fn fit(series: &TimeSeries, order: ModelOrder) -> Result<Self> {
        order.validate()?;

        let values = series.values();
        let n = values.len();

        let finite_count = values.iter().filter(|v| v.is_finite()).count();
        if finite_count < n {
            return Err(ForecastError::InsufficientData {
                needed: n,
                got: finite_count,
            });
        }

        let min_len = (2 * order.s).max(order.differencing_loss() + order.max_lag() + 5);
        if n < min_len {
            return Err(ForecastError::InsufficientData {
                needed: min_len,
                got: n,
            });
        }

        // A constant series carries no structure worth modeling.
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if max - min < 1e-12 {
            return Err(ForecastError::InsufficientData { needed: 2, got: 1 });
        }

        // Differencing pipeline: seasonal first, then regular.
        let mut levels = vec![values.to_vec()];
        for _ in 0..order.sd {
            let next = seasonal_difference(levels.last().expect("levels non-empty"), order.s);
            levels.push(next);
        }
        let differenced = difference(levels.last().expect("levels non-empty"), order.d);

        let ar_lags = lag_set(order.p, order.sp, order.s);
        let ma_lags = lag_set(order.q, order.sq, order.s);
        let start = order.max_lag();

        if differenced.len() <= start + 2 {
            return Err(ForecastError::InsufficientData {
                needed: order.differencing_loss() + start + 3,
                got: n,
            });
        }

        let (intercept, ar_coefficients, ma_coefficients) =
            Self::estimate(&differenced, &ar_lags, &ma_lags, start)?;

        let residuals = one_step_residuals(
            &differenced,
            intercept,
            &ar_lags,
            &ar_coefficients,
            &ma_lags,
            &ma_coefficients,
        );

        let tail = &residuals[start..];
        let n_eff = tail.len() as f64;
        let residual_variance = tail.iter().map(|r| r * r).sum::<f64>() / n_eff;
        if !residual_variance.is_finite() {
            return Err(ForecastError::ModelFit(
                "residual variance is not finite".to_string(),
            ));
        }

        // Gaussian log-likelihood under the CSS residuals.
        let k = order.num_params() as f64;
        let ll = -0.5
            * n_eff
            * (1.0 + residual_variance.max(1e-300).ln() + (2.0 * std::f64::consts::PI).ln());
        let aic = -2.0 * ll + 2.0 * k;

        debug!(
            p = order.p,
            d = order.d,
            q = order.q,
            sp = order.sp,
            sd = order.sd,
            sq = order.sq,
            s = order.s,
            aic,
            "fitted seasonal model"
        );

        let loss = order.differencing_loss();
        let residual_timestamps = series.timestamps()[loss..].to_vec();
        let last_timestamp = *series
            .timestamps()
            .last()
            .expect("length checked above");

        Ok(Self {
            order,
            ar_lags,
            ma_lags,
            ar_coefficients,
            ma_coefficients,
            intercept,
            levels,
            differenced,
            residuals,
            residual_variance,
            aic,
            residual_timestamps,
            last_timestamp,
            step: series.step(),
        })
    }

    /// Estimate intercept and AR/MA coefficients by minimizing the CSS.
    fn estimate(
        differenced: &[f64],
        ar_lags: &[usize],
        ma_lags: &[usize],
        start: usize,
    ) -> Result<(f64, Vec<f64>, Vec<f64>)> {
        let n_ar = ar_lags.len();
        let n_ma = ma_lags.len();
        let mean = differenced.iter().sum::<f64>() / differenced.len() as f64;

        if n_ar == 0 && n_ma == 0 {
            return Ok((mean, vec![], vec![]));
        }

        let mut initial = vec![0.0; 1 + n_ar + n_ma];
        initial[0] = mean;
        for i in 0..n_ar {
            initial[1 + i] = 0.1 / (i + 1) as f64;
        }
        for i in 0..n_ma {
            initial[1 + n_ar + i] = 0.1 / (i + 1) as f64;
        }

        // Coefficients bounded for stationarity/invertibility.
        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        bounds.extend(std::iter::repeat((-0.99, 0.99)).take(n_ar + n_ma));

        let result = nelder_mead(
            |params| {
                conditional_sum_of_squares(
                    differenced,
                    params[0],
                    ar_lags,
                    &params[1..1 + n_ar],
                    ma_lags,
                    &params[1 + n_ar..],
                    start,
                )
            },
            &initial,
            Some(&bounds),
            SimplexConfig::default(),
        );

        if !result.value.is_finite() || result.point.iter().any(|x| !x.is_finite()) {
            return Err(ForecastError::ModelFit(
                "coefficient estimation did not converge".to_string(),
            ));
        }

        Ok((
            result.point[0],
            result.point[1..1 + n_ar].to_vec(),
            result.point[1 + n_ar..].to_vec(),
        ))
    }

    /// The fitted order.
    pub fn order(&self) -> ModelOrder {
        self.order
    }

    /// Akaike information criterion of the fit.
    pub fn aic(&self) -> f64 {
        self.aic
    }

    /// Fitted intercept on the differenced scale.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// AR coefficients, ordered as regular lags then seasonal lags.
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    /// MA coefficients, ordered as regular lags then seasonal lags.
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    /// Variance of the post-warm-up residuals.
    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    /// Observations consumed by differencing; the residual series starts
    /// this many points after the input series.
    pub fn differencing_loss(&self) -> usize {
        self.order.differencing_loss()
    }

    /// In-sample one-step errors.
    ///
    /// Length equals the input length minus [`differencing_loss`]; the points
    /// consumed by differencing are dropped, not padded.
    ///
    /// [`differencing_loss`]: SeasonalArima::differencing_loss
    pub fn residuals(&self) -> Result<TimeSeries> {
        TimeSeries::new(self.residual_timestamps.clone(), self.residuals.clone())
    }

    /// Raw residual values without timestamps.
    pub fn residual_values(&self) -> &[f64] {
        &self.residuals
    }

    /// Forecast `horizon` steps ahead.
    ///
    /// Deterministic given the fitted state: the differenced process is
    /// extended recursively with future shocks at zero, then integrated back
    /// through regular and seasonal differencing.
    pub fn forecast(&self, horizon: usize) -> Result<TimeSeries> {
        let mut extended = self.differenced.clone();
        let mut shocks = self.residuals.clone();

        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = self.intercept;
            for (&lag, &coef) in self.ar_lags.iter().zip(self.ar_coefficients.iter()) {
                if t >= lag {
                    pred += coef * (extended[t - lag] - self.intercept);
                }
            }
            for (&lag, &coef) in self.ma_lags.iter().zip(self.ma_coefficients.iter()) {
                if t >= lag {
                    pred += coef * shocks[t - lag];
                }
            }
            extended.push(pred);
            shocks.push(0.0);
        }

        let forecast_diff = extended[self.differenced.len()..].to_vec();

        // Undo regular differencing against the seasonally differenced base,
        // then unwind each seasonal differencing level in reverse.
        let mut forecast = integrate(
            &forecast_diff,
            self.levels.last().expect("levels non-empty"),
            self.order.d,
        );
        for level in (0..self.order.sd).rev() {
            forecast = seasonal_integrate(&forecast, &self.levels[level], self.order.s);
        }

        let timestamps = (1..=horizon)
            .map(|i| self.last_timestamp + self.step * i as i32)
            .collect();
        TimeSeries::new(timestamps, forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_series(values: Vec<f64>) -> TimeSeries {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        TimeSeries::hourly(base, values).unwrap()
    }

    fn seasonal_values(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                15.0 + 0.01 * i as f64
                    + 5.0 * (2.0 * std::f64::consts::PI * i as f64 / 24.0).sin()
                    + 0.3 * ((i * 7 % 13) as f64 - 6.0) / 6.0
            })
            .collect()
    }

    #[test]
    fn fit_recovers_seasonal_structure() {
        let ts = make_series(seasonal_values(300));
        let model = SeasonalArima::fit(&ts, ModelOrder::new(1, 1, 1, 1, 1, 1, 24)).unwrap();

        assert_eq!(model.order().s, 24);
        assert!(model.aic().is_finite());
        assert!(model.residual_variance() >= 0.0);
    }

    #[test]
    fn residual_length_equals_input_minus_differencing_loss() {
        let ts = make_series(seasonal_values(300));
        let order = ModelOrder::new(1, 1, 1, 1, 1, 1, 24);
        let model = SeasonalArima::fit(&ts, order).unwrap();

        let residuals = model.residuals().unwrap();
        assert_eq!(model.differencing_loss(), 25);
        assert_eq!(residuals.len(), 300 - 25);
        assert_eq!(residuals.timestamps()[0], ts.timestamps()[25]);
    }

    #[test]
    fn forecast_is_deterministic() {
        let ts = make_series(seasonal_values(300));
        let model = SeasonalArima::fit(&ts, ModelOrder::new(1, 1, 1, 1, 1, 1, 24)).unwrap();

        let a = model.forecast(24).unwrap();
        let b = model.forecast(24).unwrap();
        assert_eq!(a.values(), b.values());
        assert_eq!(a.len(), 24);
    }

    #[test]
    fn forecast_timestamps_continue_hourly_grid() {
        let ts = make_series(seasonal_values(200));
        let model = SeasonalArima::fit(&ts, ModelOrder::new(1, 0, 0, 0, 1, 0, 24)).unwrap();

        let forecast = model.forecast(5).unwrap();
        let last = *ts.timestamps().last().unwrap();
        for (i, t) in forecast.timestamps().iter().enumerate() {
            assert_eq!(*t, last + Duration::hours(i as i64 + 1));
        }
    }

    #[test]
    fn rejects_series_shorter_than_two_cycles() {
        let ts = make_series(seasonal_values(40));
        let result = SeasonalArima::fit(&ts, ModelOrder::new(1, 1, 1, 1, 1, 1, 24));
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn rejects_constant_series() {
        let ts = make_series(vec![7.5; 200]);
        let result = SeasonalArima::fit(&ts, ModelOrder::new(1, 1, 1, 1, 1, 1, 24));
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut values = seasonal_values(200);
        values[100] = f64::NAN;
        let ts = make_series(values);
        let result = SeasonalArima::fit(&ts, ModelOrder::new(1, 1, 1, 1, 1, 1, 24));
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn pure_trend_forecast_continues_trend() {
        let values: Vec<f64> = (0..120)
            .map(|i| 10.0 + 2.0 * i as f64 + 0.2 * ((i * 3 % 7) as f64 - 3.0))
            .collect();
        let ts = make_series(values.clone());
        let model = SeasonalArima::fit(&ts, ModelOrder::new(1, 1, 0, 0, 0, 0, 24)).unwrap();

        let forecast = model.forecast(5).unwrap();
        // The trend adds ~2 per step; the first forecast should be near the
        // last observation plus one step.
        assert!((forecast.values()[0] - (values[119] + 2.0)).abs() < 2.0);
    }

    #[test]
    fn lag_set_merges_regular_and_seasonal() {
        assert_eq!(lag_set(2, 1, 24), vec![1, 2, 24]);
        assert_eq!(lag_set(0, 2, 12), vec![12, 24]);
        assert_eq!(lag_set(3, 0, 24), vec![1, 2, 3]);
    }
}
