//! Automatic seasonal order selection over a bounded candidate grid.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::seasonal::model::SeasonalArima;
use crate::models::seasonal::order::ModelOrder;
use tracing::{debug, warn};

/// Candidate orders searched by [`fit_auto`], all sharing the given period.
///
/// The grid is intentionally small; each candidate is a full CSS estimation.
fn candidate_orders(s: usize) -> Vec<ModelOrder> {
    vec![
        ModelOrder::new(1, 1, 1, 1, 1, 1, s),
        ModelOrder::new(2, 1, 2, 1, 1, 1, s),
        ModelOrder::new(1, 1, 1, 2, 1, 2, s),
        ModelOrder::new(1, 1, 0, 1, 1, 0, s),
        ModelOrder::new(0, 1, 1, 0, 1, 1, s),
    ]
}

/// Fit every candidate order and keep the lowest-AIC model.
///
/// Ties within a small AIC margin go to the simpler order. Degenerate input
/// (too short, non-finite, constant) is rejected up front as
/// [`ForecastError::InsufficientData`]; candidates that fail to fit are
/// skipped, and only when all of them fail on usable data is the error
/// surfaced as [`ForecastError::ModelFit`].
pub fn fit_auto(series: &TimeSeries, seasonal_period: usize) -> Result<SeasonalArima> {
    let values = series.values();
    let n = values.len();

    let finite_count = values.iter().filter(|v| v.is_finite()).count();
    if finite_count < n {
        return Err(ForecastError::InsufficientData {
            needed: n,
            got: finite_count,
        });
    }
    if n < 2 * seasonal_period {
        return Err(ForecastError::InsufficientData {
            needed: 2 * seasonal_period,
            got: n,
        });
    }
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if max - min < 1e-12 {
        return Err(ForecastError::InsufficientData { needed: 2, got: 1 });
    }

    let mut best: Option<SeasonalArima> = None;
    let mut failures = Vec::new();

    for order in candidate_orders(seasonal_period) {
        match SeasonalArima::fit(series, order) {
            Ok(model) => {
                debug!(?order, aic = model.aic(), "candidate fitted");
                best = match best {
                    None => Some(model),
                    Some(current) => {
                        if prefer(&model, &current) {
                            Some(model)
                        } else {
                            Some(current)
                        }
                    }
                };
            }
            Err(e) => {
                warn!(?order, error = %e, "candidate failed");
                failures.push(format!("{:?}: {}", order, e));
            }
        }
    }

    best.ok_or_else(|| {
        ForecastError::ModelFit(format!(
            "no candidate order could be fitted: {}",
            failures.join("; ")
        ))
    })
}

/// Whether `challenger` should replace `incumbent`.
fn prefer(challenger: &SeasonalArima, incumbent: &SeasonalArima) -> bool {
    let delta = challenger.aic() - incumbent.aic();
    if delta.abs() < 1e-6 {
        challenger.order().complexity() < incumbent.order().complexity()
    } else {
        delta < 0.0
    }
}
