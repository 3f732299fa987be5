//! Timestamp alignment between residuals and auxiliary features.

use crate::core::{FeatureMatrix, TimeSeries};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Residuals and features joined on their common timestamps.
///
/// `features` always has one row per timestamp; rows are empty when no
/// feature matrix was supplied.
#[derive(Debug, Clone)]
pub struct AlignedData {
    pub timestamps: Vec<DateTime<Utc>>,
    pub residuals: Vec<f64>,
    pub features: Vec<Vec<f64>>,
    pub feature_names: Vec<String>,
}

impl AlignedData {
    /// Number of aligned observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the alignment is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Width of each feature row.
    pub fn num_features(&self) -> usize {
        self.feature_names.len()
    }
}

/// Joins the residual series with an optional feature matrix.
///
/// Only timestamps present in both inputs survive, and a row is dropped
/// whenever the residual or any feature value at that timestamp is
/// non-finite. Both sides are dropped together so the sequences never
/// drift out of step.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureAligner;

impl FeatureAligner {
    /// Align `residuals` with `features` on their timestamp intersection.
    pub fn align(
        residuals: &TimeSeries,
        features: Option<&FeatureMatrix>,
    ) -> Result<AlignedData> {
        let aligned = match features {
            None => {
                let mut timestamps = Vec::new();
                let mut values = Vec::new();
                for (t, &v) in residuals.timestamps().iter().zip(residuals.values()) {
                    if v.is_finite() {
                        timestamps.push(*t);
                        values.push(v);
                    }
                }
                let n = timestamps.len();
                AlignedData {
                    timestamps,
                    residuals: values,
                    features: vec![Vec::new(); n],
                    feature_names: Vec::new(),
                }
            }
            Some(matrix) => Self::intersect(residuals, matrix),
        };

        if aligned.is_empty() {
            return Err(ForecastError::InsufficientData {
                needed: 1,
                got: 0,
            });
        }

        debug!(
            rows = aligned.len(),
            dropped = residuals.len() - aligned.len(),
            features = aligned.num_features(),
            "aligned residuals with features"
        );
        Ok(aligned)
    }

    /// Two-pointer merge over both (strictly increasing) timestamp axes.
    fn intersect(residuals: &TimeSeries, matrix: &FeatureMatrix) -> AlignedData {
        let mut timestamps = Vec::new();
        let mut values = Vec::new();
        let mut rows = Vec::new();

        let r_times = residuals.timestamps();
        let f_times = matrix.timestamps();
        let (mut i, mut j) = (0, 0);
        while i < r_times.len() && j < f_times.len() {
            if r_times[i] < f_times[j] {
                i += 1;
            } else if r_times[i] > f_times[j] {
                j += 1;
            } else {
                let value = residuals.values()[i];
                let row = &matrix.rows()[j];
                if value.is_finite() && row.iter().all(|v| v.is_finite()) {
                    timestamps.push(r_times[i]);
                    values.push(value);
                    rows.push(row.clone());
                }
                i += 1;
                j += 1;
            }
        }

        AlignedData {
            timestamps,
            residuals: values,
            features: rows,
            feature_names: matrix.names().to_vec(),
        }
    }
}
