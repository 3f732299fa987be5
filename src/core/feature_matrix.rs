//! FeatureMatrix for auxiliary exogenous weather variables.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// Timestamped matrix of named feature channels (dewpoint, pressure, …).
///
/// Stored row-major: one row of feature values per timestamp. Row count always
/// equals timestamp count; every row has one value per channel. Missing values
/// are explicit NaN and are resolved during alignment, never silently skipped.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    timestamps: Vec<DateTime<Utc>>,
    names: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Create a feature matrix from timestamps, channel names and rows.
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        names: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self> {
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        if rows.len() != timestamps.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: rows.len(),
            });
        }

        for row in &rows {
            if row.len() != names.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: names.len(),
                    got: row.len(),
                });
            }
        }

        Ok(Self {
            timestamps,
            names,
            rows,
        })
    }

    /// Number of rows (timestamps).
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Number of feature channels.
    pub fn num_features(&self) -> usize {
        self.names.len()
    }

    /// Channel names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Row of feature values at `index`.
    pub fn row(&self, index: usize) -> Result<&[f64]> {
        self.rows
            .get(index)
            .map(|r| r.as_slice())
            .ok_or(ForecastError::DimensionMismatch {
                expected: self.rows.len(),
                got: index,
            })
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Values of one channel as a column.
    pub fn column(&self, channel: usize) -> Result<Vec<f64>> {
        if channel >= self.num_features() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.num_features(),
                got: channel,
            });
        }
        Ok(self.rows.iter().map(|r| r[channel]).collect())
    }

    /// Check whether any row contains NaN/Inf.
    pub fn has_missing_values(&self) -> bool {
        self.rows.iter().any(|r| r.iter().any(|v| !v.is_finite()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn make_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::hours(i as i64)).collect()
    }

    fn names() -> Vec<String> {
        vec!["dewpoint".to_string(), "pressure".to_string()]
    }

    #[test]
    fn constructs_and_exposes_rows_and_columns() {
        let rows = vec![vec![1.0, 1010.0], vec![2.0, 1011.0], vec![3.0, 1012.0]];
        let fm = FeatureMatrix::new(make_timestamps(3), names(), rows).unwrap();

        assert_eq!(fm.len(), 3);
        assert_eq!(fm.num_features(), 2);
        assert_eq!(fm.row(1).unwrap(), &[2.0, 1011.0]);
        assert_eq!(fm.column(1).unwrap(), vec![1010.0, 1011.0, 1012.0]);
    }

    #[test]
    fn rejects_ragged_rows() {
        let rows = vec![vec![1.0, 1010.0], vec![2.0]];
        let result = FeatureMatrix::new(make_timestamps(2), names(), rows);
        assert!(matches!(
            result,
            Err(ForecastError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn rejects_row_count_mismatch() {
        let rows = vec![vec![1.0, 1010.0]];
        let result = FeatureMatrix::new(make_timestamps(3), names(), rows);
        assert!(matches!(result, Err(ForecastError::DimensionMismatch { .. })));
    }

    #[test]
    fn rejects_unordered_timestamps() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let timestamps = vec![base + Duration::hours(1), base];
        let rows = vec![vec![1.0, 1.0], vec![2.0, 2.0]];
        let result = FeatureMatrix::new(timestamps, names(), rows);
        assert!(matches!(result, Err(ForecastError::TimestampError(_))));
    }

    #[test]
    fn detects_missing_values() {
        let rows = vec![vec![1.0, 1010.0], vec![f64::NAN, 1011.0]];
        let fm = FeatureMatrix::new(make_timestamps(2), names(), rows).unwrap();
        assert!(fm.has_missing_values());
    }
}
