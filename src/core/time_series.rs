//! TimeSeries data structure for univariate temporal observations.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Policy for handling missing values (NaN/Inf).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MissingValuePolicy {
    /// Drop observations with missing values.
    Drop,
    /// Return an error if missing values are found.
    Error,
}

/// A univariate time series with a fixed nominal frequency.
///
/// Timestamps are strictly increasing. Gaps in the grid are represented by
/// explicit NaN values, never by silently omitted rows; modeling code decides
/// how to handle them through [`MissingValuePolicy`].
#[derive(Debug, Clone)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    metadata: HashMap<String, String>,
    frequency: Option<Duration>,
}

impl TimeSeries {
    /// Create a new time series from timestamps and values.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        if values.len() != timestamps.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }

        Ok(Self {
            timestamps,
            values,
            metadata: HashMap::new(),
            frequency: None,
        })
    }

    /// Create an hourly series starting at `start`.
    pub fn hourly(start: DateTime<Utc>, values: Vec<f64>) -> Result<Self> {
        let timestamps = (0..values.len())
            .map(|i| start + Duration::hours(i as i64))
            .collect();
        let mut ts = Self::new(timestamps, values)?;
        ts.frequency = Some(Duration::hours(1));
        Ok(ts)
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get metadata.
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Set a metadata entry.
    pub fn set_metadata(&mut self, key: String, value: String) {
        self.metadata.insert(key, value);
    }

    /// Get the nominal frequency.
    pub fn frequency(&self) -> Option<Duration> {
        self.frequency
    }

    /// Set the nominal frequency.
    pub fn set_frequency(&mut self, freq: Duration) {
        self.frequency = Some(freq);
    }

    /// The nominal step between observations.
    ///
    /// Falls back to the modal spacing when no frequency has been set, and to
    /// one hour for series too short to infer from.
    pub fn step(&self) -> Duration {
        if let Some(freq) = self.frequency {
            return freq;
        }
        self.infer_frequency(0.5).unwrap_or_else(|_| Duration::hours(1))
    }

    /// Check if the series has missing values (NaN or Inf).
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }

    /// Return a sanitized copy with missing values handled by `policy`.
    pub fn sanitized(&self, policy: MissingValuePolicy) -> Result<TimeSeries> {
        match policy {
            MissingValuePolicy::Error => {
                if self.has_missing_values() {
                    return Err(ForecastError::MissingValues);
                }
                Ok(self.clone())
            }
            MissingValuePolicy::Drop => {
                let mut timestamps = Vec::with_capacity(self.len());
                let mut values = Vec::with_capacity(self.len());
                for (t, &v) in self.timestamps.iter().zip(self.values.iter()) {
                    if v.is_finite() {
                        timestamps.push(*t);
                        values.push(v);
                    }
                }
                Ok(TimeSeries {
                    timestamps,
                    values,
                    metadata: self.metadata.clone(),
                    frequency: self.frequency,
                })
            }
        }
    }

    /// Extract a half-open slice `[start, end)` of the series.
    pub fn slice(&self, start: usize, end: usize) -> Result<TimeSeries> {
        if start > end || end > self.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "invalid slice {}..{} for series of length {}",
                start,
                end,
                self.len()
            )));
        }
        Ok(TimeSeries {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
            metadata: self.metadata.clone(),
            frequency: self.frequency,
        })
    }

    /// Infer the frequency as the modal spacing between timestamps.
    ///
    /// `tolerance` is the minimum share of spacings the mode must cover.
    pub fn infer_frequency(&self, tolerance: f64) -> Result<Duration> {
        if self.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: self.len(),
            });
        }

        let diffs: Vec<i64> = self
            .timestamps
            .windows(2)
            .map(|w| (w[1] - w[0]).num_seconds())
            .collect();

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for &diff in &diffs {
            *counts.entry(diff).or_insert(0) += 1;
        }

        let (modal_diff, modal_count) = counts
            .iter()
            .max_by_key(|(_, &count)| count)
            .map(|(&diff, &count)| (diff, count))
            .expect("diffs is non-empty");

        let modal_ratio = modal_count as f64 / diffs.len() as f64;
        if modal_ratio < tolerance {
            return Err(ForecastError::TimestampError(
                "no unique modal spacing found".to_string(),
            ));
        }

        Ok(Duration::seconds(modal_diff))
    }
}
