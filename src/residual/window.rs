//! Sliding-window construction for sequence training.

use crate::error::{ForecastError, Result};
use ndarray::Array1;

/// Training windows over a sequence of input rows.
///
/// Window `i` covers rows `[i, i + window_length)` and is labeled with the
/// target one step past its end, so `len - window_length` windows come out
/// of `len` rows.
#[derive(Debug, Clone)]
pub struct WindowSet {
    pub windows: Vec<Vec<Array1<f64>>>,
    pub targets: Vec<f64>,
}

impl WindowSet {
    /// Number of windows.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Check if no windows were produced.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Slice `inputs` into overlapping windows labeled by the next target.
///
/// `targets[i]` is the supervised label aligned with `inputs[i]`; window `i`
/// is labeled with `targets[i + window_length]`. Fails when the sequence
/// cannot produce a single window.
pub fn prepare_windows(
    inputs: &[Array1<f64>],
    targets: &[f64],
    window_length: usize,
) -> Result<WindowSet> {
    if window_length == 0 {
        return Err(ForecastError::InvalidParameter(
            "window length must be positive".to_string(),
        ));
    }
    if inputs.len() != targets.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: inputs.len(),
            got: targets.len(),
        });
    }
    if inputs.len() <= window_length {
        return Err(ForecastError::InsufficientData {
            needed: window_length + 1,
            got: inputs.len(),
        });
    }

    let count = inputs.len() - window_length;
    let mut windows = Vec::with_capacity(count);
    let mut labels = Vec::with_capacity(count);
    for i in 0..count {
        windows.push(inputs[i..i + window_length].to_vec());
        labels.push(targets[i + window_length]);
    }

    Ok(WindowSet {
        windows,
        targets: labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Array1<f64>> {
        (0..n).map(|i| Array1::from_elem(1, i as f64)).collect()
    }

    #[test]
    fn produces_len_minus_window_windows() {
        let inputs = rows(10);
        let targets: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let set = prepare_windows(&inputs, &targets, 3).unwrap();

        assert_eq!(set.len(), 7);
        assert_eq!(set.windows[0][0][0], 0.0);
        assert_eq!(set.windows[0][2][0], 2.0);
        assert_eq!(set.targets[0], 3.0);
        assert_eq!(set.targets[6], 9.0);
    }

    #[test]
    fn last_window_ends_just_before_last_target() {
        let inputs = rows(5);
        let targets: Vec<f64> = (0..5).map(|i| i as f64 * 10.0).collect();
        let set = prepare_windows(&inputs, &targets, 4).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.targets[0], 40.0);
    }

    #[test]
    fn sequence_no_longer_than_window_is_rejected() {
        let inputs = rows(4);
        let targets = vec![0.0; 4];
        let result = prepare_windows(&inputs, &targets, 4);
        assert!(matches!(
            result,
            Err(ForecastError::InsufficientData { needed: 5, got: 4 })
        ));
    }

    #[test]
    fn zero_window_is_rejected() {
        let result = prepare_windows(&rows(3), &[0.0; 3], 0);
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }
}
