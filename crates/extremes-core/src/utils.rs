//! Utility functions for working with samples of block maxima

use crate::{Error, Result};
use std::cmp::Ordering;

/// Check that a sample is usable by an estimator
///
/// Rejects samples shorter than `min_len` and samples containing NaN or
/// infinite values. Both are configuration errors.
pub fn validate_sample(data: &[f64], min_len: usize) -> Result<()> {
    if data.len() < min_len.max(1) {
        return Err(Error::InsufficientData {
            expected: min_len.max(1),
            actual: data.len(),
        });
    }
    if data.iter().any(|x| !x.is_finite()) {
        return Err(Error::non_finite("sample"));
    }
    Ok(())
}

fn nan_last(a: &f64, b: &f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(b),
    }
}

/// Sort data ascending and return a new vector
///
/// Handles NaN values by placing them at the end.
///
/// # Examples
///
/// ```rust
/// use extremes_core::utils::sorted;
///
/// let data = vec![3.0, 1.0, 5.0, 2.0, 4.0];
/// assert_eq!(sorted(&data), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
/// ```
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(nan_last);
    sorted
}

/// Sort data descending and return a new vector (NaN values last)
pub fn sorted_descending(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| match (a.is_nan(), b.is_nan()) {
        (false, false) => b.total_cmp(a),
        _ => nan_last(a, b),
    });
    sorted
}

/// Calculate the mean of a slice
///
/// Returns 0.0 for empty slices.
///
/// # Examples
///
/// ```rust
/// use extremes_core::utils::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
/// assert_eq!(mean(&[]), 0.0);
/// ```
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Central moment of order `k` with divisor `n`
fn central_moment(data: &[f64], m: f64, k: i32) -> f64 {
    data.iter().map(|&x| (x - m).powi(k)).sum::<f64>() / data.len() as f64
}

/// Population standard deviation (divisor `n`)
///
/// Returns 0.0 for empty slices.
pub fn std_dev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    central_moment(data, mean(data), 2).sqrt()
}

/// Biased sample skewness `m3 / m2^1.5`
///
/// Returns NaN when the sample has no spread.
pub fn skewness(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let m = mean(data);
    let m2 = central_moment(data, m, 2);
    if m2 == 0.0 {
        return f64::NAN;
    }
    central_moment(data, m, 3) / m2.powf(1.5)
}

/// Pearson correlation coefficient of two equally long slices
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    let mx = mean(x);
    let my = mean(y);
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx) * (a - mx);
        syy += (b - my) * (b - my);
    }
    sxy / (sxx * syy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sorted_handles_nan() {
        let data = [2.0, f64::NAN, 1.0];
        let s = sorted(&data);
        assert_eq!(&s[..2], &[1.0, 2.0]);
        assert!(s[2].is_nan());

        let d = sorted_descending(&data);
        assert_eq!(&d[..2], &[2.0, 1.0]);
        assert!(d[2].is_nan());
    }

    #[test]
    fn test_moments() {
        let data = [1.0, 2.0, 3.0, 4.0, 10.0];
        assert_relative_eq!(mean(&data), 4.0);
        assert_relative_eq!(std_dev(&data), 10.0_f64.sqrt(), epsilon = 1e-12);
        // m3 = 144/5, m2 = 10
        assert_relative_eq!(skewness(&data), 28.8 / 10.0_f64.powf(1.5), epsilon = 1e-12);
        assert!(skewness(&[2.0, 2.0, 2.0]).is_nan());
    }

    #[test]
    fn test_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert_relative_eq!(correlation(&x, &y), 1.0, epsilon = 1e-12);
        let neg: Vec<f64> = y.iter().map(|v| -v).collect();
        assert_relative_eq!(correlation(&x, &neg), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_validate_sample() {
        assert!(validate_sample(&[1.0, 2.0], 2).is_ok());
        assert!(matches!(
            validate_sample(&[], 2),
            Err(Error::InsufficientData { actual: 0, .. })
        ));
        assert!(matches!(
            validate_sample(&[1.0], 2),
            Err(Error::InsufficientData { expected: 2, actual: 1 })
        ));
        assert_eq!(validate_sample(&[], 0), Err(Error::empty_input()));
        let err = validate_sample(&[1.0, f64::INFINITY], 2).unwrap_err();
        assert!(err.is_configuration());
    }
}
