//! Mathematical utilities shared by the estimators
//!
//! Special functions come from `statrs`; this module adds the handful of
//! combinations the extreme value estimators need.

use crate::{Error, Result};
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::function::factorial::ln_binomial as statrs_ln_binomial;

pub use statrs::function::gamma::{gamma, ln_gamma};

/// Euler–Mascheroni constant
pub const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Skewness of the Gumbel distribution, `12·√6·ζ(3)/π³`
pub const GUMBEL_SKEWNESS: f64 = 1.139_547_099_404_648_6;

/// Quantile of the standard normal distribution
pub fn normal_quantile(p: f64) -> Result<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(Error::InvalidConfig(format!(
            "Normal quantile probability {p} must be in (0, 1)"
        )));
    }
    let normal = Normal::new(0.0, 1.0).map_err(|e| {
        Error::Computation(format!("Failed to create normal distribution: {}", e))
    })?;
    Ok(normal.inverse_cdf(p))
}

/// Natural log of the binomial coefficient `C(n, k)`
///
/// Returns negative infinity when `k > n`.
pub fn ln_binomial(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    statrs_ln_binomial(n, k)
}

/// Hypergeometric probability mass function
///
/// Probability of drawing `t` marked items in `m` draws without replacement
/// from a population of `n` items of which `i` are marked:
/// `C(i, t)·C(n − i, m − t) / C(n, m)`. Zero outside the support.
pub fn hypergeometric_pmf(n: u64, m: u64, i: u64, t: u64) -> f64 {
    if i > n || m > n || t > i || t > m || m - t > n - i {
        return 0.0;
    }
    (ln_binomial(i, t) + ln_binomial(n - i, m - t) - ln_binomial(n, m)).exp()
}

/// Composite Simpson rule over `[a, b]`
///
/// `intervals` is rounded up to the next even number.
pub fn simpson<F>(f: F, a: f64, b: f64, intervals: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    let n = (intervals.max(2) + 1) & !1;
    let h = (b - a) / n as f64;
    let mut sum = f(a) + f(b);
    for k in 1..n {
        let weight = if k % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * f(a + k as f64 * h);
    }
    sum * h / 3.0
}
