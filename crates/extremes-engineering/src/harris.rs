//! Harris (1996) weighted least squares
//!
//! Plotting positions are the means of the Gumbel reduced order statistics,
//! and each point is weighted by the inverse variance of its position. The
//! moments come from Simpson quadrature in the reduced variate
//! `y = −ln(−ln x)`, where the integrands decay on both sides.

use crate::{PlottingPositionEstimator, PlottingPositionResult, Preconditioning};
use extremes_core::math::{ln_binomial, simpson};
use extremes_core::utils::{sorted_descending, validate_sample};
use extremes_core::{Error, Result};
use tracing::{debug, instrument};

const LOWER: f64 = -6.0;
const UPPER: f64 = 50.0;
const INTERVALS: usize = 4000;

/// Mean and variance of the reduced variate of the `rank`-th largest of `n`
/// Gumbel order statistics
///
/// Ranks start at 1 for the maximum.
pub fn order_statistic_moments(n: usize, rank: usize) -> (f64, f64) {
    debug_assert!((1..=n).contains(&rank));
    let ln_norm = (n as f64).ln() + ln_binomial((n - 1) as u64, (rank - 1) as u64);
    let above = (n - rank + 1) as f64;
    let below = (rank - 1) as f64;
    // density of y times e^{−y}, the Jacobian of x = exp(−e^{−y})
    let kernel = |y: f64| {
        let ln_x = -(-y).exp();
        let ln_1mx = (-ln_x.exp_m1()).ln();
        let log_term = ln_norm + above * ln_x - y;
        if below == 0.0 {
            log_term.exp()
        } else {
            (log_term + below * ln_1mx).exp()
        }
    };
    let mean = simpson(|y| y * kernel(y), LOWER, UPPER, INTERVALS);
    let second = simpson(|y| y * y * kernel(y), LOWER, UPPER, INTERVALS);
    (mean, second - mean * mean)
}

/// Harris (1996) estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct Harris1996;

impl PlottingPositionEstimator for Harris1996 {
    fn name(&self) -> String {
        "Harris1996".to_string()
    }

    #[instrument(skip(self, data), fields(n = data.len(), exponent = preconditioning.exponent()))]
    fn estimate(
        &self,
        data: &[f64],
        preconditioning: Preconditioning,
    ) -> Result<PlottingPositionResult> {
        validate_sample(data, 2)?;
        let x = preconditioning.transform(&sorted_descending(data))?;
        let n = x.len();

        let (ymean, variance): (Vec<f64>, Vec<f64>) =
            (1..=n).map(|rank| order_statistic_moments(n, rank)).unzip();
        if variance.iter().any(|v| !(v.is_finite() && *v > 0.0)) {
            return Err(Error::Computation(
                "order statistic variance is not positive".to_string(),
            ));
        }
        let total: f64 = variance.iter().map(|v| 1.0 / v).sum();
        let weights: Vec<f64> = variance.iter().map(|v| 1.0 / v / total).collect();

        let weighted_sum = |f: &dyn Fn(usize) -> f64| -> f64 {
            weights.iter().enumerate().map(|(i, w)| w * f(i)).sum()
        };
        let s_xy = weighted_sum(&|i: usize| ymean[i] * x[i]);
        let s_y = weighted_sum(&|i: usize| ymean[i]);
        let s_x = weighted_sum(&|i: usize| x[i]);
        let s_xx = weighted_sum(&|i: usize| x[i] * x[i]);

        let denominator = s_xx - s_x * s_x;
        if !(denominator > 0.0) {
            return Err(Error::Computation(
                "weighted variance of the sample is zero".to_string(),
            ));
        }
        let alpha = (s_xy - s_y * s_x) / denominator;
        let characteristic_product = alpha * s_x - s_y;
        debug!(alpha, characteristic_product, "weighted least squares");

        let residual_std_dev = (n > 2).then(|| {
            let deviation =
                weighted_sum(&|i: usize| (ymean[i] - alpha * x[i] + characteristic_product).powi(2));
            (deviation * n as f64 / (n - 2) as f64).sqrt()
        });

        let mut result = PlottingPositionResult::build(
            self.name(),
            preconditioning,
            x,
            ymean,
            1.0 / alpha,
            characteristic_product / alpha,
        )?;
        result.weights = Some(weights);
        result.goodness_of_fit.alpha = Some(alpha);
        result.goodness_of_fit.characteristic_product = Some(characteristic_product);
        result.goodness_of_fit.residual_std_dev = residual_std_dev;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use extremes_core::math::EULER_GAMMA;
    use extremes_core::test_data::harris_1996;
    use std::f64::consts::PI;

    #[test]
    fn test_single_draw_is_standard_gumbel() {
        let (mean, variance) = order_statistic_moments(1, 1);
        assert_abs_diff_eq!(mean, EULER_GAMMA, epsilon = 1e-9);
        assert_abs_diff_eq!(variance, PI * PI / 6.0, epsilon = 1e-8);
    }

    #[test]
    fn test_maximum_of_n() {
        // the maximum of n standard Gumbel draws is Gumbel shifted by ln n
        let (mean, variance) = order_statistic_moments(10, 1);
        assert_abs_diff_eq!(mean, EULER_GAMMA + 10.0_f64.ln(), epsilon = 1e-9);
        assert_abs_diff_eq!(variance, PI * PI / 6.0, epsilon = 1e-8);
        let (smaller, _) = order_statistic_moments(10, 2);
        assert!(smaller < mean);
    }

    #[test]
    fn test_harris_dataset() {
        let r = Harris1996
            .estimate(&harris_1996(), Preconditioning::new(2.0).unwrap())
            .unwrap();
        let gof = r.goodness_of_fit;
        assert_abs_diff_eq!(r.offset, 271.6, epsilon = 0.05);
        assert_abs_diff_eq!(gof.alpha.unwrap(), 0.01437, epsilon = 1e-4);
        assert_abs_diff_eq!(gof.characteristic_product.unwrap(), 3.903, epsilon = 5e-3);
        assert_abs_diff_eq!(gof.residual_std_dev.unwrap(), 0.16859, epsilon = 1e-4);
        let weights = r.weights.as_ref().unwrap();
        assert_abs_diff_eq!(weights.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(r.data.windows(2).all(|w| w[0] >= w[1]));
        assert!(r.goodness_of_fit.r_squared.is_none());
    }

    #[test]
    fn test_two_points_have_no_residual() {
        let r = Harris1996.estimate(&[10.0, 12.0], Preconditioning::default()).unwrap();
        assert!(r.goodness_of_fit.residual_std_dev.is_none());
        assert!(r.slope > 0.0);
    }

    #[test]
    fn test_constant_sample_fails() {
        let err = Harris1996
            .estimate(&[5.0, 5.0, 5.0], Preconditioning::default())
            .unwrap_err();
        assert!(err.is_computation());
    }
}
