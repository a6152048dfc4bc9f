//! Lieblein BLUE estimator
//!
//! Location and scale are linear combinations of the ascending order
//! statistics with tabulated best linear unbiased weights (Lieblein, 1974).
//! Samples longer than 16 reuse the `n = 16` weights through a
//! hypergeometric extension.

use crate::{PlottingPositionEstimator, PlottingPositionResult, Preconditioning};
use extremes_core::math::hypergeometric_pmf;
use extremes_core::utils::{sorted, validate_sample};
use extremes_core::Result;
use tracing::{debug, instrument};

/// Largest tabulated sample size
pub const MAX_TABULATED: usize = 16;

/// Weights `aᵢ` of the location estimate, indexed by `n − 2`
const LOCATION_WEIGHTS: [&[f64]; 15] = [
    // n = 2
    &[0.916373, 0.083627],
    // n = 3
    &[0.656320, 0.255714, 0.087966],
    // n = 4
    &[0.510998, 0.263943, 0.153680, 0.071380],
    // n = 5
    &[0.418934, 0.246282, 0.167609, 0.108824, 0.058350],
    // n = 6
    &[0.355450, 0.225488, 0.165620, 0.121054, 0.083522, 0.048867],
    // n = 7
    &[
        0.309008, 0.206260, 0.158590, 0.123223, 0.093747, 0.067331,
        0.041841,
    ],
    // n = 8
    &[
        0.273535, 0.189428, 0.150200, 0.121174, 0.097142, 0.075904,
        0.056132, 0.036485,
    ],
    // n = 9
    &[
        0.245539, 0.174882, 0.141789, 0.117357, 0.097218, 0.079569,
        0.063400, 0.047957, 0.032291,
    ],
    // n = 10
    &[
        0.222867, 0.162308, 0.133845, 0.112868, 0.095636, 0.080618,
        0.066988, 0.054193, 0.041748, 0.028929,
    ],
    // n = 11
    &[
        0.204123, 0.151384, 0.126522, 0.108226, 0.093234, 0.080222,
        0.068485, 0.057578, 0.047159, 0.036886, 0.026180,
    ],
    // n = 12
    &[
        0.188361, 0.141833, 0.119838, 0.103673, 0.090455, 0.079018,
        0.068747, 0.059266, 0.050303, 0.041628, 0.032984, 0.023894,
    ],
    // n = 13
    &[
        0.174916, 0.133422, 0.113759, 0.099323, 0.087540, 0.077368,
        0.068264, 0.059900, 0.052047, 0.044528, 0.037177, 0.029790,
        0.021965,
    ],
    // n = 14
    &[
        0.163309, 0.125966, 0.108230, 0.095223, 0.084619, 0.075484,
        0.067331, 0.059866, 0.052891, 0.046260, 0.039847, 0.033526,
        0.027131, 0.020317,
    ],
    // n = 15
    &[
        0.153184, 0.119314, 0.103196, 0.091384, 0.081767, 0.073495,
        0.066128, 0.059401, 0.053140, 0.047217, 0.041529, 0.035984,
        0.030484, 0.024887, 0.018894,
    ],
    // n = 16
    &[
        0.144271, 0.113346, 0.098600, 0.087801, 0.079021, 0.071476,
        0.064771, 0.058660, 0.052989, 0.047646, 0.042539, 0.037597,
        0.032748, 0.027911, 0.022969, 0.017653,
    ],
];

/// Weights `bᵢ` of the scale estimate, indexed by `n − 2`
const SCALE_WEIGHTS: [&[f64]; 15] = [
    // n = 2
    &[-0.721348, 0.721348],
    // n = 3
    &[-0.630541, 0.255816, 0.374725],
    // n = 4
    &[-0.558619, 0.085903, 0.223919, 0.248797],
    // n = 5
    &[-0.503127, 0.006534, 0.130455, 0.181656, 0.184483],
    // n = 6
    &[-0.459273, -0.035992, 0.073199, 0.126724, 0.149534, 0.145807],
    // n = 7
    &[
        -0.423700, -0.060698, 0.036192, 0.087339, 0.114868, 0.125859,
        0.120141,
    ],
    // n = 8
    &[
        -0.394187, -0.075767, 0.011124, 0.058928, 0.087162, 0.102728,
        0.108074, 0.101936,
    ],
    // n = 9
    &[
        -0.369242, -0.085203, -0.006486, 0.037977, 0.065574, 0.082654,
        0.091965, 0.094369, 0.088391,
    ],
    // n = 10
    &[
        -0.347830, -0.091158, -0.019210, 0.022179, 0.048671, 0.066064,
        0.077021, 0.082771, 0.083552, 0.077940,
    ],
    // n = 11
    &[
        -0.329210, -0.094869, -0.028604, 0.010032, 0.035284, 0.052464,
        0.064071, 0.071381, 0.074977, 0.074830, 0.069644,
    ],
    // n = 12
    &[
        -0.312840, -0.097086, -0.035655, 0.000534, 0.024548, 0.041278,
        0.053053, 0.061112, 0.066122, 0.068357, 0.067671, 0.062906,
    ],
    // n = 13
    &[
        -0.298313, -0.098284, -0.041013, -0.006997, 0.015836, 0.032014,
        0.043710, 0.052101, 0.057862, 0.061355, 0.062699, 0.061699,
        0.057330,
    ],
    // n = 14
    &[
        -0.285316, -0.098775, -0.045120, -0.013039, 0.008690, 0.024282,
        0.035768, 0.044262, 0.050418, 0.054624, 0.057083, 0.057829,
        0.056652, 0.052642,
    ],
    // n = 15
    &[
        -0.273606, -0.098768, -0.048285, -0.017934, 0.002773, 0.017779,
        0.028988, 0.037452, 0.043798, 0.048415, 0.051534, 0.053267,
        0.053603, 0.052334, 0.048648,
    ],
    // n = 16
    &[
        -0.262990, -0.098406, -0.050731, -0.021933, -0.002167, 0.012270,
        0.023168, 0.031528, 0.037939, 0.042787, 0.046308, 0.048646,
        0.049860, 0.049912, 0.048602, 0.045207,
    ],
];

/// BLUE weights `(aᵢ, bᵢ)` for a sample of `n ≥ 2`, ascending order
///
/// For `n > 16` each weight is
/// `Σₜ w₁₆[t]·(t/i)·P(t | n, 16, i)` with the hypergeometric pmf `P`.
pub fn weights(n: usize) -> (Vec<f64>, Vec<f64>) {
    if n <= MAX_TABULATED {
        let i = n.saturating_sub(2);
        return (LOCATION_WEIGHTS[i].to_vec(), SCALE_WEIGHTS[i].to_vec());
    }
    extend(n, MAX_TABULATED)
}

/// Extend the `m`-point table to `n` order statistics
pub fn extend(n: usize, m: usize) -> (Vec<f64>, Vec<f64>) {
    let a_m = LOCATION_WEIGHTS[m - 2];
    let b_m = SCALE_WEIGHTS[m - 2];
    let mut a = vec![0.0; n];
    let mut b = vec![0.0; n];
    for i in 1..=n {
        for t in 1..=m {
            let factor =
                t as f64 / i as f64 * hypergeometric_pmf(n as u64, m as u64, i as u64, t as u64);
            a[i - 1] += a_m[t - 1] * factor;
            b[i - 1] += b_m[t - 1] * factor;
        }
    }
    (a, b)
}

/// Lieblein best linear unbiased estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct Lieblein;

impl PlottingPositionEstimator for Lieblein {
    fn name(&self) -> String {
        "Lieblein".to_string()
    }

    #[instrument(skip(self, data), fields(n = data.len(), exponent = preconditioning.exponent()))]
    fn estimate(
        &self,
        data: &[f64],
        preconditioning: Preconditioning,
    ) -> Result<PlottingPositionResult> {
        validate_sample(data, 2)?;
        let x = preconditioning.transform(&sorted(data))?;
        let n = x.len();

        let (a, b) = weights(n);
        let location: f64 = a.iter().zip(&x).map(|(w, v)| w * v).sum();
        let scale: f64 = b.iter().zip(&x).map(|(w, v)| w * v).sum();
        debug!(location, scale, "BLUE estimates");

        let reduced_variate = (1..=n)
            .map(|i| -(-(i as f64 / (n as f64 + 1.0)).ln()).ln())
            .collect();
        PlottingPositionResult::build(self.name(), preconditioning, x, reduced_variate, scale, location)
    }
}
