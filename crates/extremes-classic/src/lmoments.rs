//! L-moment estimators
//!
//! Sample L-moments come from the unbiased probability-weighted moments
//! `b0, b1, b2` of the ascending sample. The GEV shape is recovered from the
//! L-skewness `τ3` with Hosking's rational approximations (Newton refinement
//! below `τ3 = −0.8`); location and scale then follow in closed form.

use crate::Parameters;
use extremes_core::math::{ln_gamma, EULER_GAMMA};
use extremes_core::utils::{sorted, validate_sample};
use extremes_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;
use tracing::debug;

/// First sample L-moments and the L-skewness
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleLMoments {
    pub l1: f64,
    pub l2: f64,
    /// `λ3 / λ2`; NaN for samples shorter than three
    pub t3: f64,
}

/// Sample L-moments of an unsorted sample (at least two values)
pub fn sample_lmoments(data: &[f64]) -> Result<SampleLMoments> {
    validate_sample(data, 2)?;
    let x = sorted(data);
    let n = x.len() as f64;

    let mut b0 = 0.0;
    let mut b1 = 0.0;
    let mut b2 = 0.0;
    for (i, &v) in x.iter().enumerate() {
        let i = i as f64;
        b0 += v;
        b1 += i * v;
        b2 += i * (i - 1.0) * v;
    }
    b0 /= n;
    b1 /= n * (n - 1.0);

    let l1 = b0;
    let l2 = 2.0 * b1 - b0;
    let t3 = if x.len() >= 3 {
        b2 /= n * (n - 1.0) * (n - 2.0);
        (6.0 * b2 - 6.0 * b1 + b0) / l2
    } else {
        f64::NAN
    };
    Ok(SampleLMoments { l1, l2, t3 })
}

fn gumbel_from_lmoments(l1: f64, l2: f64) -> (f64, f64) {
    let scale = l2 / LN_2;
    (l1 - EULER_GAMMA * scale, scale)
}

/// Gumbel location and scale from L-moments
pub fn gumbel(data: &[f64]) -> Result<Parameters> {
    let lm = sample_lmoments(data)?;
    if !(lm.l2 > 0.0) {
        return Err(Error::Computation(
            "second L-moment is not positive; the sample has no spread".to_string(),
        ));
    }
    let (location, scale) = gumbel_from_lmoments(lm.l1, lm.l2);
    Ok(Parameters::gumbel(location, scale))
}

/// GEV shape (`c` convention) from the L-skewness
pub fn gev_shape_from_t3(t3: f64) -> f64 {
    const A0: f64 = 0.28377530;
    const A1: f64 = -1.21096399;
    const A2: f64 = -2.50728214;
    const A3: f64 = -1.13455566;
    const A4: f64 = -0.07138022;
    const B1: f64 = 2.06189696;
    const B2: f64 = 1.31912239;
    const B3: f64 = 0.25077104;
    const C1: f64 = 1.59921491;
    const C2: f64 = -0.48832213;
    const C3: f64 = 0.01573152;
    const D1: f64 = -0.64363929;
    const D2: f64 = 0.08985247;
    const EPS: f64 = 1e-6;
    const MAX_ITERATIONS: usize = 20;

    if t3 > 0.0 {
        let z = 1.0 - t3;
        return (-1.0 + z * (C1 + z * (C2 + z * C3))) / (1.0 + z * (D1 + z * D2));
    }

    let mut g = (A0 + t3 * (A1 + t3 * (A2 + t3 * (A3 + t3 * A4))))
        / (1.0 + t3 * (B1 + t3 * (B2 + t3 * B3)));
    if t3 >= -0.8 {
        return g;
    }

    // Newton-Raphson on τ3(g) for strongly negative skew
    if t3 <= -0.97 {
        g = 1.0 - (1.0 + t3).ln() / LN_2;
    }
    let t0 = (t3 + 3.0) / 2.0;
    let ln3 = 3.0_f64.ln();
    for _ in 0..MAX_ITERATIONS {
        let x2 = 2.0_f64.powf(-g);
        let x3 = 3.0_f64.powf(-g);
        let xx2 = 1.0 - x2;
        let xx3 = 1.0 - x3;
        let t = xx3 / xx2;
        let deriv = (xx2 * x3 * ln3 - xx3 * x2 * LN_2) / (xx2 * xx2);
        let previous = g;
        g -= (t - t0) / deriv;
        if (g - previous).abs() <= EPS * g {
            return g;
        }
    }
    debug!(t3, g, "L-moment shape iteration did not settle");
    g
}

/// GEV shape, location and scale from L-moments
///
/// Shapes within `1e-5` of zero fall back to the Gumbel solution.
pub fn gev(data: &[f64]) -> Result<Parameters> {
    const SMALL: f64 = 1e-5;

    validate_sample(data, 3)?;
    let lm = sample_lmoments(data)?;
    if !(lm.l2 > 0.0) || !(lm.t3.abs() < 1.0) {
        return Err(Error::Computation(format!(
            "L-moments (l2 = {}, t3 = {}) admit no GEV fit",
            lm.l2, lm.t3
        )));
    }

    let g = gev_shape_from_t3(lm.t3);
    if g.abs() < SMALL {
        let (location, scale) = gumbel_from_lmoments(lm.l1, lm.l2);
        return Ok(Parameters::gev(0.0, location, scale));
    }

    let gam = ln_gamma(1.0 + g).exp();
    let scale = lm.l2 * g / (gam * (1.0 - 2.0_f64.powf(-g)));
    let location = lm.l1 - scale * (1.0 - gam) / g;
    debug!(shape = g, location, scale, t3 = lm.t3, "GEV L-moment estimate");
    if !(scale.is_finite() && scale > 0.0 && location.is_finite()) {
        return Err(Error::Computation(format!(
            "L-moment GEV estimate is invalid (shape {g}, scale {scale})"
        )));
    }
    Ok(Parameters::gev(g, location, scale))
}
