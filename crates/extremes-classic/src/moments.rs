//! Method-of-moments estimators
//!
//! The Gumbel fit is closed form. The GEV shape solves
//! `|skew(c) − sample skewness| → min` with Nelder–Mead started at `c = 0`,
//! after which location and scale follow from the sample mean and standard
//! deviation.

use crate::Parameters;
use extremes_core::math::{gamma, EULER_GAMMA};
use extremes_core::utils::{mean, skewness, std_dev, validate_sample};
use extremes_core::{gev_skewness, nelder_mead, Error, NelderMeadOptions, Result};
use std::f64::consts::PI;
use tracing::debug;

fn spread_or_err(data: &[f64]) -> Result<f64> {
    let std = std_dev(data);
    if !(std > 0.0) {
        return Err(Error::Computation(
            "sample standard deviation is zero; moments cannot identify the scale".to_string(),
        ));
    }
    Ok(std)
}

/// Gumbel location and scale from the sample mean and standard deviation
pub fn gumbel(data: &[f64]) -> Result<Parameters> {
    validate_sample(data, 2)?;
    let std = spread_or_err(data)?;
    let scale = std * 6.0_f64.sqrt() / PI;
    let location = mean(data) - scale * EULER_GAMMA;
    Ok(Parameters::gumbel(location, scale))
}

/// GEV shape, location and scale by matching mean, variance and skewness
pub fn gev(data: &[f64]) -> Result<Parameters> {
    validate_sample(data, 3)?;
    let std = spread_or_err(data)?;
    let target = skewness(data);

    let objective = |x: &[f64]| (gev_skewness(x[0]) - target).abs();
    let solution = nelder_mead(objective, &[0.0], &NelderMeadOptions::default())?;
    let c = solution.x[0];
    debug!(
        shape = c,
        skewness = target,
        residual = solution.value,
        iterations = solution.iterations,
        "moment shape solved"
    );

    let m = mean(data);
    if c.abs() < 1e-6 {
        let scale = std * 6.0_f64.sqrt() / PI;
        return Ok(Parameters::gev(0.0, m - scale * EULER_GAMMA, scale));
    }

    let g1 = gamma(1.0 + c);
    let g2 = gamma(1.0 + 2.0 * c);
    let scale = std * c.abs() / (g2 - g1 * g1).sqrt();
    let location = m - scale * (1.0 - g1) / c;
    if !(scale.is_finite() && scale > 0.0 && location.is_finite()) {
        return Err(Error::Computation(format!(
            "moment GEV estimate is invalid (shape {c}, scale {scale})"
        )));
    }
    Ok(Parameters::gev(c, location, scale))
}
