//! Maximum likelihood estimators
//!
//! GEV likelihood maximization is unstable in the shape parameter without a
//! good start, so the BFGS search is seeded with the L-moment estimate. The
//! search minimizes a penalized likelihood: observations outside the support
//! cost a large finite penalty instead of making the objective infinite. The
//! Gumbel likelihood reduces to a one-dimensional equation in the scale.

use crate::{lmoments, moments, Parameters};
use extremes_core::utils::{mean, validate_sample};
use extremes_core::{bfgs, BfgsOptions, Error, ExtremeValueDistribution, Gev, Gumbel, Result};
use tracing::{debug, instrument};

const GUMBEL_MAX_ITERATIONS: usize = 100;
const GUMBEL_TOLERANCE: f64 = 1e-12;

/// Cost of one observation outside the GEV support, `100·ln(f64::MAX)`
pub const SUPPORT_PENALTY: f64 = 100.0 * 709.782_712_893_384;

/// Halvings of the starting shape tried before giving up on a start
const MAX_START_HALVINGS: usize = 60;

/// GEV negative log-likelihood in the `(shape, location, scale)` order used
/// by [`Parameters`]; `+∞` for invalid parameters
pub fn gev_nnlf(data: &[f64], theta: &[f64]) -> f64 {
    match Gev::new(theta[0], theta[1], theta[2]) {
        Ok(d) => d.nnlf(data),
        Err(_) => f64::INFINITY,
    }
}

/// GEV negative log-likelihood with [`SUPPORT_PENALTY`] charged for every
/// observation outside the support; `+∞` only for invalid parameters
pub fn gev_penalized_nnlf(data: &[f64], theta: &[f64]) -> f64 {
    let Ok(d) = Gev::new(theta[0], theta[1], theta[2]) else {
        return f64::INFINITY;
    };
    let (total, outside) = data.iter().fold((0.0, 0usize), |(total, outside), &x| {
        let lp = d.logpdf(x);
        if lp.is_finite() {
            (total - lp, outside)
        } else {
            (total, outside + 1)
        }
    });
    total + outside as f64 * SUPPORT_PENALTY
}

/// Pull the shape toward zero until every observation lies in the support
///
/// At `c = 0` the support is the whole real line, so the loop ends for any
/// positive scale.
fn feasible_start(data: &[f64], start: Parameters) -> Result<Vec<f64>> {
    let mut theta = start.to_vec();
    for _ in 0..MAX_START_HALVINGS {
        if gev_nnlf(data, &theta).is_finite() {
            return Ok(theta);
        }
        theta[0] *= 0.5;
    }
    theta[0] = 0.0;
    if gev_nnlf(data, &theta).is_finite() {
        Ok(theta)
    } else {
        Err(Error::Computation(format!(
            "no starting point inside the GEV support near {:?}",
            start.to_vec()
        )))
    }
}

/// Gumbel negative log-likelihood in `(location, scale)`; `+∞` for invalid
/// parameters
pub fn gumbel_nnlf(data: &[f64], theta: &[f64]) -> f64 {
    match Gumbel::new(theta[0], theta[1]) {
        Ok(d) => d.nnlf(data),
        Err(_) => f64::INFINITY,
    }
}

/// GEV maximum likelihood estimate
#[instrument(skip(data), fields(n = data.len()))]
pub fn gev(data: &[f64]) -> Result<Parameters> {
    validate_sample(data, 3)?;
    let lmom = lmoments::gev(data)?;
    let start = feasible_start(data, lmom)?;
    debug!(?lmom, ?start, "L-moment starting point");

    let objective = |theta: &[f64]| gev_penalized_nnlf(data, theta);
    let result = bfgs(objective, &start, &BfgsOptions::default())?;
    debug!(
        iterations = result.iterations,
        evaluations = result.evaluations,
        termination = ?result.termination,
        nnlf = result.value,
        "GEV likelihood maximized"
    );
    let (shape, location, scale) = (result.x[0], result.x[1], result.x[2]);
    if Gev::new(shape, location, scale).is_err() {
        return Err(Error::Computation(format!(
            "GEV likelihood search ended at invalid parameters {:?}",
            result.x
        )));
    }
    Ok(Parameters::gev(shape, location, scale))
}

/// Gumbel maximum likelihood estimate
///
/// Newton iteration on `σ = x̄ − Σ xᵢ e^{−xᵢ/σ} / Σ e^{−xᵢ/σ}` started at the
/// moment estimate, then `μ = −σ·ln(mean(e^{−xᵢ/σ}))`. The data are centred
/// on their mean before exponentiating.
#[instrument(skip(data), fields(n = data.len()))]
pub fn gumbel(data: &[f64]) -> Result<Parameters> {
    validate_sample(data, 2)?;
    let start = moments::gumbel(data)?;
    let centre = mean(data);
    let shifted: Vec<f64> = data.iter().map(|x| x - centre).collect();

    // weighted mean and variance of the shifted data under weights e^{−w/σ}
    let weighted = |sigma: f64| {
        let weights: Vec<f64> = shifted.iter().map(|w| (-w / sigma).exp()).collect();
        let total: f64 = weights.iter().sum();
        let m = weights.iter().zip(&shifted).map(|(p, w)| p * w).sum::<f64>() / total;
        let v = weights
            .iter()
            .zip(&shifted)
            .map(|(p, w)| p * (w - m).powi(2))
            .sum::<f64>()
            / total;
        (m, v, total)
    };

    let mut sigma = start.scale;
    for iteration in 0..GUMBEL_MAX_ITERATIONS {
        let (m, v, _) = weighted(sigma);
        let h = sigma + m;
        let dh = 1.0 + v / (sigma * sigma);
        let mut next = sigma - h / dh;
        if next <= 0.0 {
            next = 0.5 * sigma;
        }
        let step = (next - sigma).abs();
        sigma = next;
        if step <= GUMBEL_TOLERANCE * sigma {
            let (_, _, total) = weighted(sigma);
            let location = centre - sigma * (total / data.len() as f64).ln();
            debug!(iterations = iteration + 1, location, scale = sigma, "Gumbel MLE");
            if !location.is_finite() {
                break;
            }
            return Ok(Parameters::gumbel(location, sigma));
        }
    }
    Err(Error::non_convergence(
        GUMBEL_MAX_ITERATIONS,
        "Gumbel scale equation did not converge",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use extremes_core::test_data::port_pirie;

    #[test]
    fn test_port_pirie_gev() {
        let p = gev(&port_pirie()).unwrap();
        assert_abs_diff_eq!(p.shape, 0.0501, epsilon = 1e-3);
        assert_abs_diff_eq!(p.location, 3.8747, epsilon = 1e-3);
        assert_abs_diff_eq!(p.scale, 0.1980, epsilon = 1e-3);
    }

    #[test]
    fn test_port_pirie_gumbel() {
        let p = gumbel(&port_pirie()).unwrap();
        assert_abs_diff_eq!(p.location, 3.869444, epsilon = 1e-4);
        assert_abs_diff_eq!(p.scale, 0.194889, epsilon = 1e-4);
    }

    #[test]
    fn test_gumbel_is_stationary() {
        let data = port_pirie();
        let p = gumbel(&data).unwrap();
        let f = |theta: &[f64]| gumbel_nnlf(&data, theta);
        let g = extremes_core::numdiff::gradient(&f, &[p.location, p.scale]);
        assert!(g.amax() < 1e-4);
    }

    #[test]
    fn test_mle_beats_lmoments_likelihood() {
        let data = port_pirie();
        let mle = gev(&data).unwrap();
        let lmom = lmoments::gev(&data).unwrap();
        assert!(gev_nnlf(&data, &mle.to_vec()) <= gev_nnlf(&data, &lmom.to_vec()));
    }

    #[test]
    fn test_penalty_replaces_infinite_nnlf_outside_support() {
        let data = port_pirie();
        // upper endpoint 3.8 + 0.2 / 2 = 3.9 leaves most of the sample outside
        let theta = [2.0, 3.8, 0.2];
        let outside = data.iter().filter(|&&x| x > 3.9).count();
        assert!(outside > 0);
        let penalized = gev_penalized_nnlf(&data, &theta);
        assert!(penalized.is_finite());
        assert!(penalized >= outside as f64 * SUPPORT_PENALTY - 1e3);
        // inside the support the two objectives agree
        let p = gev(&data).unwrap().to_vec();
        assert_abs_diff_eq!(gev_penalized_nnlf(&data, &p), gev_nnlf(&data, &p), epsilon = 1e-9);
        assert_eq!(gev_penalized_nnlf(&data, &[0.1, 3.8, -1.0]), f64::INFINITY);
    }

    #[test]
    fn test_start_is_pulled_inside_support() {
        let data = port_pirie();
        let start = feasible_start(&data, Parameters::gev(2.0, 3.8, 0.2)).unwrap();
        assert!(start[0] < 2.0 && start[0] >= 0.0);
        assert!(gev_nnlf(&data, &start).is_finite());
        assert_eq!(start[1..], [3.8, 0.2]);
    }

    #[test]
    fn test_bounded_tail_samples_fit() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;
        for (shape, n) in [(0.3, 30), (0.3, 50), (0.5, 50)] {
            let model = Gev::new(shape, 10.0, 2.0).unwrap();
            for seed in 0..40 {
                let data = model.sample(&mut StdRng::seed_from_u64(seed), n);
                let p = gev(&data)
                    .unwrap_or_else(|e| panic!("c = {shape}, n = {n}, seed {seed}: {e}"));
                assert!(p.scale > 0.0);
            }
        }
    }

    #[test]
    fn test_invalid_parameters_have_infinite_nnlf() {
        let data = port_pirie();
        assert_eq!(gev_nnlf(&data, &[0.1, 3.8, -1.0]), f64::INFINITY);
        assert_eq!(gumbel_nnlf(&data, &[3.8, 0.0]), f64::INFINITY);
        // 1 − c·z ≤ 0 for the largest observation
        assert_eq!(gev_nnlf(&data, &[2.0, 3.8, 0.2]), f64::INFINITY);
    }
}
