//! Confidence intervals for fitted parameters and return levels
//!
//! Two strategies are available. The delta method inverts the numerical
//! Hessian of the negative log-likelihood and propagates the covariance
//! through the analytic gradient of the return level. The parametric
//! bootstrap samples from the fitted model, refits every replicate with the
//! same family and method, and reads percentile intervals off the ensemble.
//!
//! Return levels are evaluated on the 0.1–500 year grid and on the
//! configured return periods.

use crate::{fit_parameters, mle, CiMethod, Family, FitConfig, Parameters};
use extremes_confidence::{
    Bootstrap, ConfidenceInterval, DeltaMethod, InstabilityWarning, Parametric,
    PercentileBootstrap,
};
use extremes_core::math::normal_quantile;
use extremes_core::{return_level, return_period_grid, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Return levels with lower and upper confidence bounds
///
/// Periods with `T ≤ frec` have no defined level; all three values are NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnLevelBand {
    pub periods: Vec<f64>,
    pub levels: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl ReturnLevelBand {
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Interval of the `i`-th period
    pub fn interval(&self, i: usize, confidence_level: f64) -> Option<ConfidenceInterval> {
        Some(ConfidenceInterval::new(
            *self.lower.get(i)?,
            *self.upper.get(i)?,
            *self.levels.get(i)?,
            confidence_level,
        ))
    }

    /// Interval for an exact period, if present
    pub fn interval_for(&self, period: f64, confidence_level: f64) -> Option<ConfidenceInterval> {
        let i = self.periods.iter().position(|&t| t == period)?;
        self.interval(i, confidence_level)
    }

    fn from_intervals(periods: Vec<f64>, intervals: &[ConfidenceInterval]) -> Self {
        Self {
            periods,
            levels: intervals.iter().map(|ci| ci.estimate).collect(),
            lower: intervals.iter().map(|ci| ci.lower).collect(),
            upper: intervals.iter().map(|ci| ci.upper).collect(),
        }
    }
}

/// Parameter and return-level intervals of a fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceResult {
    /// Significance level; the confidence level is `1 − alpha`
    pub alpha: f64,
    pub method: CiMethod,
    pub shape: ConfidenceInterval,
    pub location: ConfidenceInterval,
    pub scale: ConfidenceInterval,
    /// Delta method only: GEV order (shape, location, scale), Gumbel order
    /// (location, scale)
    pub standard_errors: Option<Vec<f64>>,
    /// Bands over [`return_period_grid`]
    pub curve: ReturnLevelBand,
    /// Bands over the configured return periods
    pub requested: ReturnLevelBand,
    /// Bootstrap stability warnings
    pub diagnostics: Vec<InstabilityWarning>,
}

impl ConfidenceResult {
    pub fn confidence_level(&self) -> f64 {
        1.0 - self.alpha
    }

    /// `[("shape", ..), ("location", ..), ("scale", ..)]`
    pub fn parameters(&self) -> [(&'static str, &ConfidenceInterval); 3] {
        [
            ("shape", &self.shape),
            ("location", &self.location),
            ("scale", &self.scale),
        ]
    }

    /// Interval of a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ConfidenceInterval> {
        self.parameters()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, ci)| ci)
    }
}

/// Intervals requested by `config`, or `None` when `ci` is zero
pub fn estimate_confidence(
    family: Family,
    parameters: &Parameters,
    data: &[f64],
    config: &FitConfig,
) -> Result<Option<ConfidenceResult>> {
    match config.requested_ci() {
        None => Ok(None),
        Some(CiMethod::Delta) => delta(family, parameters, data, config).map(Some),
        Some(CiMethod::Bootstrap) => bootstrap(family, parameters, data, config).map(Some),
    }
}

/// Gradient of the GEV return level in `(ξ, μ, σ)` with `ξ = −c`, where
/// `y = −ln(1 − frec/T)`
fn gev_level_gradient(xi: f64, scale: f64, y: f64) -> [f64; 3] {
    let ln_y = y.ln();
    if xi == 0.0 {
        return [scale * ln_y * ln_y / 2.0, 1.0, -ln_y];
    }
    let y_xi = y.powf(-xi);
    [
        scale * xi.powi(-2) * (1.0 - y_xi) - scale / xi * y_xi * ln_y,
        1.0,
        -(1.0 - y_xi) / xi,
    ]
}

fn gumbel_level_gradient(y: f64) -> [f64; 2] {
    [1.0, -y.ln()]
}

/// Delta-method intervals of a maximum likelihood fit
#[instrument(skip(parameters, data, config), fields(n = data.len(), ci = config.ci))]
pub fn delta(
    family: Family,
    parameters: &Parameters,
    data: &[f64],
    config: &FitConfig,
) -> Result<ConfidenceResult> {
    let alpha = config.ci;
    let z = normal_quantile(1.0 - alpha / 2.0)?;
    let level = 1.0 - alpha;
    let distribution = parameters.distribution(family)?;
    let xi = -parameters.shape;

    let covariance = match family {
        // the likelihood is written in ξ = −c; standard errors do not depend on the sign
        Family::Gev => DeltaMethod::from_negative_log_likelihood(
            |theta: &[f64]| mle::gev_nnlf(data, &[-theta[0], theta[1], theta[2]]),
            &[xi, parameters.location, parameters.scale],
        )?,
        Family::Gumbel => DeltaMethod::from_negative_log_likelihood(
            |theta: &[f64]| mle::gumbel_nnlf(data, theta),
            &[parameters.location, parameters.scale],
        )?,
    };
    let se = covariance.standard_errors()?;
    debug!(?se, "delta-method standard errors");

    let (shape, location, scale) = match family {
        Family::Gev => (
            DeltaMethod::interval_with_z(parameters.shape, se[0], z, level),
            DeltaMethod::interval_with_z(parameters.location, se[1], z, level),
            DeltaMethod::interval_with_z(parameters.scale, se[2], z, level),
        ),
        Family::Gumbel => (
            ConfidenceInterval::fixed(0.0, level),
            DeltaMethod::interval_with_z(parameters.location, se[0], z, level),
            DeltaMethod::interval_with_z(parameters.scale, se[1], z, level),
        ),
    };

    let band = |periods: Vec<f64>| {
        let intervals: Vec<ConfidenceInterval> = periods
            .iter()
            .map(|&t| {
                let estimate = return_level(&distribution, t, config.frec);
                let y = -(-config.frec / t).ln_1p();
                let standard_error = match family {
                    Family::Gev => covariance.propagate(&gev_level_gradient(xi, parameters.scale, y)),
                    Family::Gumbel => covariance.propagate(&gumbel_level_gradient(y)),
                };
                DeltaMethod::interval_with_z(estimate, standard_error, z, level)
            })
            .collect();
        ReturnLevelBand::from_intervals(periods, &intervals)
    };

    Ok(ConfidenceResult {
        alpha,
        method: CiMethod::Delta,
        shape,
        location,
        scale,
        standard_errors: Some(se),
        curve: band(return_period_grid()),
        requested: band(config.return_periods.clone()),
        diagnostics: Vec::new(),
    })
}

/// Parametric bootstrap intervals
///
/// Every replicate is drawn from the fitted model and refitted with the
/// configured method. Replicates whose refit fails are dropped and reported
/// in the diagnostics.
#[instrument(skip(parameters, data, config),
             fields(n = data.len(), ci = config.ci, n_resamples = config.bootstrap_samples))]
pub fn bootstrap(
    family: Family,
    parameters: &Parameters,
    data: &[f64],
    config: &FitConfig,
) -> Result<ConfidenceResult> {
    let alpha = config.ci;
    let grid = return_period_grid();
    let requested = config.return_periods.clone();
    let method = config.method;
    let frec = config.frec;

    let statistic = |sample: &[f64]| -> Result<Vec<f64>> {
        let p = fit_parameters(family, method, sample)?;
        let d = p.distribution(family)?;
        let mut out = Vec::with_capacity(3 + grid.len() + requested.len());
        out.extend([p.shape, p.location, p.scale]);
        out.extend(grid.iter().map(|&t| return_level(&d, t, frec)));
        out.extend(requested.iter().map(|&t| return_level(&d, t, frec)));
        Ok(out)
    };

    let mut engine = Bootstrap::new(PercentileBootstrap)
        .with_resampler(Parametric::new(parameters.distribution(family)?))
        .with_resamples(config.bootstrap_samples)
        .with_alpha(alpha);
    if let Some(seed) = config.seed {
        engine = engine.with_seed(seed);
    }
    let result = engine.confidence_intervals(data, statistic)?;

    let intervals = result.intervals;
    if intervals.len() != 3 + grid.len() + requested.len() {
        return Err(Error::Computation(format!(
            "bootstrap returned {} intervals",
            intervals.len()
        )));
    }
    let (head, levels) = intervals.split_at(3);
    let (curve, tail) = levels.split_at(grid.len());

    let shape = match family {
        Family::Gev => head[0],
        Family::Gumbel => ConfidenceInterval::fixed(0.0, 1.0 - alpha),
    };
    Ok(ConfidenceResult {
        alpha,
        method: CiMethod::Bootstrap,
        shape,
        location: head[1],
        scale: head[2],
        standard_errors: None,
        curve: ReturnLevelBand::from_intervals(grid.clone(), curve),
        requested: ReturnLevelBand::from_intervals(requested.clone(), tail),
        diagnostics: result.diagnostics,
    })
}
