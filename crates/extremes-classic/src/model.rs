//! Fitted extreme value models
//!
//! [`FittedModel::fit`] validates the configuration, estimates the
//! parameters and, when `ci > 0`, computes the confidence intervals eagerly.
//! The resulting model is immutable.

use crate::confidence::{estimate_confidence, ConfidenceResult};
use crate::plots::{probability_plot, quantile_plot, PlotData};
use crate::{fit_parameters, mle, Family, FitConfig, FitMethod, Parameters};
use extremes_core::{
    empirical_return_periods, return_levels, return_period_grid, ExtremeValue,
    ExtremeValueDistribution, Result, ReturnPeriodTable,
};
use serde::Serialize;
use tracing::{info, instrument};

/// Mean, variance, skewness and excess kurtosis of a fitted model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Moments {
    pub mean: f64,
    pub variance: f64,
    pub skewness: f64,
    pub excess_kurtosis: f64,
}

/// A GEV or Gumbel model fitted to a sample of block maxima
#[derive(Debug, Clone, Serialize)]
pub struct FittedModel {
    family: Family,
    config: FitConfig,
    data: Vec<f64>,
    parameters: Parameters,
    distribution: ExtremeValue,
    return_levels: ReturnPeriodTable,
    confidence: Option<ConfidenceResult>,
}

impl FittedModel {
    /// Fit `family` to `data` as configured
    ///
    /// Configuration errors are raised before any numeric work.
    #[instrument(skip(data, config), fields(n = data.len(), method = %config.method))]
    pub fn fit(data: &[f64], family: Family, config: &FitConfig) -> Result<Self> {
        config.validate()?;
        let parameters = fit_parameters(family, config.method, data)?;
        let distribution = parameters.distribution(family)?;
        info!(%parameters, "fitted {}", family);

        let return_levels = return_levels(&distribution, &config.return_periods, config.frec)?;
        let confidence = estimate_confidence(family, &parameters, data, config)?;

        Ok(Self {
            family,
            config: config.clone(),
            data: data.to_vec(),
            parameters,
            distribution,
            return_levels,
            confidence,
        })
    }

    /// GEV fit with the default configuration for `method`
    pub fn gev(data: &[f64], method: FitMethod) -> Result<Self> {
        Self::fit(data, Family::Gev, &FitConfig::new(method))
    }

    /// Gumbel fit with the default configuration for `method`
    pub fn gumbel(data: &[f64], method: FitMethod) -> Result<Self> {
        Self::fit(data, Family::Gumbel, &FitConfig::new(method))
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn fit_method(&self) -> FitMethod {
        self.config.method
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn params(&self) -> &Parameters {
        &self.parameters
    }

    /// Frozen distribution
    pub fn distribution(&self) -> &ExtremeValue {
        &self.distribution
    }

    pub fn pdf(&self, x: f64) -> f64 {
        self.distribution.pdf(x)
    }

    pub fn cdf(&self, x: f64) -> f64 {
        self.distribution.cdf(x)
    }

    pub fn sf(&self, x: f64) -> f64 {
        self.distribution.sf(x)
    }

    pub fn ppf(&self, q: f64) -> f64 {
        self.distribution.ppf(q)
    }

    pub fn isf(&self, q: f64) -> f64 {
        self.distribution.isf(q)
    }

    pub fn stats(&self) -> Moments {
        Moments {
            mean: self.distribution.mean(),
            variance: self.distribution.variance(),
            skewness: self.distribution.skewness(),
            excess_kurtosis: self.distribution.excess_kurtosis(),
        }
    }

    /// Negative log-likelihood of the sample at `parameters`; the shape is
    /// ignored for Gumbel models
    pub fn negative_log_likelihood(&self, parameters: &Parameters) -> f64 {
        match self.family {
            Family::Gev => mle::gev_nnlf(&self.data, &parameters.to_vec()),
            Family::Gumbel => {
                mle::gumbel_nnlf(&self.data, &[parameters.location, parameters.scale])
            }
        }
    }

    /// Return levels of the configured return periods
    pub fn return_levels(&self) -> &ReturnPeriodTable {
        &self.return_levels
    }

    pub fn confidence(&self) -> Option<&ConfidenceResult> {
        self.confidence.as_ref()
    }

    /// Observed sample placed at its empirical return periods
    pub fn empirical_return_periods(&self) -> Result<ReturnPeriodTable> {
        empirical_return_periods(&self.data, self.config.frec)
    }

    /// Model return levels on the 0.1–500 year grid
    pub fn return_level_curve(&self) -> Result<ReturnPeriodTable> {
        return_levels(&self.distribution, &return_period_grid(), self.config.frec)
    }

    pub fn probability_plot(&self) -> PlotData {
        probability_plot(&self.distribution, &self.data)
    }

    pub fn quantile_plot(&self) -> PlotData {
        quantile_plot(&self.distribution, &self.data)
    }
}
