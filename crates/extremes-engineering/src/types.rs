//! Result types shared by the plotting-position estimators

use extremes_core::{annual_return_periods, Error, Gumbel, Result, ReturnPeriodTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exponent applied to the data before fitting and inverted afterwards
///
/// With exponent 2, wind speeds are fitted as dynamic pressures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preconditioning(f64);

impl Preconditioning {
    /// Reject non-finite and zero exponents
    pub fn new(exponent: f64) -> Result<Self> {
        if !(exponent.is_finite() && exponent != 0.0) {
            return Err(Error::InvalidConfig(format!(
                "preconditioning exponent must be finite and non-zero, got {exponent}"
            )));
        }
        Ok(Self(exponent))
    }

    pub fn exponent(&self) -> f64 {
        self.0
    }

    pub fn apply(&self, x: f64) -> f64 {
        x.powf(self.0)
    }

    pub fn invert(&self, x: f64) -> f64 {
        x.powf(1.0 / self.0)
    }

    /// Transform a sorted sample, failing on values the exponent cannot map
    pub(crate) fn transform(&self, data: &[f64]) -> Result<Vec<f64>> {
        let out: Vec<f64> = data.iter().map(|&x| self.apply(x)).collect();
        if out.iter().any(|x| !x.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "preconditioning exponent {} produced non-finite values",
                self.0
            )));
        }
        Ok(out)
    }
}

impl Default for Preconditioning {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Fit-quality figures; each estimator fills in the ones it defines
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GoodnessOfFit {
    /// Squared correlation of data and reduced variate (literature formulas)
    pub r_squared: Option<f64>,
    /// Inverse of the fitted slope (Harris 1996)
    pub alpha: Option<f64>,
    /// `α·Σwᵢxᵢ − Σwᵢyᵢ` (Harris 1996)
    pub characteristic_product: Option<f64>,
    /// Weighted residual standard deviation with `N − 2` degrees of freedom
    /// (Harris 1996, `None` when `N ≤ 2`)
    pub residual_std_dev: Option<f64>,
}

/// Gumbel fit produced by a plotting-position estimator
///
/// `data`, `slope` and `offset` live in the preconditioned space; return
/// levels are transformed back to the original units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlottingPositionResult {
    pub method: String,
    pub preconditioning: Preconditioning,
    /// Transformed sample in the order the estimator used it
    pub data: Vec<f64>,
    /// Reduced variate `Y` paired with `data`
    pub reduced_variate: Vec<f64>,
    pub weights: Option<Vec<f64>>,
    pub slope: f64,
    pub offset: f64,
    /// Return levels for `T = 2..=100` years
    pub return_levels: ReturnPeriodTable,
    pub goodness_of_fit: GoodnessOfFit,
    pub distribution: Gumbel,
}

impl PlottingPositionResult {
    /// Gumbel location (the mode) in the preconditioned space
    pub fn location(&self) -> f64 {
        self.offset
    }

    /// Gumbel scale in the preconditioned space
    pub fn scale(&self) -> f64 {
        self.slope
    }

    pub(crate) fn build(
        method: impl Into<String>,
        preconditioning: Preconditioning,
        data: Vec<f64>,
        reduced_variate: Vec<f64>,
        slope: f64,
        offset: f64,
    ) -> Result<Self> {
        let distribution = Gumbel::new(offset, slope).map_err(|e| {
            Error::Computation(format!("fitted line does not define a Gumbel model: {e}"))
        })?;
        let periods = annual_return_periods();
        let levels = periods
            .iter()
            .map(|&t| preconditioning.invert(offset - slope * (-(-1.0 / t).ln_1p()).ln()))
            .collect();
        Ok(Self {
            method: method.into(),
            preconditioning,
            data,
            reduced_variate,
            weights: None,
            slope,
            offset,
            return_levels: ReturnPeriodTable::new(periods, levels)?,
            goodness_of_fit: GoodnessOfFit::default(),
            distribution,
        })
    }
}

impl fmt::Display for PlottingPositionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: offset = {:.4}, slope = {:.4}",
            self.method, self.offset, self.slope
        )
    }
}

/// A regression-based Gumbel estimator
pub trait PlottingPositionEstimator {
    /// Method name reported in results
    fn name(&self) -> String;

    /// Fit a Gumbel line to `data` (at least two values)
    fn estimate(
        &self,
        data: &[f64],
        preconditioning: Preconditioning,
    ) -> Result<PlottingPositionResult>;
}
