//! Plotting-position formulas from the literature
//!
//! Each formula assigns the `i`-th smallest of `N` values the probability
//! `P = (i − a) / (N + b)`. The Gumbel line is the least-squares regression
//! of the data on the reduced variate `Y = −ln(−ln P)`.

use crate::{PlottingPositionEstimator, PlottingPositionResult, Preconditioning};
use extremes_core::utils::{correlation, mean, sorted, validate_sample};
use extremes_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// A literature plotting-position formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlottingPosition {
    Adamowski,
    Beard,
    Blom,
    Chegodayev,
    Cunnane,
    Gringorten,
    Hazen,
    Hirsch,
    Iec56,
    Landwehr,
    Laplace,
    McClungMears,
    Tukey,
    Weibull,
}

impl PlottingPosition {
    pub const ALL: [PlottingPosition; 14] = [
        Self::Adamowski,
        Self::Beard,
        Self::Blom,
        Self::Chegodayev,
        Self::Cunnane,
        Self::Gringorten,
        Self::Hazen,
        Self::Hirsch,
        Self::Iec56,
        Self::Landwehr,
        Self::Laplace,
        Self::McClungMears,
        Self::Tukey,
        Self::Weibull,
    ];

    /// Coefficients `(a, b)` of `P = (i − a) / (N + b)`
    pub fn coefficients(&self) -> (f64, f64) {
        match self {
            Self::Adamowski => (0.25, 0.5),
            Self::Beard => (0.31, 0.38),
            Self::Blom => (0.375, 0.25),
            Self::Chegodayev => (0.3, 0.4),
            Self::Cunnane => (0.4, 0.2),
            Self::Gringorten => (0.44, 0.12),
            Self::Hazen => (0.5, 0.0),
            Self::Hirsch => (-0.5, 1.0),
            Self::Iec56 => (0.5, 0.25),
            Self::Landwehr => (0.35, 0.0),
            Self::Laplace => (-1.0, 2.0),
            Self::McClungMears => (0.4, 0.0),
            Self::Tukey => (1.0 / 3.0, 1.0 / 3.0),
            Self::Weibull => (0.0, 1.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Adamowski => "Adamowski",
            Self::Beard => "Beard",
            Self::Blom => "Blom",
            Self::Chegodayev => "Chegodayev",
            Self::Cunnane => "Cunnane",
            Self::Gringorten => "Gringorten",
            Self::Hazen => "Hazen",
            Self::Hirsch => "Hirsch",
            Self::Iec56 => "IEC56",
            Self::Landwehr => "Landwehr",
            Self::Laplace => "Laplace",
            Self::McClungMears => "McClung and Mears",
            Self::Tukey => "Tukey",
            Self::Weibull => "Weibull",
        }
    }

    /// Non-exceedance probabilities of ranks `1..=n`
    pub fn probabilities(&self, n: usize) -> Vec<f64> {
        let (a, b) = self.coefficients();
        (1..=n).map(|i| (i as f64 - a) / (n as f64 + b)).collect()
    }
}

impl FromStr for PlottingPosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::InvalidConfig(format!("unknown plotting-position formula '{s}'"))
            })
    }
}

impl fmt::Display for PlottingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl PlottingPositionEstimator for PlottingPosition {
    fn name(&self) -> String {
        self.to_string()
    }

    #[instrument(skip(self, data), fields(formula = %self, n = data.len()))]
    fn estimate(
        &self,
        data: &[f64],
        preconditioning: Preconditioning,
    ) -> Result<PlottingPositionResult> {
        validate_sample(data, 2)?;
        let x = preconditioning.transform(&sorted(data))?;

        let y: Vec<f64> = self
            .probabilities(x.len())
            .into_iter()
            .map(|p| -(-p.ln()).ln())
            .collect();
        let (mx, my) = (mean(&x), mean(&y));
        let (sxy, syy) = x.iter().zip(&y).fold((0.0, 0.0), |(sxy, syy), (xi, yi)| {
            (sxy + (xi - mx) * (yi - my), syy + (yi - my) * (yi - my))
        });
        let slope = sxy / syy;
        let offset = mx - slope * my;
        let r = correlation(&x, &y);
        debug!(slope, offset, r_squared = r * r, "least squares");

        let mut result =
            PlottingPositionResult::build(self.to_string(), preconditioning, x, y, slope, offset)?;
        result.goodness_of_fit.r_squared = Some(r * r);
        Ok(result)
    }
}
