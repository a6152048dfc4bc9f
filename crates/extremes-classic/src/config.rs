//! Fit configuration
//!
//! Typed replacements for the keyword configuration of a fit. Every enum
//! also parses from its keyword (`"mle"`, `"lmoments"`, `"mom"`, `"delta"`,
//! `"bootstrap"`), and [`FitConfig::validate`] rejects inconsistent settings
//! before any numeric work starts.

use extremes_confidence::DEFAULT_RESAMPLES;
use extremes_core::return_period::{validate_frec, validate_periods};
use extremes_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distribution family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    Gev,
    Gumbel,
}

impl Family {
    /// Smallest sample every estimator of the family accepts
    pub fn minimum_sample_size(&self) -> usize {
        match self {
            Self::Gev => 3,
            Self::Gumbel => 2,
        }
    }

    /// Number of free parameters
    pub fn n_parameters(&self) -> usize {
        match self {
            Self::Gev => 3,
            Self::Gumbel => 2,
        }
    }
}

impl FromStr for Family {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gev" => Ok(Self::Gev),
            "gumbel" => Ok(Self::Gumbel),
            other => Err(Error::InvalidConfig(format!(
                "unknown distribution family '{other}', expected 'gev' or 'gumbel'"
            ))),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gev => "GEV",
            Self::Gumbel => "Gumbel",
        })
    }
}

/// Point estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FitMethod {
    /// Maximum likelihood
    Mle,
    /// L-moments
    LMoments,
    /// Method of moments
    Moments,
}

impl FitMethod {
    /// Interval strategies valid for this estimator
    ///
    /// The delta method needs a likelihood maximum, so it is limited to MLE.
    pub fn supports(&self, ci_method: CiMethod) -> bool {
        match (self, ci_method) {
            (Self::Mle, _) => true,
            (Self::LMoments | Self::Moments, CiMethod::Bootstrap) => true,
            (Self::LMoments | Self::Moments, CiMethod::Delta) => false,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Mle => "mle",
            Self::LMoments => "lmoments",
            Self::Moments => "mom",
        }
    }
}

impl FromStr for FitMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mle" => Ok(Self::Mle),
            "lmoments" => Ok(Self::LMoments),
            "mom" => Ok(Self::Moments),
            other => Err(Error::InvalidConfig(format!(
                "unknown fit method '{other}', expected 'mle', 'lmoments' or 'mom'"
            ))),
        }
    }
}

impl fmt::Display for FitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Confidence interval strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CiMethod {
    Delta,
    Bootstrap,
}

impl FromStr for CiMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "delta" => Ok(Self::Delta),
            "bootstrap" => Ok(Self::Bootstrap),
            other => Err(Error::InvalidConfig(format!(
                "unknown ci method '{other}', expected 'delta' or 'bootstrap'"
            ))),
        }
    }
}

impl fmt::Display for CiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Delta => "delta",
            Self::Bootstrap => "bootstrap",
        })
    }
}

/// Settings of one fit
///
/// `ci` is the significance level: `0` disables interval estimation,
/// otherwise it must lie in `(0, 1)` and the confidence level is `1 − ci`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    pub method: FitMethod,
    pub ci: f64,
    pub ci_method: Option<CiMethod>,
    pub return_periods: Vec<f64>,
    /// Events per year
    pub frec: f64,
    pub bootstrap_samples: usize,
    pub seed: Option<u64>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self::new(FitMethod::Mle)
    }
}

impl FitConfig {
    pub fn new(method: FitMethod) -> Self {
        Self {
            method,
            ci: 0.0,
            ci_method: None,
            return_periods: Vec::new(),
            frec: 1.0,
            bootstrap_samples: DEFAULT_RESAMPLES,
            seed: None,
        }
    }

    /// Parse the keyword form: `fit_method`, `ci` and optional `ci_method`
    pub fn from_keywords(fit_method: &str, ci: f64, ci_method: Option<&str>) -> Result<Self> {
        let mut config = Self::new(fit_method.parse()?);
        config.ci = ci;
        config.ci_method = ci_method.map(str::parse).transpose()?;
        config.validate()?;
        Ok(config)
    }

    /// Request confidence intervals at significance `ci`
    pub fn with_ci(mut self, ci: f64, ci_method: CiMethod) -> Self {
        self.ci = ci;
        self.ci_method = Some(ci_method);
        self
    }

    pub fn with_return_periods(mut self, periods: impl Into<Vec<f64>>) -> Self {
        self.return_periods = periods.into();
        self
    }

    pub fn with_frec(mut self, frec: f64) -> Self {
        self.frec = frec;
        self
    }

    /// Number of replicates for bootstrap intervals
    pub fn with_bootstrap_samples(mut self, n: usize) -> Self {
        self.bootstrap_samples = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Interval strategy when intervals were requested
    pub fn requested_ci(&self) -> Option<CiMethod> {
        if self.ci == 0.0 {
            None
        } else {
            self.ci_method
        }
    }

    /// Reject inconsistent settings
    pub fn validate(&self) -> Result<()> {
        if !(self.ci == 0.0 || (self.ci > 0.0 && self.ci < 1.0)) {
            return Err(Error::InvalidConfig(format!(
                "ci should be 0 or a value in the interval 0 < ci < 1, got {}",
                self.ci
            )));
        }
        if self.ci > 0.0 {
            match self.ci_method {
                None => {
                    return Err(Error::InvalidConfig(
                        "a ci_method is required when ci is non-zero".to_string(),
                    ))
                }
                Some(ci_method) if !self.method.supports(ci_method) => {
                    return Err(Error::InvalidConfig(format!(
                        "ci_method '{ci_method}' is not available for fit method '{}'",
                        self.method
                    )))
                }
                Some(CiMethod::Bootstrap) if self.bootstrap_samples == 0 => {
                    return Err(Error::InvalidConfig(
                        "bootstrap_samples must be positive".to_string(),
                    ))
                }
                Some(_) => {}
            }
        }
        validate_frec(self.frec)?;
        validate_periods(&self.return_periods)?;
        Ok(())
    }
}
