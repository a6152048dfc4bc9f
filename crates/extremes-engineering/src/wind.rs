//! Extreme wind speeds from the parent Weibull distribution
//!
//! These closed forms estimate the `T`-year extreme of the ten-minute mean
//! wind speed from the long-term mean `vave` and the Weibull shape `k` of the
//! site, following the European Wind Turbine Standards II. `n` is the number
//! of independent ten-minute events per year.

use extremes_core::math::gamma;
use extremes_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub const DEFAULT_RETURN_PERIOD: f64 = 50.0;
pub const DEFAULT_EVENTS_PER_YEAR: f64 = 23037.0;
pub const DEFAULT_VREF_FACTOR: f64 = 5.0;

/// Reference wind speed for turbine classification, `factor · vave`
pub fn vref_from_mean(vave: f64, factor: f64) -> Result<f64> {
    check_positive("mean wind speed", vave)?;
    check_positive("reference factor", factor)?;
    Ok(factor * vave)
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

/// Extreme wind calculator for one site
///
/// # Example
///
/// ```rust
/// use extremes_engineering::ExtremeWind;
///
/// let site = ExtremeWind::new(8.588, 2.156).unwrap();
/// let v50 = site.gumbel().unwrap();
/// assert!((v50 - 33.364).abs() < 0.05);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremeWind {
    vave: f64,
    k: f64,
    return_period: f64,
    events_per_year: f64,
}

impl ExtremeWind {
    /// Site with mean speed `vave` and Weibull shape `k`
    pub fn new(vave: f64, k: f64) -> Result<Self> {
        check_positive("mean wind speed", vave)?;
        check_positive("Weibull shape", k)?;
        Ok(Self {
            vave,
            k,
            return_period: DEFAULT_RETURN_PERIOD,
            events_per_year: DEFAULT_EVENTS_PER_YEAR,
        })
    }

    pub fn with_return_period(mut self, years: f64) -> Self {
        self.return_period = years;
        self
    }

    pub fn with_events_per_year(mut self, n: f64) -> Self {
        self.events_per_year = n;
        self
    }

    pub fn return_period(&self) -> f64 {
        self.return_period
    }

    pub fn events_per_year(&self) -> f64 {
        self.events_per_year
    }

    fn validate(&self) -> Result<()> {
        if !(self.return_period.is_finite() && self.return_period > 1.0) {
            return Err(Error::InvalidConfig(format!(
                "return period must exceed one year, got {}",
                self.return_period
            )));
        }
        if !(self.events_per_year.is_finite() && self.events_per_year > 1.0) {
            return Err(Error::InvalidConfig(format!(
                "events per year must exceed one, got {}",
                self.events_per_year
            )));
        }
        Ok(())
    }

    /// `−ln(−ln(1 − 1/T))`
    fn annual_reduced_variate(&self) -> f64 {
        -(-(-1.0 / self.return_period).ln_1p()).ln()
    }

    /// Exact quantile of the maximum of `n` independent Weibull events
    #[instrument(skip(self), fields(vave = self.vave, k = self.k))]
    pub fn exact(&self) -> Result<f64> {
        self.validate()?;
        let per_event = ((-1.0 / self.return_period).ln_1p() / self.events_per_year).exp();
        let v = self.vave / gamma(1.0 + 1.0 / self.k) * (-(-per_event).ln_1p()).powf(1.0 / self.k);
        debug!(v, "exact extreme wind");
        Ok(v)
    }

    /// Gumbel asymptote of the Weibull maximum
    #[instrument(skip(self), fields(vave = self.vave, k = self.k))]
    pub fn gumbel(&self) -> Result<f64> {
        self.validate()?;
        let (k, ln_n) = (self.k, self.events_per_year.ln());
        let v = self.vave * ln_n.powf(1.0 / k - 1.0) / (k * gamma(1.0 + 1.0 / k))
            * (k * ln_n + self.annual_reduced_variate());
        debug!(v, "Gumbel extreme wind");
        Ok(v)
    }

    /// Gumbel asymptote with Davenport's corrections to mode and dispersion
    #[instrument(skip(self), fields(vave = self.vave, k = self.k))]
    pub fn davenport(&self) -> Result<f64> {
        self.validate()?;
        let (k, ln_n) = (self.k, self.events_per_year.ln());
        let g = gamma(1.0 + 1.0 / k);
        let c1 = 1.0 - (k - 1.0) / (k * ln_n);
        let c2 = 1.0 + (k * g * ln_n.powf(1.0 - 1.0 / k)).ln() / (k * ln_n - k + 1.0);
        let a = ln_n.powf(1.0 / k - 1.0) / (c1 * k * g);
        let b = c1 * c2 * k * ln_n + self.annual_reduced_variate();
        let v = self.vave * a * b;
        debug!(c1, c2, v, "Davenport extreme wind");
        Ok(v)
    }
}
