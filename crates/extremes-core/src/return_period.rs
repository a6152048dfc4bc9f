//! Mapping between return periods and return levels
//!
//! A return period `T` (years) with `frec` events per year corresponds to the
//! exceedance probability `frec / T` per event, so the return level is
//! `isf(frec / T)`. Periods with `T ≤ frec` have no defined level and map to
//! NaN.

use crate::utils::sorted_descending;
use crate::{Error, ExtremeValueDistribution, Result};
use serde::{Deserialize, Serialize};

/// Number of points in [`return_period_grid`]
pub const GRID_POINTS: usize = 5000;

/// Ordered sequence of (return period, return level) pairs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnPeriodTable {
    pub periods: Vec<f64>,
    pub levels: Vec<f64>,
}

impl ReturnPeriodTable {
    pub fn new(periods: Vec<f64>, levels: Vec<f64>) -> Result<Self> {
        if periods.len() != levels.len() {
            return Err(Error::InvalidInput(format!(
                "{} return periods but {} return levels",
                periods.len(),
                levels.len()
            )));
        }
        Ok(Self { periods, levels })
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Iterate over `(period, level)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.periods.iter().copied().zip(self.levels.iter().copied())
    }

    /// Level for an exact period, if tabulated
    pub fn level_for(&self, period: f64) -> Option<f64> {
        self.iter().find(|(t, _)| *t == period).map(|(_, level)| level)
    }
}

/// Validate an events-per-year rate
pub fn validate_frec(frec: f64) -> Result<()> {
    if !(frec.is_finite() && frec > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "frec must be finite and positive, got {frec}"
        )));
    }
    Ok(())
}

/// Validate user supplied return periods
pub fn validate_periods(periods: &[f64]) -> Result<()> {
    if let Some(bad) = periods.iter().find(|t| !(t.is_finite() && **t > 0.0)) {
        return Err(Error::InvalidConfig(format!(
            "return periods must be finite and positive, got {bad}"
        )));
    }
    Ok(())
}

/// Exceedance probability per event for a return period
pub fn exceedance_probability(period: f64, frec: f64) -> f64 {
    frec / period
}

/// Return level of one period, NaN when `T ≤ frec`
pub fn return_level<D>(distribution: &D, period: f64, frec: f64) -> f64
where
    D: ExtremeValueDistribution + ?Sized,
{
    let q = exceedance_probability(period, frec);
    if q >= 1.0 {
        return f64::NAN;
    }
    distribution.isf(q)
}

/// Return levels of a fitted distribution for the given periods
pub fn return_levels<D>(distribution: &D, periods: &[f64], frec: f64) -> Result<ReturnPeriodTable>
where
    D: ExtremeValueDistribution + ?Sized,
{
    validate_frec(frec)?;
    validate_periods(periods)?;
    let levels = periods
        .iter()
        .map(|&t| return_level(distribution, t, frec))
        .collect();
    Ok(ReturnPeriodTable {
        periods: periods.to_vec(),
        levels,
    })
}

/// Return periods 0.1, 0.2, …, 500.0 years
pub fn return_period_grid() -> Vec<f64> {
    (1..=GRID_POINTS).map(|k| k as f64 / 10.0).collect()
}

/// Whole-year return periods 2..=100 used by the engineering tables
pub fn annual_return_periods() -> Vec<f64> {
    (2..=100).map(|t| t as f64).collect()
}

/// Empirical return periods of an observed sample
///
/// The `k`-th largest observation (1-based) gets `T = frec·N / k`. Levels are
/// the data sorted in decreasing order.
pub fn empirical_return_periods(data: &[f64], frec: f64) -> Result<ReturnPeriodTable> {
    validate_frec(frec)?;
    let n = data.len() as f64;
    let periods = (1..=data.len()).map(|k| frec * n / k as f64).collect();
    Ok(ReturnPeriodTable {
        periods,
        levels: sorted_descending(data),
    })
}
