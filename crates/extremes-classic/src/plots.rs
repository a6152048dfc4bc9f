//! Numeric data behind diagnostic plots
//!
//! Both plots pair the sorted sample with plotting positions `i / (N + 1)`.

use extremes_core::utils::sorted;
use extremes_core::ExtremeValueDistribution;
use serde::{Deserialize, Serialize};

/// Paired model and empirical coordinates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    pub model: Vec<f64>,
    pub empirical: Vec<f64>,
}

impl PlotData {
    pub fn len(&self) -> usize {
        self.model.len()
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.model.iter().copied().zip(self.empirical.iter().copied())
    }
}

fn plotting_positions(n: usize) -> Vec<f64> {
    (1..=n).map(|i| i as f64 / (n as f64 + 1.0)).collect()
}

/// P–P plot: model CDF of the sorted data against `i / (N + 1)`
pub fn probability_plot<D>(distribution: &D, data: &[f64]) -> PlotData
where
    D: ExtremeValueDistribution + ?Sized,
{
    PlotData {
        model: sorted(data).iter().map(|&x| distribution.cdf(x)).collect(),
        empirical: plotting_positions(data.len()),
    }
}

/// Q–Q plot: model quantiles at `i / (N + 1)` against the sorted data
pub fn quantile_plot<D>(distribution: &D, data: &[f64]) -> PlotData
where
    D: ExtremeValueDistribution + ?Sized,
{
    PlotData {
        model: plotting_positions(data.len())
            .into_iter()
            .map(|p| distribution.ppf(p))
            .collect(),
        empirical: sorted(data),
    }
}
