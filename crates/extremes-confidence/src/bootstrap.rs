//! Percentile bootstrap engine
//!
//! The engine draws `n` replicate samples of the input's length, evaluates a
//! statistic on each, and reads the interval off the sorted replicate
//! ensemble. Replicates come either from resampling the data with
//! replacement ([`WithReplacement`]) or from a fitted model
//! ([`Parametric`]). Scalar and vector statistics are both supported; vector
//! statistics get one interval per output dimension.
//!
//! A master `StdRng` seeded from the run's seed draws one seed per
//! replicate up front, and each replicate runs on its own `StdRng`. A seeded
//! run gives identical results with and without the `parallel` feature.
//!
//! A replicate whose statistic fails is dropped from the ensemble and
//! reported in the result's diagnostics. The run fails only when every
//! replicate fails.

use crate::{ConfidenceInterval, InstabilityWarning};
use extremes_core::{Error, ExtremeValueDistribution, Result};
use rand::prelude::*;
use tracing::{debug, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default number of bootstrap replicates
pub const DEFAULT_RESAMPLES: usize = 500;

/// How an interval is read from an ensemble of replicate statistics
pub trait BootstrapMethod: Clone + Send + Sync {
    /// Calculate a confidence interval from replicate estimates
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        alpha: f64,
    ) -> Result<ConfidenceInterval>;

    /// Stability warnings for an ensemble of `n_resamples` replicates
    fn diagnostics(&self, _n_resamples: usize, _alpha: f64) -> Option<InstabilityWarning> {
        None
    }

    /// Method name for documentation
    fn name(&self) -> &'static str;
}

/// Empirical percentile interval
///
/// Bounds are the sorted replicates at `round((n − 1)·α/2)` and
/// `round((n − 1)·(1 − α/2))`, rounding half to even.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentileBootstrap;

impl PercentileBootstrap {
    /// Lower and upper indices into the sorted ensemble
    pub fn indices(n_resamples: usize, alpha: f64) -> (usize, usize) {
        let last = n_resamples.saturating_sub(1) as f64;
        let lower = (last * alpha / 2.0).round_ties_even() as usize;
        let upper = (last * (1.0 - alpha / 2.0)).round_ties_even() as usize;
        (lower, upper)
    }
}

impl BootstrapMethod for PercentileBootstrap {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        alpha: f64,
    ) -> Result<ConfidenceInterval> {
        if bootstrap_estimates.is_empty() {
            return Err(Error::InvalidInput("No bootstrap estimates".to_string()));
        }

        let mut sorted = bootstrap_estimates.to_vec();
        sorted.sort_by(f64::total_cmp);

        let (lower_idx, upper_idx) = Self::indices(sorted.len(), alpha);

        Ok(ConfidenceInterval::new(
            sorted[lower_idx],
            sorted[upper_idx],
            original_estimate,
            1.0 - alpha,
        ))
    }

    fn diagnostics(&self, n_resamples: usize, alpha: f64) -> Option<InstabilityWarning> {
        let (lower, upper) = Self::indices(n_resamples, alpha);
        InstabilityWarning::check(lower, upper, n_resamples)
    }

    fn name(&self) -> &'static str {
        "Percentile Bootstrap"
    }
}

/// Source of replicate samples
pub trait Resampler: Send + Sync {
    /// Draw one replicate of the same length as `data`
    fn resample(&self, data: &[f64], rng: &mut StdRng) -> Vec<f64>;
}

/// Resample the observed data with replacement
#[derive(Debug, Clone, Copy, Default)]
pub struct WithReplacement;

impl Resampler for WithReplacement {
    fn resample(&self, data: &[f64], rng: &mut StdRng) -> Vec<f64> {
        (0..data.len())
            .map(|_| data[rng.gen_range(0..data.len())])
            .collect()
    }
}

/// Draw replicates from a fitted model
#[derive(Debug, Clone, Copy)]
pub struct Parametric<D> {
    distribution: D,
}

impl<D> Parametric<D> {
    pub fn new(distribution: D) -> Self {
        Self { distribution }
    }
}

impl<D> Resampler for Parametric<D>
where
    D: ExtremeValueDistribution + Send + Sync,
{
    fn resample(&self, data: &[f64], rng: &mut StdRng) -> Vec<f64> {
        self.distribution.sample(rng, data.len())
    }
}

/// Types a bootstrap statistic may return
pub trait BootstrapOutput: Clone + Send {
    /// One interval for scalars, one per dimension for vectors
    type Intervals: Clone + std::fmt::Debug;

    fn calculate_intervals<M: BootstrapMethod>(
        method: &M,
        bootstrap_estimates: &[Self],
        original: &Self,
        alpha: f64,
    ) -> Result<Self::Intervals>;
}

impl BootstrapOutput for f64 {
    type Intervals = ConfidenceInterval;

    fn calculate_intervals<M: BootstrapMethod>(
        method: &M,
        bootstrap_estimates: &[Self],
        original: &Self,
        alpha: f64,
    ) -> Result<Self::Intervals> {
        method.calculate_interval(bootstrap_estimates, *original, alpha)
    }
}

impl BootstrapOutput for Vec<f64> {
    type Intervals = Vec<ConfidenceInterval>;

    fn calculate_intervals<M: BootstrapMethod>(
        method: &M,
        bootstrap_estimates: &[Self],
        original: &Self,
        alpha: f64,
    ) -> Result<Self::Intervals> {
        // Transpose bootstrap estimates
        let n_values = original.len();
        let mut transposed = vec![Vec::with_capacity(bootstrap_estimates.len()); n_values];

        for estimates in bootstrap_estimates {
            if estimates.len() != n_values {
                return Err(Error::Computation(format!(
                    "Replicate statistic has {} values, expected {}",
                    estimates.len(),
                    n_values
                )));
            }
            for (column, &value) in transposed.iter_mut().zip(estimates) {
                column.push(value);
            }
        }

        transposed
            .iter()
            .zip(original)
            .map(|(column, &orig)| method.calculate_interval(column, orig, alpha))
            .collect()
    }
}

/// Replicate statistics of one run
#[derive(Debug, Clone)]
pub struct Ensemble<O> {
    /// Statistics of the successful replicates, in replicate order
    pub values: Vec<O>,
    /// Replicates whose statistic returned an error
    pub failed: usize,
}

/// Result of a bootstrap run
#[derive(Debug, Clone)]
pub struct BootstrapResult<T: BootstrapOutput> {
    /// The confidence interval(s)
    pub intervals: T::Intervals,
    /// Statistic evaluated on the original sample
    pub estimates: T,
    /// Number of bootstrap resamples drawn
    pub n_resamples: usize,
    /// Resamples dropped because the statistic failed on them
    pub failed: usize,
    /// Stability warnings; empty when the interval is well supported
    pub diagnostics: Vec<InstabilityWarning>,
}

/// Bootstrap engine
///
/// Builder settings are validated when the engine runs.
#[derive(Debug, Clone)]
pub struct Bootstrap<M, S = WithReplacement> {
    method: M,
    resampler: S,
    n_resamples: usize,
    alpha: f64,
    seed: Option<u64>,
}

impl<M: BootstrapMethod> Bootstrap<M, WithReplacement> {
    /// Create a new engine resampling the data with replacement
    pub fn new(method: M) -> Self {
        Self {
            method,
            resampler: WithReplacement,
            n_resamples: DEFAULT_RESAMPLES,
            alpha: 0.05,
            seed: None,
        }
    }
}

impl<M, S> Bootstrap<M, S>
where
    M: BootstrapMethod,
    S: Resampler,
{
    /// Replace the source of replicate samples
    pub fn with_resampler<R: Resampler>(self, resampler: R) -> Bootstrap<M, R> {
        Bootstrap {
            method: self.method,
            resampler,
            n_resamples: self.n_resamples,
            alpha: self.alpha,
            seed: self.seed,
        }
    }

    /// Set the number of bootstrap resamples
    pub fn with_resamples(mut self, n_resamples: usize) -> Self {
        self.n_resamples = n_resamples;
        self
    }

    /// Set the significance level; the confidence level is `1 − alpha`
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn n_resamples(&self) -> usize {
        self.n_resamples
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    fn validate(&self) -> Result<()> {
        if self.n_resamples == 0 {
            return Err(Error::InvalidConfig(
                "Number of resamples must be positive".to_string(),
            ));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        Ok(())
    }

    /// One seed per replicate, drawn from a master generator
    fn replicate_seeds(&self) -> Vec<u64> {
        let seed = self.seed.unwrap_or_else(|| thread_rng().gen());
        let mut master = StdRng::seed_from_u64(seed);
        (0..self.n_resamples).map(|_| master.gen()).collect()
    }

    fn replicate<O, F>(&self, sample: &[f64], statistic: &F, seed: u64) -> Result<O>
    where
        F: Fn(&[f64]) -> Result<O>,
    {
        let mut rng = StdRng::seed_from_u64(seed);
        let resampled = self.resampler.resample(sample, &mut rng);
        statistic(&resampled)
    }

    /// Evaluate the statistic on every replicate
    ///
    /// Failed replicates are counted and left out of the ensemble. If none
    /// succeeds, the first failure is returned.
    pub fn replicates<O, F>(&self, sample: &[f64], statistic: &F) -> Result<Ensemble<O>>
    where
        O: Send,
        F: Fn(&[f64]) -> Result<O> + Sync,
    {
        let seeds = self.replicate_seeds();
        debug!(
            "Evaluating {} bootstrap replicates of size {}",
            self.n_resamples,
            sample.len()
        );

        #[cfg(feature = "parallel")]
        let outcomes: Vec<Result<O>> = seeds
            .par_iter()
            .map(|&seed| self.replicate(sample, statistic, seed))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<Result<O>> = seeds
            .iter()
            .map(|&seed| self.replicate(sample, statistic, seed))
            .collect();

        let mut values = Vec::with_capacity(outcomes.len());
        let mut first_error = None;
        let mut failed = 0;
        for outcome in outcomes {
            match outcome {
                Ok(value) => values.push(value),
                Err(err) => {
                    failed += 1;
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }
        if let Some(err) = first_error {
            if values.is_empty() {
                return Err(err);
            }
            warn!(failed, n_resamples = self.n_resamples, %err, "bootstrap replicates dropped");
        }
        Ok(Ensemble { values, failed })
    }

    /// Compute percentile confidence intervals for a statistic
    ///
    /// This is the main entry point. The statistic is evaluated once on the
    /// original sample and once per replicate.
    #[instrument(skip(self, sample, statistic),
                 fields(n = sample.len(), n_resamples = self.n_resamples, alpha = self.alpha))]
    pub fn confidence_intervals<O, F>(
        &self,
        sample: &[f64],
        statistic: F,
    ) -> Result<BootstrapResult<O>>
    where
        O: BootstrapOutput,
        F: Fn(&[f64]) -> Result<O> + Sync,
    {
        self.validate()?;
        if sample.is_empty() {
            return Err(Error::empty_input());
        }

        let estimates = statistic(sample)?;
        let ensemble = self.replicates(sample, &statistic)?;

        debug!("Bootstrap completed, calculating confidence intervals");
        let intervals =
            O::calculate_intervals(&self.method, &ensemble.values, &estimates, self.alpha)?;

        let mut diagnostics: Vec<_> = self
            .method
            .diagnostics(ensemble.values.len(), self.alpha)
            .into_iter()
            .collect();
        if ensemble.failed > 0 {
            diagnostics.push(InstabilityWarning::dropped(ensemble.failed, self.n_resamples));
        }
        for warning in &diagnostics {
            warn!("{}", warning);
        }

        Ok(BootstrapResult {
            intervals,
            estimates,
            n_resamples: self.n_resamples,
            failed: ensemble.failed,
            diagnostics,
        })
    }
}

/// Percentile bootstrap with resampling of the data, as a single call
pub fn percentile_bootstrap<O, F>(
    sample: &[f64],
    statistic: F,
    alpha: f64,
    n_resamples: usize,
    seed: Option<u64>,
) -> Result<BootstrapResult<O>>
where
    O: BootstrapOutput,
    F: Fn(&[f64]) -> Result<O> + Sync,
{
    let mut bootstrap = Bootstrap::new(PercentileBootstrap)
        .with_resamples(n_resamples)
        .with_alpha(alpha);
    if let Some(seed) = seed {
        bootstrap = bootstrap.with_seed(seed);
    }
    bootstrap.confidence_intervals(sample, statistic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InstabilitySeverity;
    use extremes_core::utils::mean;
    use extremes_core::Gumbel;

    fn mean_statistic(x: &[f64]) -> Result<f64> {
        Ok(mean(x))
    }

    #[test]
    fn test_bootstrap_construction() {
        let bootstrap = Bootstrap::new(PercentileBootstrap)
            .with_resamples(1000)
            .with_alpha(0.1)
            .with_seed(42);

        assert_eq!(bootstrap.n_resamples, 1000);
        assert_eq!(bootstrap.alpha, 0.1);
        assert_eq!(bootstrap.seed, Some(42));
    }

    #[test]
    fn test_percentile_indices_round_half_even() {
        // (n - 1) * alpha / 2 = 12.475 and 486.525
        assert_eq!(PercentileBootstrap::indices(500, 0.05), (12, 487));
        // 0.5 rounds to 0, 1.5 rounds to 2
        assert_eq!(PercentileBootstrap::indices(3, 0.5), (0, 2));
        assert_eq!(PercentileBootstrap::indices(1, 0.05), (0, 0));
    }

    #[test]
    fn test_invalid_configuration() {
        let err = Bootstrap::new(PercentileBootstrap)
            .with_resamples(0)
            .confidence_intervals(&[1.0, 2.0], mean_statistic)
            .unwrap_err();
        assert!(err.is_configuration());

        let err = Bootstrap::new(PercentileBootstrap)
            .with_alpha(1.5)
            .confidence_intervals(&[1.0, 2.0], mean_statistic)
            .unwrap_err();
        assert!(err.is_configuration());

        let err = Bootstrap::new(PercentileBootstrap)
            .confidence_intervals(&[], mean_statistic)
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let data: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin()).collect();
        let bootstrap = Bootstrap::new(PercentileBootstrap).with_resamples(200).with_seed(7);
        let a = bootstrap.confidence_intervals(&data, mean_statistic).unwrap();
        let b = bootstrap.confidence_intervals(&data, mean_statistic).unwrap();
        assert_eq!(a.intervals, b.intervals);
    }

    #[test]
    fn test_vector_statistic_gives_one_interval_per_dimension() {
        let data: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        let result = Bootstrap::new(PercentileBootstrap)
            .with_resamples(300)
            .with_seed(1)
            .confidence_intervals(&data, |x| {
                let m = mean(x);
                Ok(vec![m, 2.0 * m, -m])
            })
            .unwrap();
        assert_eq!(result.intervals.len(), 3);
        let [a, b, c] = [result.intervals[0], result.intervals[1], result.intervals[2]];
        assert!((b.lower - 2.0 * a.lower).abs() < 1e-9);
        assert!((b.upper - 2.0 * a.upper).abs() < 1e-9);
        // sorting happens per dimension, so the negated column flips
        assert!((c.lower + a.upper).abs() < 1e-9);
        assert!(a.brackets_estimate());
    }

    #[test]
    fn test_neighbouring_seeds_give_independent_runs() {
        let data: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin()).collect();
        let run = |seed: u64| {
            Bootstrap::new(PercentileBootstrap)
                .with_resamples(200)
                .with_seed(seed)
                .replicates(&data, &mean_statistic)
                .unwrap()
                .values
        };
        let (a, b) = (run(0), run(1));
        // no replicate of one run reappears in the other
        assert!(a.iter().all(|x| !b.contains(x)));

        let interval = |seed: u64| {
            percentile_bootstrap(&data, mean_statistic, 0.05, 500, Some(seed))
                .unwrap()
                .intervals
        };
        assert_ne!(interval(0), interval(1));
    }

    #[test]
    fn test_every_replicate_failing_propagates() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let err = Bootstrap::new(PercentileBootstrap)
            .with_resamples(50)
            .with_seed(3)
            .confidence_intervals(&data, |x| {
                if x.as_ptr() == data.as_ptr() {
                    Ok(0.0)
                } else {
                    Err(Error::Computation("replicate failed".to_string()))
                }
            })
            .unwrap_err();
        assert!(err.is_computation());
    }

    #[test]
    fn test_failed_replicates_are_dropped_and_reported() {
        let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        // fails on about a quarter of the resamples
        let fragile = |x: &[f64]| {
            if x.iter().filter(|&&v| v == 1.0).count() >= 2 {
                Err(Error::Computation("degenerate replicate".to_string()))
            } else {
                Ok(mean(x))
            }
        };
        let result = Bootstrap::new(PercentileBootstrap)
            .with_resamples(300)
            .with_seed(9)
            .confidence_intervals(&data, fragile)
            .unwrap();
        assert!(result.failed > 0 && result.failed < 300);
        assert_eq!(result.n_resamples, 300);
        let dropped: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|w| w.severity == InstabilitySeverity::DroppedReplicates)
            .collect();
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].dropped, result.failed);
        assert!(result.intervals.lower < result.intervals.upper);
    }

    #[test]
    fn test_diagnostics_fire_for_small_ensembles() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = percentile_bootstrap(&data, mean_statistic, 0.05, 20, Some(11)).unwrap();
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].severity, InstabilitySeverity::Extremal);

        let result = percentile_bootstrap(&data, mean_statistic, 0.05, 500, Some(11)).unwrap();
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_parametric_resampler_uses_model() {
        let model = Gumbel::new(100.0, 1.0).unwrap();
        let data = [0.0; 30];
        let result = Bootstrap::new(PercentileBootstrap)
            .with_resampler(Parametric::new(model))
            .with_resamples(200)
            .with_seed(5)
            .confidence_intervals(&data, mean_statistic)
            .unwrap();
        // replicates come from the model, not the zero-valued data
        assert!(result.intervals.lower > 99.0);
        assert_eq!(result.estimates, 0.0);
    }
}
