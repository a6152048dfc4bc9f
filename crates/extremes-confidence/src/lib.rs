//! Confidence interval estimation for extreme value fits
//!
//! This crate provides the two uncertainty strategies used by the fitters:
//!
//! - **Percentile bootstrap**: a generic engine resampling either the data
//!   or a fitted model, with stability diagnostics returned alongside the
//!   intervals
//! - **Delta method**: covariance from the Hessian of the negative
//!   log-likelihood, propagated through smooth functions of the parameters
//!
//! # Examples
//!
//! ## Percentile bootstrap of the sample mean
//!
//! ```rust
//! use extremes_confidence::{Bootstrap, PercentileBootstrap};
//!
//! let sample: Vec<f64> = (1..=50).map(|i| i as f64).collect();
//! let result = Bootstrap::new(PercentileBootstrap)
//!     .with_resamples(500)
//!     .with_alpha(0.05)
//!     .with_seed(42)
//!     .confidence_intervals(&sample, |x| Ok(x.iter().sum::<f64>() / x.len() as f64))
//!     .unwrap();
//! assert!(result.intervals.contains(25.5));
//! assert!(result.diagnostics.is_empty());
//! ```

mod bootstrap;
mod delta;
mod diagnostics;
mod types;

pub use bootstrap::{
    percentile_bootstrap, Bootstrap, BootstrapMethod, BootstrapOutput, BootstrapResult, Ensemble,
    Parametric, PercentileBootstrap, Resampler, WithReplacement, DEFAULT_RESAMPLES,
};
pub use delta::DeltaMethod;
pub use diagnostics::{InstabilitySeverity, InstabilityWarning, NEAR_EXTREMAL_WINDOW};
pub use types::ConfidenceInterval;
