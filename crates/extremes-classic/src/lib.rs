//! Classical GEV and Gumbel fitting
//!
//! This crate fits block maxima with three estimators and quantifies their
//! uncertainty:
//!
//! - **Estimators**: maximum likelihood (BFGS seeded with L-moments for the
//!   GEV, a Newton solve for Gumbel), L-moments and method of moments
//! - **Confidence intervals**: delta method for maximum likelihood fits,
//!   parametric bootstrap for every estimator
//! - **Read interface**: frozen distribution functions, return-level tables
//!   and the data behind P–P, Q–Q and return-level plots
//!
//! The GEV shape is reported in the convention `F(x) = exp(−(1 − c·z)^{1/c})`,
//! i.e. `c = −ξ` of Coles (2001).
//!
//! # Example
//!
//! ```rust
//! use extremes_classic::{CiMethod, Family, FitConfig, FitMethod, FittedModel};
//! use extremes_core::test_data::port_pirie;
//!
//! let config = FitConfig::new(FitMethod::Mle)
//!     .with_ci(0.05, CiMethod::Delta)
//!     .with_return_periods(vec![10.0, 100.0]);
//! let model = FittedModel::fit(&port_pirie(), Family::Gev, &config).unwrap();
//!
//! let ci = model.confidence().unwrap();
//! assert!(ci.location.contains(model.params().location));
//! assert_eq!(ci.requested.len(), 2);
//! ```

pub mod config;
pub mod confidence;
mod fit;
pub mod lmoments;
pub mod mle;
mod model;
pub mod moments;
pub mod plots;

pub use config::{CiMethod, Family, FitConfig, FitMethod};
pub use confidence::{ConfidenceResult, ReturnLevelBand};
pub use fit::{fit_parameters, Parameters};
pub use model::{FittedModel, Moments};
pub use plots::PlotData;

pub use extremes_core::{Error, Result};
