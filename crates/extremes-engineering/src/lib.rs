//! Engineering extreme value estimators
//!
//! Regression fits of a Gumbel line to ranked block maxima, as used in wind
//! and structural engineering:
//!
//! - **Lieblein BLUE**: best linear unbiased weights, extended past `n = 16`
//! - **Harris (1996)**: weighted least squares on the means of the reduced
//!   order statistics
//! - **Literature formulas**: 14 plotting positions `P = (i − a)/(N + b)`
//!   fitted by ordinary least squares
//!
//! All three accept a [`Preconditioning`] exponent (2 fits wind speeds as
//! dynamic pressures). The [`wind`] module adds closed-form extreme wind
//! speeds from the parent Weibull distribution.
//!
//! # Example
//!
//! ```rust
//! use extremes_core::test_data::harris_1996;
//! use extremes_engineering::{
//!     Harris1996, Lieblein, PlottingPosition, PlottingPositionEstimator, Preconditioning,
//! };
//!
//! let data = harris_1996();
//! let pressures = Preconditioning::new(2.0).unwrap();
//! let estimators: Vec<Box<dyn PlottingPositionEstimator>> = vec![
//!     Box::new(Lieblein),
//!     Box::new(Harris1996),
//!     Box::new(PlottingPosition::Gringorten),
//! ];
//! for estimator in &estimators {
//!     let fit = estimator.estimate(&data, pressures).unwrap();
//!     assert!((fit.offset - 272.0).abs() < 3.0, "{fit}");
//! }
//! ```

pub mod harris;
pub mod lieblein;
pub mod literature;
mod types;
pub mod wind;

pub use harris::Harris1996;
pub use lieblein::Lieblein;
pub use literature::PlottingPosition;
pub use types::{GoodnessOfFit, PlottingPositionEstimator, PlottingPositionResult, Preconditioning};
pub use wind::{vref_from_mean, ExtremeWind};

pub use extremes_core::{Error, Result};
