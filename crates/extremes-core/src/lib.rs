//! Core types and numerics for extreme value analysis
//!
//! This crate provides the foundation shared by the fitting, confidence and
//! engineering crates:
//!
//! - **Error handling**: one [`Error`] type separating configuration errors
//!   from computation failures
//! - **Distributions**: frozen [`Gev`] and [`Gumbel`] models behind the
//!   [`ExtremeValueDistribution`] trait
//! - **Return periods**: mapping fitted models to return-level tables
//! - **Numerics**: finite differences, BFGS and Nelder–Mead minimizers,
//!   special functions and quadrature
//!
//! # Example
//!
//! ```rust
//! use extremes_core::{return_levels, ExtremeValueDistribution, Gev};
//!
//! let model = Gev::new(0.05, 3.87, 0.198).unwrap();
//! let table = return_levels(&model, &[10.0, 100.0], 1.0).unwrap();
//! assert!(table.levels[1] > table.levels[0]);
//! ```

pub mod distribution;
pub mod error;
pub mod math;
pub mod numdiff;
pub mod optimize;
pub mod return_period;
pub mod test_data;
pub mod utils;

pub use distribution::{gev_skewness, ExtremeValue, ExtremeValueDistribution, Gev, Gumbel};
pub use error::{Error, Result};
pub use optimize::{
    bfgs, nelder_mead, BfgsOptions, NelderMeadOptions, OptimisationResult, TerminationReason,
};
pub use return_period::{
    annual_return_periods, empirical_return_periods, return_level, return_levels,
    return_period_grid, ReturnPeriodTable,
};
