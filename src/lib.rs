//! Extreme value analysis toolkit
//!
//! Facade over the workspace crates:
//!
//! - [`core`]: GEV and Gumbel distributions, optimisers, return periods
//! - [`confidence`]: percentile bootstrap and delta-method intervals
//! - [`classic`]: maximum likelihood, L-moment and moment fits of block maxima
//! - [`engineering`]: plotting-position Gumbel estimators and wind extremes
//!
//! # Example
//!
//! ```rust
//! use extremes::prelude::*;
//! use extremes::core::test_data::port_pirie;
//!
//! let config = FitConfig::new(FitMethod::LMoments).with_return_periods(vec![100.0]);
//! let model = FittedModel::fit(&port_pirie(), Family::Gumbel, &config).unwrap();
//! assert!(model.return_levels().levels[0] > 4.5);
//! ```

pub use extremes_classic as classic;
pub use extremes_confidence as confidence;
pub use extremes_core as core;
pub use extremes_engineering as engineering;

pub use extremes_core::{Error, Result};

/// Commonly used types
pub mod prelude {
    pub use extremes_classic::{
        CiMethod, ConfidenceResult, Family, FitConfig, FitMethod, FittedModel, Parameters,
        ReturnLevelBand,
    };
    pub use extremes_confidence::ConfidenceInterval;
    pub use extremes_core::{ExtremeValue, ExtremeValueDistribution, Gev, Gumbel, ReturnPeriodTable};
    pub use extremes_engineering::{
        ExtremeWind, Harris1996, Lieblein, PlottingPosition, PlottingPositionEstimator,
        PlottingPositionResult, Preconditioning,
    };
    pub use extremes_core::{Error, Result};
}
