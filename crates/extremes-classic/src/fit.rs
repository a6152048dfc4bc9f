//! Point estimation dispatch over family and fit method

use crate::{lmoments, mle, moments, Family, FitMethod};
use extremes_core::utils::validate_sample;
use extremes_core::{ExtremeValue, Gev, Gumbel, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Fitted parameters; the shape uses the `c` convention and is always `0`
/// for Gumbel fits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    pub shape: f64,
    pub location: f64,
    pub scale: f64,
}

impl Parameters {
    pub fn gev(shape: f64, location: f64, scale: f64) -> Self {
        Self {
            shape,
            location,
            scale,
        }
    }

    pub fn gumbel(location: f64, scale: f64) -> Self {
        Self::gev(0.0, location, scale)
    }

    /// `[("shape", ..), ("location", ..), ("scale", ..)]`
    pub fn ordered(&self) -> [(&'static str, f64); 3] {
        [
            ("shape", self.shape),
            ("location", self.location),
            ("scale", self.scale),
        ]
    }

    /// Look a parameter up by name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.ordered()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// `[shape, location, scale]`
    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.shape, self.location, self.scale]
    }

    /// The free parameters of a family: all three for GEV,
    /// `[location, scale]` for Gumbel
    pub fn free(&self, family: Family) -> Vec<f64> {
        match family {
            Family::Gev => self.to_vec(),
            Family::Gumbel => vec![self.location, self.scale],
        }
    }

    /// Frozen distribution of a family with these parameters
    pub fn distribution(&self, family: Family) -> Result<ExtremeValue> {
        Ok(match family {
            Family::Gev => Gev::new(self.shape, self.location, self.scale)?.into(),
            Family::Gumbel => Gumbel::new(self.location, self.scale)?.into(),
        })
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shape = {:.4}, location = {:.4}, scale = {:.4}",
            self.shape, self.location, self.scale
        )
    }
}

/// Estimate the parameters of `family` from `data` with `method`
///
/// Samples shorter than the family's minimum are rejected before any
/// numeric work.
#[instrument(skip(data), fields(n = data.len()))]
pub fn fit_parameters(family: Family, method: FitMethod, data: &[f64]) -> Result<Parameters> {
    validate_sample(data, family.minimum_sample_size())?;
    match (family, method) {
        (Family::Gev, FitMethod::Mle) => mle::gev(data),
        (Family::Gev, FitMethod::LMoments) => lmoments::gev(data),
        (Family::Gev, FitMethod::Moments) => moments::gev(data),
        (Family::Gumbel, FitMethod::Mle) => mle::gumbel(data),
        (Family::Gumbel, FitMethod::LMoments) => lmoments::gumbel(data),
        (Family::Gumbel, FitMethod::Moments) => moments::gumbel(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use extremes_core::test_data::port_pirie;
    use extremes_core::{Error, ExtremeValueDistribution};

    #[test]
    fn test_parameter_access() {
        let p = Parameters::gev(0.05, 3.87, 0.2);
        assert_eq!(p.ordered()[1], ("location", 3.87));
        assert_eq!(p.get("scale"), Some(0.2));
        assert_eq!(p.get("rate"), None);
        assert_eq!(p.free(Family::Gumbel), vec![3.87, 0.2]);
        assert!(p.to_string().starts_with("shape = 0.0500"));
    }

    #[test]
    fn test_gumbel_shape_is_zero_for_every_method() {
        let data = port_pirie();
        for method in [FitMethod::Mle, FitMethod::LMoments, FitMethod::Moments] {
            let p = fit_parameters(Family::Gumbel, method, &data).unwrap();
            assert_eq!(p.shape, 0.0);
            assert_eq!(p.distribution(Family::Gumbel).unwrap().shape(), 0.0);
        }
    }

    #[test]
    fn test_gumbel_tracks_gev_near_zero_shape() {
        let data = port_pirie();
        let gev = fit_parameters(Family::Gev, FitMethod::Mle, &data).unwrap();
        let gumbel = fit_parameters(Family::Gumbel, FitMethod::Mle, &data).unwrap();
        assert_abs_diff_eq!(gev.location, gumbel.location, epsilon = 0.01);
        assert_abs_diff_eq!(gev.scale, gumbel.scale, epsilon = 0.01);
    }

    #[test]
    fn test_short_samples_rejected() {
        let err = fit_parameters(Family::Gev, FitMethod::LMoments, &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { expected: 3, actual: 2 }));
        assert!(fit_parameters(Family::Gumbel, FitMethod::Mle, &[]).is_err());
        let err = fit_parameters(Family::Gev, FitMethod::Mle, &[1.0, f64::NAN, 2.0]).unwrap_err();
        assert!(err.is_configuration());
    }
}
