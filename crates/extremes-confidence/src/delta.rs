//! Delta-method (asymptotic normal) intervals
//!
//! The covariance of a maximum likelihood estimate is the inverse of the
//! Hessian of the negative log-likelihood at the optimum. Standard errors are
//! the square roots of its diagonal, and a smooth function `g(θ)` of the
//! parameters gets variance `∇gᵀ·Σ·∇g`.

use crate::ConfidenceInterval;
use extremes_core::math::normal_quantile;
use extremes_core::numdiff::hessian;
use extremes_core::{Error, Result};
use nalgebra::{DMatrix, DVector};
use tracing::{debug, instrument};

/// Parameter covariance of a maximum likelihood fit
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaMethod {
    parameters: Vec<f64>,
    covariance: DMatrix<f64>,
}

impl DeltaMethod {
    /// Build from a known covariance matrix
    pub fn from_covariance(parameters: Vec<f64>, covariance: DMatrix<f64>) -> Result<Self> {
        let n = parameters.len();
        if covariance.nrows() != n || covariance.ncols() != n {
            return Err(Error::InvalidInput(format!(
                "Covariance is {}x{} but there are {} parameters",
                covariance.nrows(),
                covariance.ncols(),
                n
            )));
        }
        Ok(Self {
            parameters,
            covariance,
        })
    }

    /// Invert the numerical Hessian of `nnlf` at the fitted parameters
    #[instrument(skip(nnlf), fields(n_parameters = parameters.len()))]
    pub fn from_negative_log_likelihood<F>(nnlf: F, parameters: &[f64]) -> Result<Self>
    where
        F: Fn(&[f64]) -> f64,
    {
        if !nnlf(parameters).is_finite() {
            return Err(Error::Computation(
                "Negative log-likelihood is not finite at the fitted parameters".to_string(),
            ));
        }
        let h = hessian(&nnlf, parameters);
        if h.iter().any(|v| !v.is_finite()) {
            return Err(Error::Computation(
                "Hessian of the negative log-likelihood is not finite".to_string(),
            ));
        }
        debug!(?h, "observed information");
        let covariance = h.try_inverse().ok_or_else(|| {
            Error::SingularMatrix("Hessian of the negative log-likelihood".to_string())
        })?;
        Self::from_covariance(parameters.to_vec(), covariance)
    }

    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }

    /// Square roots of the covariance diagonal
    ///
    /// A non-positive variance means the fit is not at a likelihood maximum.
    pub fn standard_errors(&self) -> Result<Vec<f64>> {
        self.covariance
            .diagonal()
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                if v > 0.0 && v.is_finite() {
                    Ok(v.sqrt())
                } else {
                    Err(Error::Computation(format!(
                        "Variance of parameter {i} is {v}; the Hessian is not positive definite"
                    )))
                }
            })
            .collect()
    }

    /// Standard error of `g(θ)` given its gradient at the fitted parameters
    ///
    /// NaN when the gradient is undefined.
    pub fn propagate(&self, gradient: &[f64]) -> f64 {
        let g = DVector::from_column_slice(gradient);
        let variance = (g.transpose() * &self.covariance * &g)[(0, 0)];
        variance.sqrt()
    }

    /// Two-sided normal interval `estimate ± z(1 − α/2)·se`
    pub fn interval(estimate: f64, standard_error: f64, alpha: f64) -> Result<ConfidenceInterval> {
        let z = normal_quantile(1.0 - alpha / 2.0)?;
        Ok(Self::interval_with_z(estimate, standard_error, z, 1.0 - alpha))
    }

    /// Normal interval with a precomputed critical value
    pub fn interval_with_z(
        estimate: f64,
        standard_error: f64,
        z: f64,
        confidence_level: f64,
    ) -> ConfidenceInterval {
        let margin = z * standard_error;
        ConfidenceInterval::new(estimate - margin, estimate + margin, estimate, confidence_level)
    }
}
