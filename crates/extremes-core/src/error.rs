//! Error types for extreme value analysis
//!
//! Provides a unified error type for all extremes crates. Variants fall into
//! two classes: configuration errors, raised before any numeric work and fixed
//! by correcting the inputs, and computation failures, raised when a fit does
//! not converge for the given data.

use thiserror::Error;

/// Core error type for extreme value operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid configuration value (fit method, confidence level, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Iterative solver stopped before reaching a stationary point
    #[error("No convergence after {iterations} iterations: {reason}")]
    NonConvergence { iterations: usize, reason: String },

    /// Matrix could not be inverted
    #[error("Singular matrix: {0}")]
    SingularMatrix(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for an empty sample
    pub fn empty_input() -> Self {
        Self::InsufficientData {
            expected: 1,
            actual: 0,
        }
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::InvalidInput(format!("{context} contains NaN or infinite values"))
    }

    /// Create an error for a solver that ran out of iterations
    pub fn non_convergence(iterations: usize, reason: impl Into<String>) -> Self {
        Self::NonConvergence {
            iterations,
            reason: reason.into(),
        }
    }

    /// True for errors fixed by correcting the inputs
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_) | Self::InvalidInput(_) | Self::InsufficientData { .. }
        )
    }

    /// True for errors raised by the numerics for otherwise valid inputs
    pub fn is_computation(&self) -> bool {
        !self.is_configuration()
    }
}
