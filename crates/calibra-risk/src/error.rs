//! Error types for risk calculations.

use calibra_core::CoreError;
use calibra_curves::CurveError;
use calibra_math::MathError;
use thiserror::Error;

/// A specialized Result type for risk calculations.
pub type RiskResult<T> = Result<T, RiskError>;

/// Errors that can occur during risk calculations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RiskError {
    /// Invalid input parameters.
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of the problem.
        reason: String,
    },

    /// A curve that must be bumped node by node is not nodal.
    #[error("Curve {name} is not an interpolated nodal curve")]
    CurveNotNodal {
        /// Name of the curve.
        name: String,
    },

    /// Settings could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Numerical failure, such as a singular Jacobian.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Curve failure.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Core type failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl RiskError {
    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Creates a curve not nodal error.
    #[must_use]
    pub fn curve_not_nodal(name: impl Into<String>) -> Self {
        Self::CurveNotNodal { name: name.into() }
    }
}

impl From<toml::de::Error> for RiskError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
