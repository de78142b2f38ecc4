//! Error types for volatility operations.

use calibra_core::CoreError;
use calibra_curves::CurveError;
use calibra_math::MathError;
use thiserror::Error;

/// A specialized Result type for volatility operations.
pub type VolatilityResult<T> = Result<T, VolatilityError>;

/// Errors raised by trees, surfaces and local volatility calibration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VolatilityError {
    /// The inputs cannot produce a valid result: a lattice with
    /// probabilities outside (0, 1), a forward outside its successor nodes,
    /// a non-positive spot.
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of the problem.
        reason: String,
    },

    /// The input surface implies a negative local variance.
    ///
    /// This is a property of the surface (it admits arbitrage), not of the
    /// calibration settings.
    #[error("Negative local variance {variance:.6e} at time {time}, strike {strike}")]
    NegativeVariance {
        /// Time of the offending point.
        time: f64,
        /// Strike of the offending point.
        strike: f64,
        /// The computed variance.
        variance: f64,
    },

    /// Configuration could not be read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Interpolation, differentiation or root-finding failure.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Curve failure while reading rates.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Core failure, including configuration validation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl VolatilityError {
    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Creates a negative variance error.
    #[must_use]
    pub fn negative_variance(time: f64, strike: f64, variance: f64) -> Self {
        Self::NegativeVariance {
            time,
            strike,
            variance,
        }
    }
}

impl From<toml::de::Error> for VolatilityError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VolatilityError::negative_variance(1.5, 100.0, -0.01);
        let text = err.to_string();
        assert!(text.contains("time 1.5"));
        assert!(text.contains("strike 100"));

        let err = VolatilityError::invalid_parameter("spot must be positive");
        assert_eq!(err.to_string(), "Invalid parameter: spot must be positive");
    }

    #[test]
    fn test_conversions() {
        let err: VolatilityError = MathError::SingularMatrix.into();
        assert!(matches!(err, VolatilityError::Math(_)));
        let err: VolatilityError = CurveError::curve_not_found("X").into();
        assert!(matches!(err, VolatilityError::Curve(_)));
    }
}
