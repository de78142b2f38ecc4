//! Error types for curve operations.

use calibra_core::{CoreError, Date};
use calibra_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Curve not found in a rates provider.
    #[error("Curve not found: {name}")]
    CurveNotFound {
        /// Name/identifier of the missing curve.
        name: String,
    },

    /// Two rates providers disagree on the valuation date.
    #[error("Valuation date mismatch: expected {expected}, got {got}")]
    ValuationDateMismatch {
        /// Valuation date of the receiver.
        expected: Date,
        /// Valuation date of the argument.
        got: Date,
    },

    /// The same currency or index is held twice when combining providers.
    #[error("Duplicate curve: {name}")]
    DuplicateCurve {
        /// The duplicated key.
        name: String,
    },

    /// Parameter index out of range.
    #[error("Parameter index {index} out of range for {count} parameters")]
    ParameterIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of parameters.
        count: usize,
    },

    /// The curve cannot answer the request.
    #[error("Invalid curve: {reason}")]
    InvalidCurve {
        /// Description of the problem.
        reason: String,
    },

    /// Sensitivities could not be combined.
    #[error("Sensitivity size mismatch for {name}: {expected} vs {got}")]
    SensitivitySizeMismatch {
        /// Curve name.
        name: String,
        /// Size of the receiver.
        expected: usize,
        /// Size of the argument.
        got: usize,
    },

    /// Interpolation or other numerical failure.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Core type failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CurveError {
    /// Creates a curve not found error.
    #[must_use]
    pub fn curve_not_found(name: impl Into<String>) -> Self {
        Self::CurveNotFound { name: name.into() }
    }

    /// Creates a valuation date mismatch error.
    #[must_use]
    pub fn valuation_date_mismatch(expected: Date, got: Date) -> Self {
        Self::ValuationDateMismatch { expected, got }
    }

    /// Creates an invalid curve error.
    #[must_use]
    pub fn invalid_curve(reason: impl Into<String>) -> Self {
        Self::InvalidCurve {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CurveError::curve_not_found("USD discount");
        assert_eq!(err.to_string(), "Curve not found: USD discount");

        let a = Date::from_ymd(2024, 1, 2).unwrap();
        let b = Date::from_ymd(2024, 1, 3).unwrap();
        let err = CurveError::valuation_date_mismatch(a, b);
        assert!(err.to_string().contains("2024-01-03"));
    }

    #[test]
    fn test_math_error_converts() {
        let err: CurveError = MathError::SingularMatrix.into();
        assert!(matches!(err, CurveError::Math(MathError::SingularMatrix)));
    }
}
