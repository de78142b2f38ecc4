//! Error types for the core crate.

use thiserror::Error;

use crate::validation::ValidationError;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the core domain types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Unknown currency code.
    #[error("Unknown currency: {code}")]
    UnknownCurrency {
        /// The code that failed to parse.
        code: String,
    },

    /// Unknown tenor code.
    #[error("Unknown tenor: {code}")]
    UnknownTenor {
        /// The code that failed to parse.
        code: String,
    },

    /// Two amounts in different currencies were combined.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch {
        /// Currency of the receiver.
        expected: String,
        /// Currency of the argument.
        got: String,
    },

    /// A configuration value failed validation.
    #[error("Validation error: {field}: {message}")]
    Validation {
        /// Field that failed validation.
        field: String,
        /// Validation error message.
        message: String,
    },

    /// Several configuration values failed validation.
    #[error("Multiple validation errors: {0:?}")]
    MultipleValidationErrors(Vec<ValidationError>),
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an unknown currency error.
    #[must_use]
    pub fn unknown_currency(code: impl Into<String>) -> Self {
        Self::UnknownCurrency { code: code.into() }
    }

    /// Creates an unknown tenor error.
    #[must_use]
    pub fn unknown_tenor(code: impl Into<String>) -> Self {
        Self::UnknownTenor { code: code.into() }
    }
}
