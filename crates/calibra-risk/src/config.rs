//! Finite-difference settings.

use calibra_core::{Validate, ValidationError};
use serde::{Deserialize, Serialize};

use crate::error::RiskResult;

/// Settings of the finite-difference sensitivity calculator.
///
/// ```toml
/// shift = 1e-4
/// parallel = false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiniteDifferenceConfig {
    /// Absolute shift applied to one curve parameter at a time.
    #[serde(default = "default_shift")]
    pub shift: f64,

    /// Revalue the bumped snapshots of a curve in parallel.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_shift() -> f64 {
    1e-4
}

fn default_parallel() -> bool {
    true
}

impl Default for FiniteDifferenceConfig {
    fn default() -> Self {
        Self {
            shift: default_shift(),
            parallel: default_parallel(),
        }
    }
}

impl FiniteDifferenceConfig {
    /// Settings with the given shift.
    #[must_use]
    pub fn with_shift(shift: f64) -> Self {
        Self {
            shift,
            ..Self::default()
        }
    }

    /// Parses and validates settings from TOML.
    pub fn from_toml_str(s: &str) -> RiskResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate_or_error()?;
        Ok(config)
    }
}

impl Validate for FiniteDifferenceConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !(self.shift.is_finite() && self.shift > 0.0) {
            errors.push(ValidationError::new(
                "shift",
                format!("must be positive, got {}", self.shift),
            ));
        }
        errors
    }
}
