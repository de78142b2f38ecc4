//! Calibration settings.
//!
//! Each settings struct deserializes from TOML with every field optional:
//!
//! ```toml
//! n_steps = 40
//! max_time = 5.0
//! time_interpolation = "TimeSquare"
//! ```

use calibra_core::{Validate, ValidationError};
use calibra_math::differentiation::DEFAULT_STEP;
use calibra_math::extrapolation::ExtrapolationMethod;
use calibra_math::interpolation::{GridInterpolator, InterpolationMethod};
use serde::{Deserialize, Serialize};

use crate::error::VolatilityResult;

/// Settings of the implied trinomial tree calibrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpliedTreeConfig {
    /// Number of time steps of the tree.
    #[serde(default = "default_n_steps")]
    pub n_steps: usize,

    /// Time covered by the tree, in years.
    #[serde(default = "default_max_time")]
    pub max_time: f64,

    /// Interpolation of the output surface along time.
    #[serde(default = "default_time_interpolation")]
    pub time_interpolation: InterpolationMethod,

    /// Interpolation of the output surface along strike.
    #[serde(default)]
    pub strike_interpolation: InterpolationMethod,

    /// Extrapolation of the output surface on both axes.
    #[serde(default)]
    pub extrapolation: ExtrapolationMethod,
}

fn default_n_steps() -> usize {
    20
}

fn default_max_time() -> f64 {
    3.0
}

fn default_time_interpolation() -> InterpolationMethod {
    InterpolationMethod::TimeSquare
}

impl Default for ImpliedTreeConfig {
    fn default() -> Self {
        Self {
            n_steps: default_n_steps(),
            max_time: default_max_time(),
            time_interpolation: default_time_interpolation(),
            strike_interpolation: InterpolationMethod::Linear,
            extrapolation: ExtrapolationMethod::Flat,
        }
    }
}

impl ImpliedTreeConfig {
    /// Parses and validates settings from TOML.
    pub fn from_toml_str(s: &str) -> VolatilityResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// The interpolator of the output surface.
    #[must_use]
    pub fn interpolator(&self) -> GridInterpolator {
        GridInterpolator::new(
            self.time_interpolation,
            self.extrapolation,
            self.strike_interpolation,
            self.extrapolation,
        )
    }
}

impl Validate for ImpliedTreeConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.n_steps < 2 {
            errors.push(ValidationError::new("n_steps", "at least 2 steps are required"));
        }
        if !(self.max_time.is_finite() && self.max_time > 0.0) {
            errors.push(ValidationError::new(
                "max_time",
                format!("must be positive, got {}", self.max_time),
            ));
        }
        if self.extrapolation == ExtrapolationMethod::None {
            errors.push(ValidationError::new(
                "extrapolation",
                "the output surface must extrapolate beyond the tree",
            ));
        }
        errors
    }
}

/// Settings of the Dupire calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DupireConfig {
    /// Finite-difference step in time and strike.
    #[serde(default = "default_step")]
    pub step: f64,

    /// Below this strike the implied volatility route uses its small-strike
    /// expansion.
    #[serde(default = "default_small_strike")]
    pub small_strike: f64,
}

fn default_step() -> f64 {
    DEFAULT_STEP
}

fn default_small_strike() -> f64 {
    1e-10
}

impl Default for DupireConfig {
    fn default() -> Self {
        Self {
            step: default_step(),
            small_strike: default_small_strike(),
        }
    }
}

impl DupireConfig {
    /// Parses and validates settings from TOML.
    pub fn from_toml_str(s: &str) -> VolatilityResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate_or_error()?;
        Ok(config)
    }
}

impl Validate for DupireConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !(self.step.is_finite() && self.step > 0.0) {
            errors.push(ValidationError::new(
                "step",
                format!("must be positive, got {}", self.step),
            ));
        }
        if !(self.small_strike.is_finite() && self.small_strike >= 0.0) {
            errors.push(ValidationError::new(
                "small_strike",
                format!("must be non-negative, got {}", self.small_strike),
            ));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VolatilityError;
    use calibra_core::CoreError;

    #[test]
    fn test_defaults() {
        let config = ImpliedTreeConfig::default();
        assert_eq!(config.n_steps, 20);
        assert_eq!(config.max_time, 3.0);
        assert_eq!(config.interpolator(), GridInterpolator::default());
        assert!(config.is_valid());

        let dupire = DupireConfig::default();
        assert_eq!(dupire.step, 1e-4);
        assert_eq!(dupire.small_strike, 1e-10);
    }

    #[test]
    fn test_from_toml() {
        let config = ImpliedTreeConfig::from_toml_str("n_steps = 40\nmax_time = 5.0").unwrap();
        assert_eq!(config.n_steps, 40);
        assert_eq!(config.max_time, 5.0);
        assert_eq!(config.time_interpolation, InterpolationMethod::TimeSquare);

        let config =
            ImpliedTreeConfig::from_toml_str("strike_interpolation = \"LogLinear\"").unwrap();
        assert_eq!(config.strike_interpolation, InterpolationMethod::LogLinear);

        let dupire = DupireConfig::from_toml_str("step = 1e-3").unwrap();
        assert_eq!(dupire.step, 1e-3);
        assert_eq!(dupire.small_strike, 1e-10);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            ImpliedTreeConfig::from_toml_str("n_steps = 1"),
            Err(VolatilityError::Core(CoreError::Validation { .. }))
        ));
        assert!(matches!(
            ImpliedTreeConfig::from_toml_str("n_steps = 0\nmax_time = -1.0"),
            Err(VolatilityError::Core(CoreError::MultipleValidationErrors(_)))
        ));
        assert!(matches!(
            DupireConfig::from_toml_str("step = \"big\""),
            Err(VolatilityError::Config(_))
        ));
    }
}
