//! Parameterized curves.

mod constant;
mod nodal;

pub use constant::ConstantCurve;
pub use nodal::InterpolatedNodalCurve;

use std::fmt;
use std::sync::Arc;

use calibra_core::market::{CurveName, ParameterMetadata, ValueType};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Shared handle to an immutable curve.
pub type CurveRef = Arc<dyn Curve>;

/// Describes a curve: its name, what its axes hold, and optionally one
/// metadata entry per parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveMetadata {
    /// Curve name.
    pub name: CurveName,
    /// What the x values represent.
    pub x_value_type: ValueType,
    /// What the y values represent.
    pub y_value_type: ValueType,
    /// Per-parameter metadata; empty when not known.
    pub parameter_metadata: Vec<ParameterMetadata>,
}

impl CurveMetadata {
    /// Metadata for a zero-rate curve in year fractions.
    #[must_use]
    pub fn zero_rates(name: impl Into<CurveName>) -> Self {
        Self {
            name: name.into(),
            x_value_type: ValueType::YearFraction,
            y_value_type: ValueType::ZeroRate,
            parameter_metadata: Vec::new(),
        }
    }

    /// Metadata for a discount-factor curve in year fractions.
    #[must_use]
    pub fn discount_factors(name: impl Into<CurveName>) -> Self {
        Self {
            y_value_type: ValueType::DiscountFactor,
            ..Self::zero_rates(name)
        }
    }

    /// Attaches per-parameter metadata.
    #[must_use]
    pub fn with_parameter_metadata(mut self, metadata: Vec<ParameterMetadata>) -> Self {
        self.parameter_metadata = metadata;
        self
    }
}

/// A curve defined by a finite list of parameters.
///
/// Curves are immutable. [`Curve::with_parameter`] returns a new curve and
/// leaves the receiver untouched, so a curve can be shared freely between
/// threads while bumped copies are built from it.
pub trait Curve: Send + Sync + fmt::Debug {
    /// Returns the curve metadata.
    fn metadata(&self) -> &CurveMetadata;

    /// Returns the curve name.
    fn name(&self) -> &CurveName {
        &self.metadata().name
    }

    /// Returns the number of parameters.
    fn parameter_count(&self) -> usize;

    /// Returns the parameter at `index`.
    fn parameter(&self, index: usize) -> CurveResult<f64>;

    /// Returns a copy of this curve with the parameter at `index` replaced.
    fn with_parameter(&self, index: usize, value: f64) -> CurveResult<CurveRef>;

    /// Returns a copy of this curve with the parameter at `index` shifted.
    fn with_perturbation(&self, index: usize, shift: f64) -> CurveResult<CurveRef> {
        self.with_parameter(index, self.parameter(index)? + shift)
    }

    /// Returns the metadata of the parameter at `index`.
    fn parameter_metadata(&self, index: usize) -> ParameterMetadata {
        self.metadata()
            .parameter_metadata
            .get(index)
            .cloned()
            .unwrap_or_else(|| ParameterMetadata::empty(index))
    }

    /// Returns the y value at `x`.
    fn y_value(&self, x: f64) -> CurveResult<f64>;

    /// Returns dy/dx at `x`.
    fn first_derivative(&self, x: f64) -> CurveResult<f64>;

    /// Returns the derivative of the y value at `x` with respect to each parameter.
    fn y_value_parameter_sensitivity(&self, x: f64) -> CurveResult<Vec<f64>>;

    /// Returns this curve as a nodal curve, if it is one.
    fn as_nodal(&self) -> Option<&InterpolatedNodalCurve> {
        None
    }
}

pub(crate) fn check_index(index: usize, count: usize) -> CurveResult<()> {
    if index < count {
        Ok(())
    } else {
        Err(CurveError::ParameterIndexOutOfRange { index, count })
    }
}
