//! Parameterized surfaces.
//!
//! Volatility and price surfaces have time on the x axis and strike on the
//! y axis.

mod constant;
mod nodal;

pub use constant::ConstantSurface;
pub use nodal::InterpolatedNodalSurface;

use std::fmt;
use std::sync::Arc;

use calibra_core::market::{ParameterMetadata, SurfaceName, ValueType};
use serde::{Deserialize, Serialize};

use crate::error::{VolatilityError, VolatilityResult};

/// Shared handle to an immutable surface.
pub type SurfaceRef = Arc<dyn Surface>;

/// Describes a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMetadata {
    /// Surface name.
    pub name: SurfaceName,
    /// What the x values represent.
    pub x_value_type: ValueType,
    /// What the y values represent.
    pub y_value_type: ValueType,
    /// What the z values represent.
    pub z_value_type: ValueType,
    /// Per-parameter metadata; empty when not known.
    pub parameter_metadata: Vec<ParameterMetadata>,
}

impl SurfaceMetadata {
    /// Metadata for a surface over time and strike.
    #[must_use]
    pub fn new(name: impl Into<SurfaceName>, z_value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            x_value_type: ValueType::YearFraction,
            y_value_type: ValueType::Strike,
            z_value_type,
            parameter_metadata: Vec::new(),
        }
    }

    /// Attaches per-parameter metadata.
    #[must_use]
    pub fn with_parameter_metadata(mut self, metadata: Vec<ParameterMetadata>) -> Self {
        self.parameter_metadata = metadata;
        self
    }
}

/// A surface defined by a finite list of parameters.
pub trait Surface: Send + Sync + fmt::Debug {
    /// Returns the surface metadata.
    fn metadata(&self) -> &SurfaceMetadata;

    /// Returns the surface name.
    fn name(&self) -> &SurfaceName {
        &self.metadata().name
    }

    /// Returns the number of parameters.
    fn parameter_count(&self) -> usize;

    /// Returns the parameter at `index`.
    fn parameter(&self, index: usize) -> VolatilityResult<f64>;

    /// Returns a copy of this surface with the parameter at `index` replaced.
    fn with_parameter(&self, index: usize, value: f64) -> VolatilityResult<SurfaceRef>;

    /// Returns the z value at `(x, y)`.
    fn z_value(&self, x: f64, y: f64) -> VolatilityResult<f64>;

    /// Returns the derivative of the z value at `(x, y)` with respect to
    /// each parameter.
    fn z_value_parameter_sensitivity(&self, x: f64, y: f64) -> VolatilityResult<Vec<f64>>;
}

pub(crate) fn check_index(index: usize, count: usize) -> VolatilityResult<()> {
    if index < count {
        Ok(())
    } else {
        Err(VolatilityError::invalid_parameter(format!(
            "parameter index {index} out of range for {count} parameters"
        )))
    }
}
