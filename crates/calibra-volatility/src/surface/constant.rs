//! Constant surface.

use std::sync::Arc;

use super::{check_index, Surface, SurfaceMetadata, SurfaceRef};
use crate::error::VolatilityResult;

/// A surface with the same value everywhere.
#[derive(Debug, Clone)]
pub struct ConstantSurface {
    metadata: SurfaceMetadata,
    value: f64,
}

impl ConstantSurface {
    /// Creates a constant surface.
    #[must_use]
    pub fn new(metadata: SurfaceMetadata, value: f64) -> Self {
        Self { metadata, value }
    }

    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Surface for ConstantSurface {
    fn metadata(&self) -> &SurfaceMetadata {
        &self.metadata
    }

    fn parameter_count(&self) -> usize {
        1
    }

    fn parameter(&self, index: usize) -> VolatilityResult<f64> {
        check_index(index, 1)?;
        Ok(self.value)
    }

    fn with_parameter(&self, index: usize, value: f64) -> VolatilityResult<SurfaceRef> {
        check_index(index, 1)?;
        Ok(Arc::new(Self::new(self.metadata.clone(), value)))
    }

    fn z_value(&self, _x: f64, _y: f64) -> VolatilityResult<f64> {
        Ok(self.value)
    }

    fn z_value_parameter_sensitivity(&self, _x: f64, _y: f64) -> VolatilityResult<Vec<f64>> {
        Ok(vec![1.0])
    }
}
