//! Constant curve.

use std::sync::Arc;

use super::{check_index, Curve, CurveMetadata, CurveRef};
use crate::error::CurveResult;

/// A curve with the same value everywhere, described by one parameter.
///
/// Not a nodal curve: it has no nodes to bump one by one.
#[derive(Debug, Clone)]
pub struct ConstantCurve {
    metadata: CurveMetadata,
    value: f64,
}

impl ConstantCurve {
    /// Creates a constant curve.
    #[must_use]
    pub fn new(metadata: CurveMetadata, value: f64) -> Self {
        Self { metadata, value }
    }
}

impl Curve for ConstantCurve {
    fn metadata(&self) -> &CurveMetadata {
        &self.metadata
    }

    fn parameter_count(&self) -> usize {
        1
    }

    fn parameter(&self, index: usize) -> CurveResult<f64> {
        check_index(index, 1)?;
        Ok(self.value)
    }

    fn with_parameter(&self, index: usize, value: f64) -> CurveResult<CurveRef> {
        check_index(index, 1)?;
        Ok(Arc::new(Self::new(self.metadata.clone(), value)))
    }

    fn y_value(&self, _x: f64) -> CurveResult<f64> {
        Ok(self.value)
    }

    fn first_derivative(&self, _x: f64) -> CurveResult<f64> {
        Ok(0.0)
    }

    fn y_value_parameter_sensitivity(&self, _x: f64) -> CurveResult<Vec<f64>> {
        Ok(vec![1.0])
    }
}
