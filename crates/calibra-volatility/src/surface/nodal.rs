//! Interpolated nodal surface.

use std::sync::Arc;

use calibra_math::interpolation::{BoundGridInterpolator, GridInterpolator};

use super::{check_index, Surface, SurfaceMetadata, SurfaceRef};
use crate::error::{VolatilityError, VolatilityResult};

/// A surface through scattered `(x, y, z)` nodes.
///
/// The parameters are the z values, in the order the nodes were given.
/// Evaluation groups the nodes by x; see [`GridInterpolator`].
#[derive(Debug, Clone)]
pub struct InterpolatedNodalSurface {
    metadata: SurfaceMetadata,
    x_values: Vec<f64>,
    y_values: Vec<f64>,
    z_values: Vec<f64>,
    interpolator: GridInterpolator,
    bound: BoundGridInterpolator,
}

impl InterpolatedNodalSurface {
    /// Creates a nodal surface.
    ///
    /// # Errors
    ///
    /// Fails if the nodes cannot be interpolated, or if the metadata lists
    /// parameter metadata of the wrong length.
    pub fn new(
        metadata: SurfaceMetadata,
        x_values: Vec<f64>,
        y_values: Vec<f64>,
        z_values: Vec<f64>,
        interpolator: GridInterpolator,
    ) -> VolatilityResult<Self> {
        let count = metadata.parameter_metadata.len();
        if count != 0 && count != z_values.len() {
            return Err(VolatilityError::invalid_parameter(format!(
                "{} parameter metadata entries for {} nodes",
                count,
                z_values.len()
            )));
        }
        let bound = interpolator.bind(&x_values, &y_values, &z_values)?;
        Ok(Self {
            metadata,
            x_values,
            y_values,
            z_values,
            interpolator,
            bound,
        })
    }

    /// Returns the node x values.
    #[must_use]
    pub fn x_values(&self) -> &[f64] {
        &self.x_values
    }

    /// Returns the node y values.
    #[must_use]
    pub fn y_values(&self) -> &[f64] {
        &self.y_values
    }

    /// Returns the node z values.
    #[must_use]
    pub fn z_values(&self) -> &[f64] {
        &self.z_values
    }

    /// Returns the interpolator.
    #[must_use]
    pub fn interpolator(&self) -> GridInterpolator {
        self.interpolator
    }

    /// Returns a copy with all z values replaced.
    pub fn with_z_values(&self, z_values: Vec<f64>) -> VolatilityResult<Self> {
        Self::new(
            self.metadata.clone(),
            self.x_values.clone(),
            self.y_values.clone(),
            z_values,
            self.interpolator,
        )
    }
}

impl Surface for InterpolatedNodalSurface {
    fn metadata(&self) -> &SurfaceMetadata {
        &self.metadata
    }

    fn parameter_count(&self) -> usize {
        self.z_values.len()
    }

    fn parameter(&self, index: usize) -> VolatilityResult<f64> {
        check_index(index, self.z_values.len())?;
        Ok(self.z_values[index])
    }

    fn with_parameter(&self, index: usize, value: f64) -> VolatilityResult<SurfaceRef> {
        check_index(index, self.z_values.len())?;
        let mut z_values = self.z_values.clone();
        z_values[index] = value;
        Ok(Arc::new(self.with_z_values(z_values)?))
    }

    fn z_value(&self, x: f64, y: f64) -> VolatilityResult<f64> {
        Ok(self.bound.interpolate(x, y)?)
    }

    fn z_value_parameter_sensitivity(&self, x: f64, y: f64) -> VolatilityResult<Vec<f64>> {
        Ok(self.bound.parameter_sensitivity(x, y)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use calibra_core::market::ValueType;
    use calibra_math::extrapolation::ExtrapolationMethod;
    use calibra_math::interpolation::InterpolationMethod;

    fn surface() -> InterpolatedNodalSurface {
        InterpolatedNodalSurface::new(
            SurfaceMetadata::new("EQ-Vol", ValueType::BlackVolatility),
            vec![0.5, 0.5, 1.0, 1.0],
            vec![90.0, 110.0, 90.0, 110.0],
            vec![0.24, 0.20, 0.23, 0.21],
            GridInterpolator::new(
                InterpolationMethod::Linear,
                ExtrapolationMethod::Flat,
                InterpolationMethod::Linear,
                ExtrapolationMethod::Flat,
            ),
        )
        .unwrap()
    }

    #[test]
    fn test_bilinear_value_and_sensitivity() {
        let s = surface();
        assert_relative_eq!(s.z_value(0.75, 100.0).unwrap(), 0.22, epsilon = 1e-14);
        let sensitivity = s.z_value_parameter_sensitivity(0.75, 100.0).unwrap();
        for w in sensitivity {
            assert_relative_eq!(w, 0.25, epsilon = 1e-14);
        }
        // flat beyond the last strike
        assert_relative_eq!(s.z_value(1.0, 150.0).unwrap(), 0.21, epsilon = 1e-14);
    }

    #[test]
    fn test_with_parameter() {
        let s = surface();
        let bumped = s.with_parameter(3, 0.25).unwrap();
        assert_relative_eq!(bumped.z_value(1.0, 110.0).unwrap(), 0.25, epsilon = 1e-14);
        assert_relative_eq!(s.z_value(1.0, 110.0).unwrap(), 0.21, epsilon = 1e-14);
        assert!(s.with_parameter(4, 0.1).is_err());
        assert_eq!(bumped.name().as_str(), "EQ-Vol");
    }
}
