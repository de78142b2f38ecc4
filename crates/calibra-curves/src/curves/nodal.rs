//! Interpolated nodal curve.

use std::sync::Arc;

use calibra_core::market::ParameterMetadata;
use calibra_math::extrapolation::ExtrapolationMethod;
use calibra_math::interpolation::{BoundInterpolator, InterpolationMethod, Interpolator};

use super::{check_index, Curve, CurveMetadata, CurveRef};
use crate::error::{CurveError, CurveResult};

/// A curve through a set of nodes, interpolated between them.
///
/// The parameters are the y values of the nodes.
///
/// # Example
///
/// ```rust
/// use calibra_curves::curves::{Curve, InterpolatedNodalCurve};
///
/// let curve = InterpolatedNodalCurve::zero_rates("EUR-Disc", vec![1.0, 2.0], vec![0.01, 0.02])
///     .unwrap();
/// let bumped = curve.with_perturbation(1, 0.0001).unwrap();
/// assert!((bumped.y_value(2.0).unwrap() - 0.0201).abs() < 1e-14);
/// assert!((curve.y_value(2.0).unwrap() - 0.02).abs() < 1e-14);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedNodalCurve {
    metadata: CurveMetadata,
    x_values: Vec<f64>,
    y_values: Vec<f64>,
    method: InterpolationMethod,
    extrapolation: ExtrapolationMethod,
    interpolator: BoundInterpolator,
}

impl InterpolatedNodalCurve {
    /// Creates a nodal curve.
    ///
    /// # Errors
    ///
    /// Fails if the nodes cannot be interpolated, or if the metadata lists
    /// parameter metadata of the wrong length.
    pub fn new(
        metadata: CurveMetadata,
        x_values: Vec<f64>,
        y_values: Vec<f64>,
        method: InterpolationMethod,
        extrapolation: ExtrapolationMethod,
    ) -> CurveResult<Self> {
        let count = metadata.parameter_metadata.len();
        if count != 0 && count != y_values.len() {
            return Err(CurveError::invalid_curve(format!(
                "{} parameter metadata entries for {} nodes",
                count,
                y_values.len()
            )));
        }
        let interpolator = method.bind(x_values.clone(), y_values.clone(), extrapolation)?;
        Ok(Self {
            metadata,
            x_values,
            y_values,
            method,
            extrapolation,
            interpolator,
        })
    }

    /// A zero-rate curve, linear with flat extrapolation.
    pub fn zero_rates(
        name: &str,
        x_values: Vec<f64>,
        y_values: Vec<f64>,
    ) -> CurveResult<Self> {
        Self::new(
            CurveMetadata::zero_rates(name),
            x_values,
            y_values,
            InterpolationMethod::Linear,
            ExtrapolationMethod::Flat,
        )
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

    /// Returns a copy with all y values replaced.
    pub fn with_y_values(&self, y_values: Vec<f64>) -> CurveResult<Self> {
        Self::new(
            self.metadata.clone(),
            self.x_values.clone(),
            y_values,
            self.method,
            self.extrapolation,
        )
    }
}

impl Curve for InterpolatedNodalCurve {
    fn metadata(&self) -> &CurveMetadata {
        &self.metadata
    }

    fn parameter_count(&self) -> usize {
        self.y_values.len()
    }

    fn parameter(&self, index: usize) -> CurveResult<f64> {
        check_index(index, self.y_values.len())?;
        Ok(self.y_values[index])
    }

    fn with_parameter(&self, index: usize, value: f64) -> CurveResult<CurveRef> {
        check_index(index, self.y_values.len())?;
        let mut y_values = self.y_values.clone();
        y_values[index] = value;
        Ok(Arc::new(self.with_y_values(y_values)?))
    }

    fn parameter_metadata(&self, index: usize) -> ParameterMetadata {
        self.metadata
            .parameter_metadata
            .get(index)
            .cloned()
            .unwrap_or_else(|| match self.x_values.get(index) {
                Some(x) => ParameterMetadata::labelled(format!("{x}")),
                None => ParameterMetadata::empty(index),
            })
    }

    fn y_value(&self, x: f64) -> CurveResult<f64> {
        Ok(self.interpolator.interpolate(x)?)
    }

    fn first_derivative(&self, x: f64) -> CurveResult<f64> {
        Ok(self.interpolator.derivative(x)?)
    }

    fn y_value_parameter_sensitivity(&self, x: f64) -> CurveResult<Vec<f64>> {
        Ok(self.interpolator.parameter_sensitivity(x)?)
    }

    fn as_nodal(&self) -> Option<&InterpolatedNodalCurve> {
        Some(self)
    }
}
