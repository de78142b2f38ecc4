//! Linear interpolation.

use super::nodes::{Location, Nodes};
use crate::error::MathResult;
use crate::extrapolation::ExtrapolationMethod;
use crate::interpolation::Interpolator;

/// Linear interpolation between data points.
///
/// # Example
///
/// ```rust
/// use calibra_math::interpolation::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0]).unwrap();
/// assert!((interp.interpolate(1.5).unwrap() - 2.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    nodes: Nodes,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Arguments
    ///
    /// * `xs` - X coordinates (must be sorted in ascending order)
    /// * `ys` - Y coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points or if lengths differ.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        Ok(Self {
            nodes: Nodes::new(xs, ys)?,
        })
    }

    /// Sets the extrapolation policy (none by default).
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: ExtrapolationMethod) -> Self {
        self.nodes.extrapolation = extrapolation;
        self
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        Ok(match self.nodes.locate(x)? {
            Location::Boundary { index } => self.nodes.ys[index],
            Location::Segment { index, x } => {
                let w = self.nodes.weight(index, x);
                let (y0, y1) = (self.nodes.ys[index], self.nodes.ys[index + 1]);
                y0 + w * (y1 - y0)
            }
        })
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        Ok(match self.nodes.locate(x)? {
            Location::Boundary { .. } => 0.0,
            Location::Segment { index, .. } => {
                let xs = &self.nodes.xs;
                let ys = &self.nodes.ys;
                (ys[index + 1] - ys[index]) / (xs[index + 1] - xs[index])
            }
        })
    }

    fn parameter_sensitivity(&self, x: f64) -> MathResult<Vec<f64>> {
        Ok(match self.nodes.locate(x)? {
            Location::Boundary { index } => self.nodes.unit(index),
            Location::Segment { index, x } => {
                let w = self.nodes.weight(index, x);
                let mut sensitivity = vec![0.0; self.nodes.len()];
                sensitivity[index] = 1.0 - w;
                sensitivity[index + 1] = w;
                sensitivity
            }
        })
    }

    fn allows_extrapolation(&self) -> bool {
        self.nodes.extrapolation.allows_extrapolation()
    }

    fn min_x(&self) -> f64 {
        self.nodes.min_x()
    }

    fn max_x(&self) -> f64 {
        self.nodes.max_x()
    }
}
