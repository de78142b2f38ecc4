//! Time-square interpolation.

use super::nodes::{Location, Nodes};
use crate::error::{MathError, MathResult};
use crate::extrapolation::ExtrapolationMethod;
use crate::interpolation::Interpolator;

const SMALL: f64 = 1e-14;

/// Linear interpolation of `x * y^2`.
///
/// With `x` a time and `y` a volatility this interpolates total variance
/// linearly in time. Requires non-negative x values. At `x = 0` the value of
/// the first node of the segment is returned.
#[derive(Debug, Clone)]
pub struct TimeSquareInterpolator {
    nodes: Nodes,
}

impl TimeSquareInterpolator {
    /// Creates a new time-square interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if the nodes are invalid or the first x is negative.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        let nodes = Nodes::new(xs, ys)?;
        if nodes.min_x() < 0.0 {
            return Err(MathError::invalid_input(
                "time-square interpolation requires non-negative x values",
            ));
        }
        Ok(Self { nodes })
    }

    /// Sets the extrapolation policy (none by default).
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: ExtrapolationMethod) -> Self {
        self.nodes.extrapolation = extrapolation;
        self
    }

    /// Total variance `x * y^2` at the two ends of segment `index`.
    fn ends(&self, index: usize) -> (f64, f64) {
        let xs = &self.nodes.xs;
        let ys = &self.nodes.ys;
        (
            xs[index] * ys[index] * ys[index],
            xs[index + 1] * ys[index + 1] * ys[index + 1],
        )
    }

    /// Returns `(value, total)` in segment `index`, `total` being `x * y^2`.
    fn segment(&self, index: usize, x: f64) -> MathResult<(f64, f64)> {
        let w = self.nodes.weight(index, x);
        let (t0, t1) = self.ends(index);
        let total = t0 + w * (t1 - t0);
        if total < 0.0 {
            return Err(MathError::invalid_input(format!(
                "negative interpolated x * y^2 at x = {x}"
            )));
        }
        Ok(((total / x).sqrt(), total))
    }
}

impl Interpolator for TimeSquareInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        match self.nodes.locate(x)? {
            Location::Boundary { index } => Ok(self.nodes.ys[index]),
            Location::Segment { index, x } if x.abs() < SMALL => Ok(self.nodes.ys[index]),
            Location::Segment { index, x } => Ok(self.segment(index, x)?.0),
        }
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        match self.nodes.locate(x)? {
            Location::Boundary { .. } => Ok(0.0),
            Location::Segment { x, .. } if x.abs() < SMALL => Ok(0.0),
            Location::Segment { index, x } => {
                let (value, total) = self.segment(index, x)?;
                if value == 0.0 {
                    return Ok(0.0);
                }
                let (t0, t1) = self.ends(index);
                let slope = (t1 - t0) / (self.nodes.xs[index + 1] - self.nodes.xs[index]);
                Ok((slope * x - total) / (2.0 * x * x * value))
            }
        }
    }

    fn parameter_sensitivity(&self, x: f64) -> MathResult<Vec<f64>> {
        match self.nodes.locate(x)? {
            Location::Boundary { index } => Ok(self.nodes.unit(index)),
            Location::Segment { index, x } if x.abs() < SMALL => Ok(self.nodes.unit(index)),
            Location::Segment { index, x } => {
                let (value, _) = self.segment(index, x)?;
                let mut sensitivity = vec![0.0; self.nodes.len()];
                if value == 0.0 {
                    return Ok(sensitivity);
                }
                let w = self.nodes.weight(index, x);
                let xs = &self.nodes.xs;
                let ys = &self.nodes.ys;
                sensitivity[index] = (1.0 - w) * xs[index] * ys[index] / (x * value);
                sensitivity[index + 1] = w * xs[index + 1] * ys[index + 1] / (x * value);
                Ok(sensitivity)
            }
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_total_variance_is_linear() {
        let interp = TimeSquareInterpolator::new(vec![1.0, 2.0], vec![0.2, 0.3]).unwrap();
        let v = interp.interpolate(1.5).unwrap();
        let expected = 0.5 * (1.0 * 0.04) + 0.5 * (2.0 * 0.09);
        assert_relative_eq!(1.5 * v * v, expected, epsilon = 1e-14);
    }

    #[test]
    fn test_constant_volatility_preserved() {
        let interp = TimeSquareInterpolator::new(vec![0.0, 0.15, 0.3, 3.0], vec![0.25; 4])
            .unwrap()
            .with_extrapolation(ExtrapolationMethod::Flat);
        for x in [0.0, 0.01, 0.2, 1.0, 2.9, 5.0] {
            assert_relative_eq!(interp.interpolate(x).unwrap(), 0.25, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_zero_time() {
        let interp = TimeSquareInterpolator::new(vec![0.0, 1.0], vec![0.4, 0.2]).unwrap();
        assert_relative_eq!(interp.interpolate(0.0).unwrap(), 0.4);
        assert_relative_eq!(interp.interpolate(0.5).unwrap(), 0.2, epsilon = 1e-14);
        assert_eq!(interp.parameter_sensitivity(0.0).unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_negative_x_rejected() {
        assert!(TimeSquareInterpolator::new(vec![-1.0, 1.0], vec![0.2, 0.2]).is_err());
    }
}
