//! Log-linear interpolation.

use super::nodes::{Location, Nodes};
use crate::error::{MathError, MathResult};
use crate::extrapolation::ExtrapolationMethod;
use crate::interpolation::Interpolator;

/// Linear interpolation of `ln(y)`.
///
/// Applied to discount factors this gives piecewise-constant forward rates.
/// All y values must be strictly positive.
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    nodes: Nodes,
    log_ys: Vec<f64>,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if the nodes are invalid or any y value is not positive.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if let Some(y) = ys.iter().find(|y| **y <= 0.0) {
            return Err(MathError::invalid_input(format!(
                "log-linear interpolation requires positive values, got {y}"
            )));
        }
        let log_ys = ys.iter().map(|y| y.ln()).collect();
        Ok(Self {
            nodes: Nodes::new(xs, ys)?,
            log_ys,
        })
    }

    /// Sets the extrapolation policy (none by default).
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: ExtrapolationMethod) -> Self {
        self.nodes.extrapolation = extrapolation;
        self
    }

    fn segment_value(&self, index: usize, x: f64) -> f64 {
        let w = self.nodes.weight(index, x);
        ((1.0 - w) * self.log_ys[index] + w * self.log_ys[index + 1]).exp()
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        Ok(match self.nodes.locate(x)? {
            Location::Boundary { index } => self.nodes.ys[index],
            Location::Segment { index, x } => self.segment_value(index, x),
        })
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        Ok(match self.nodes.locate(x)? {
            Location::Boundary { .. } => 0.0,
            Location::Segment { index, x } => {
                let slope = (self.log_ys[index + 1] - self.log_ys[index])
                    / (self.nodes.xs[index + 1] - self.nodes.xs[index]);
                self.segment_value(index, x) * slope
            }
        })
    }

    fn parameter_sensitivity(&self, x: f64) -> MathResult<Vec<f64>> {
        Ok(match self.nodes.locate(x)? {
            Location::Boundary { index } => self.nodes.unit(index),
            Location::Segment { index, x } => {
                let w = self.nodes.weight(index, x);
                let value = self.segment_value(index, x);
                let mut sensitivity = vec![0.0; self.nodes.len()];
                sensitivity[index] = value * (1.0 - w) / self.nodes.ys[index];
                sensitivity[index + 1] = value * w / self.nodes.ys[index + 1];
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_forward_between_nodes() {
        let times = vec![0.0, 1.0, 2.0];
        let dfs = vec![1.0, (-0.03f64).exp(), (-0.07f64).exp()];
        let interp = LogLinearInterpolator::new(times, dfs).unwrap();

        assert_relative_eq!(
            interp.interpolate(0.5).unwrap(),
            (-0.015f64).exp(),
            epsilon = 1e-14
        );
        let df = interp.interpolate(1.5).unwrap();
        assert_relative_eq!(df, (-0.05f64).exp(), epsilon = 1e-14);
        assert_relative_eq!(-interp.derivative(1.5).unwrap() / df, 0.04, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, 0.0]).is_err());
    }
}
