//! Interpolation methods for curves and surfaces.
//!
//! # Available Methods
//!
//! - [`LinearInterpolator`]: linear in the values
//! - [`LogLinearInterpolator`]: linear in the log of the values (discount factors)
//! - [`TimeSquareInterpolator`]: linear in `x * y^2`, the natural choice for
//!   volatilities along a time axis because it interpolates total variance
//! - [`GridInterpolator`]: 2-D interpolation of scattered nodes grouped by `x`
//!
//! Every interpolator reports [`Interpolator::parameter_sensitivity`], the
//! derivative of the interpolated value with respect to each node value.
//! Curves and surfaces chain these to produce risk on their parameters.

mod grid;
mod linear;
mod log_linear;
mod nodes;
mod time_square;

pub use grid::{BoundGridInterpolator, GridInterpolator};
pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;
pub use time_square::TimeSquareInterpolator;

use serde::{Deserialize, Serialize};

use crate::error::MathResult;
use crate::extrapolation::ExtrapolationMethod;

/// Trait for 1-D interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative with respect to x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns the derivative of the value at x with respect to each node value.
    fn parameter_sensitivity(&self, x: f64) -> MathResult<Vec<f64>>;

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Selects an interpolator by name, for configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InterpolationMethod {
    /// [`LinearInterpolator`]
    #[default]
    Linear,
    /// [`LogLinearInterpolator`]
    LogLinear,
    /// [`TimeSquareInterpolator`]
    TimeSquare,
}

impl InterpolationMethod {
    /// Binds the method to a set of nodes.
    pub fn bind(
        &self,
        xs: Vec<f64>,
        ys: Vec<f64>,
        extrapolation: ExtrapolationMethod,
    ) -> MathResult<BoundInterpolator> {
        Ok(match self {
            InterpolationMethod::Linear => BoundInterpolator::Linear(
                LinearInterpolator::new(xs, ys)?.with_extrapolation(extrapolation),
            ),
            InterpolationMethod::LogLinear => BoundInterpolator::LogLinear(
                LogLinearInterpolator::new(xs, ys)?.with_extrapolation(extrapolation),
            ),
            InterpolationMethod::TimeSquare => BoundInterpolator::TimeSquare(
                TimeSquareInterpolator::new(xs, ys)?.with_extrapolation(extrapolation),
            ),
        })
    }
}

/// An interpolator bound to its nodes, selected at runtime.
#[derive(Debug, Clone)]
pub enum BoundInterpolator {
    /// Linear interpolation.
    Linear(LinearInterpolator),
    /// Log-linear interpolation.
    LogLinear(LogLinearInterpolator),
    /// Time-square interpolation.
    TimeSquare(TimeSquareInterpolator),
}

impl BoundInterpolator {
    fn inner(&self) -> &dyn Interpolator {
        match self {
            BoundInterpolator::Linear(i) => i,
            BoundInterpolator::LogLinear(i) => i,
            BoundInterpolator::TimeSquare(i) => i,
        }
    }
}

impl Interpolator for BoundInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        self.inner().interpolate(x)
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        self.inner().derivative(x)
    }

    fn parameter_sensitivity(&self, x: f64) -> MathResult<Vec<f64>> {
        self.inner().parameter_sensitivity(x)
    }

    fn allows_extrapolation(&self) -> bool {
        self.inner().allows_extrapolation()
    }

    fn min_x(&self) -> f64 {
        self.inner().min_x()
    }

    fn max_x(&self) -> f64 {
        self.inner().max_x()
    }
}
