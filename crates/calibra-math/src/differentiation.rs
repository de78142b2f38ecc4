//! Finite-difference differentiation.
//!
//! A [`Differentiator`] is a plain value holding the difference scheme, the
//! step and an optional domain. Near the edge of the domain a central
//! scheme falls back to a one-sided one so that the function is never
//! evaluated outside it.
//!
//! Vector-field variants differentiate every component of a `DVector` at
//! once. Applied to `(value, dvalue/dp_1, ..., dvalue/dp_n)` this carries
//! parameter sensitivities through the differentiation.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Default finite-difference step.
pub const DEFAULT_STEP: f64 = 1e-4;

/// Finite-difference scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FiniteDifferenceType {
    /// `f(x + h)` and `f(x)`.
    Forward,
    /// `f(x + h)` and `f(x - h)`.
    #[default]
    Central,
    /// `f(x)` and `f(x - h)`.
    Backward,
}

/// Finite-difference differentiator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Differentiator {
    scheme: FiniteDifferenceType,
    step: f64,
    domain: Option<(f64, f64)>,
}

impl Default for Differentiator {
    fn default() -> Self {
        Self {
            scheme: FiniteDifferenceType::Central,
            step: DEFAULT_STEP,
            domain: None,
        }
    }
}

impl Differentiator {
    /// Creates a differentiator.
    ///
    /// # Errors
    ///
    /// Returns an error unless the step is finite and positive.
    pub fn new(scheme: FiniteDifferenceType, step: f64) -> MathResult<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(MathError::invalid_input(format!(
                "finite-difference step must be positive, got {step}"
            )));
        }
        Ok(Self {
            scheme,
            step,
            domain: None,
        })
    }

    /// Restricts evaluation to `[lower, upper]`.
    #[must_use]
    pub fn with_domain(mut self, lower: f64, upper: f64) -> Self {
        self.domain = Some((lower, upper));
        self
    }

    /// Returns the step.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Returns the scheme.
    #[must_use]
    pub fn scheme(&self) -> FiniteDifferenceType {
        self.scheme
    }

    /// The scheme actually used at `x`, given the domain.
    ///
    /// Second derivatives look two steps away on one-sided schemes.
    fn effective_scheme(&self, x: f64, reach: f64) -> MathResult<FiniteDifferenceType> {
        let Some((lower, upper)) = self.domain else {
            return Ok(self.scheme);
        };
        if x < lower || x > upper {
            return Err(MathError::invalid_input(format!(
                "{x} is outside the differentiation domain [{lower}, {upper}]"
            )));
        }
        let h = self.step;
        let fits_below = x - reach * h >= lower;
        let fits_above = x + reach * h <= upper;
        Ok(match self.scheme {
            FiniteDifferenceType::Central if !fits_below => FiniteDifferenceType::Forward,
            FiniteDifferenceType::Central if !fits_above => FiniteDifferenceType::Backward,
            FiniteDifferenceType::Backward if !fits_below => FiniteDifferenceType::Forward,
            FiniteDifferenceType::Forward if !fits_above => FiniteDifferenceType::Backward,
            scheme => scheme,
        })
    }

    /// First derivative of a scalar function.
    pub fn first_derivative<F, E>(&self, f: F, x: f64) -> Result<f64, E>
    where
        F: Fn(f64) -> Result<f64, E>,
        E: From<MathError>,
    {
        let h = self.step;
        Ok(match self.effective_scheme(x, 1.0)? {
            FiniteDifferenceType::Forward => (f(x + h)? - f(x)?) / h,
            FiniteDifferenceType::Central => (f(x + h)? - f(x - h)?) / (2.0 * h),
            FiniteDifferenceType::Backward => (f(x)? - f(x - h)?) / h,
        })
    }

    /// Second derivative of a scalar function.
    pub fn second_derivative<F, E>(&self, f: F, x: f64) -> Result<f64, E>
    where
        F: Fn(f64) -> Result<f64, E>,
        E: From<MathError>,
    {
        let h = self.step;
        let (a, b, c) = self.second_order_points(x)?;
        Ok((f(a)? - 2.0 * f(b)? + f(c)?) / (h * h))
    }

    /// First derivative of every component of a vector field.
    ///
    /// The field's own error type passes through unchanged.
    pub fn first_derivative_vector<F, E>(&self, f: F, x: f64) -> Result<DVector<f64>, E>
    where
        F: Fn(f64) -> Result<DVector<f64>, E>,
        E: From<MathError>,
    {
        let h = self.step;
        let (up, down, width) = match self.effective_scheme(x, 1.0)? {
            FiniteDifferenceType::Forward => (f(x + h)?, f(x)?, h),
            FiniteDifferenceType::Central => (f(x + h)?, f(x - h)?, 2.0 * h),
            FiniteDifferenceType::Backward => (f(x)?, f(x - h)?, h),
        };
        check_lengths(&up, &down)?;
        Ok((up - down) / width)
    }

    /// Second derivative of every component of a vector field.
    pub fn second_derivative_vector<F, E>(&self, f: F, x: f64) -> Result<DVector<f64>, E>
    where
        F: Fn(f64) -> Result<DVector<f64>, E>,
        E: From<MathError>,
    {
        let h = self.step;
        let (a, b, c) = self.second_order_points(x)?;
        let (fa, fb, fc) = (f(a)?, f(b)?, f(c)?);
        check_lengths(&fa, &fb)?;
        check_lengths(&fb, &fc)?;
        Ok((fa - fb * 2.0 + fc) / (h * h))
    }

    fn second_order_points(&self, x: f64) -> MathResult<(f64, f64, f64)> {
        let h = self.step;
        Ok(match self.effective_scheme(x, 2.0)? {
            FiniteDifferenceType::Forward => (x + 2.0 * h, x + h, x),
            FiniteDifferenceType::Central => (x + h, x, x - h),
            FiniteDifferenceType::Backward => (x, x - h, x - 2.0 * h),
        })
    }
}

fn check_lengths(a: &DVector<f64>, b: &DVector<f64>) -> MathResult<()> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(MathError::DimensionMismatch {
            rows1: a.len(),
            cols1: 1,
            rows2: b.len(),
            cols2: 1,
        })
    }
}
