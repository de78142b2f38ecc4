//! Node storage shared by the 1-D interpolators.

use crate::error::{MathError, MathResult};
use crate::extrapolation::ExtrapolationMethod;

/// Where a query point falls relative to the nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Location {
    /// Evaluate the formula of segment `[index, index + 1]` at `x`.
    Segment { index: usize, x: f64 },
    /// Flat extrapolation from the node at `index`.
    Boundary { index: usize },
}

/// Validated, strictly increasing nodes plus the extrapolation policy.
#[derive(Debug, Clone)]
pub(crate) struct Nodes {
    pub(crate) xs: Vec<f64>,
    pub(crate) ys: Vec<f64>,
    pub(crate) extrapolation: ExtrapolationMethod,
}

impl Nodes {
    pub(crate) fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if xs.len() < 2 {
            return Err(MathError::insufficient_data(2, xs.len()));
        }
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return Err(MathError::invalid_input("node values must be finite"));
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MathError::invalid_input(
                "x values must be strictly increasing",
            ));
        }

        Ok(Self {
            xs,
            ys,
            extrapolation: ExtrapolationMethod::None,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.xs.len()
    }

    pub(crate) fn min_x(&self) -> f64 {
        self.xs[0]
    }

    pub(crate) fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    pub(crate) fn locate(&self, x: f64) -> MathResult<Location> {
        let (min, max) = (self.min_x(), self.max_x());
        if x < min || x > max {
            return match self.extrapolation {
                ExtrapolationMethod::None => {
                    Err(MathError::ExtrapolationNotAllowed { x, min, max })
                }
                ExtrapolationMethod::Flat => Ok(Location::Boundary {
                    index: if x < min { 0 } else { self.len() - 1 },
                }),
                ExtrapolationMethod::Linear => Ok(Location::Segment {
                    index: self.find_segment(x),
                    x,
                }),
            };
        }
        Ok(Location::Segment {
            index: self.find_segment(x),
            x,
        })
    }

    /// Finds the index i such that xs[i] <= x < xs[i+1], clamped to the end segments.
    fn find_segment(&self, x: f64) -> usize {
        let last = self.xs.len() - 2;
        match self
            .xs
            .binary_search_by(|node| node.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => i.min(last),
            Err(i) => i.saturating_sub(1).min(last),
        }
    }

    /// Weight of the right node of segment `index` at `x`.
    pub(crate) fn weight(&self, index: usize, x: f64) -> f64 {
        (x - self.xs[index]) / (self.xs[index + 1] - self.xs[index])
    }

    pub(crate) fn unit(&self, index: usize) -> Vec<f64> {
        let mut sensitivity = vec![0.0; self.len()];
        sensitivity[index] = 1.0;
        sensitivity
    }
}
