//! 2-D interpolation of scattered nodes.

use serde::{Deserialize, Serialize};

use super::{BoundInterpolator, InterpolationMethod, Interpolator};
use crate::error::{MathError, MathResult};
use crate::extrapolation::ExtrapolationMethod;

/// Interpolates a surface given as scattered `(x, y, z)` nodes.
///
/// Nodes sharing an `x` value form a slice. Each slice is interpolated in
/// `y`, then the slice values are interpolated in `x`. A slice holding a
/// single node is constant in `y`, and a surface holding a single slice is
/// constant in `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridInterpolator {
    /// Interpolation across slices.
    pub x_method: InterpolationMethod,
    /// Extrapolation across slices.
    pub x_extrapolation: ExtrapolationMethod,
    /// Interpolation within a slice.
    pub y_method: InterpolationMethod,
    /// Extrapolation within a slice.
    pub y_extrapolation: ExtrapolationMethod,
}

impl Default for GridInterpolator {
    /// Time-square in x and linear in y, both with flat extrapolation.
    fn default() -> Self {
        Self::new(
            InterpolationMethod::TimeSquare,
            ExtrapolationMethod::Flat,
            InterpolationMethod::Linear,
            ExtrapolationMethod::Flat,
        )
    }
}

impl GridInterpolator {
    /// Creates a grid interpolator.
    #[must_use]
    pub fn new(
        x_method: InterpolationMethod,
        x_extrapolation: ExtrapolationMethod,
        y_method: InterpolationMethod,
        y_extrapolation: ExtrapolationMethod,
    ) -> Self {
        Self {
            x_method,
            x_extrapolation,
            y_method,
            y_extrapolation,
        }
    }

    /// Binds the interpolator to a set of nodes.
    ///
    /// Node order is free. The parameter sensitivity of the bound
    /// interpolator is reported in the order the nodes were given.
    ///
    /// # Errors
    ///
    /// Fails if the inputs are empty, of different lengths, or if two nodes
    /// share both coordinates.
    pub fn bind(&self, xs: &[f64], ys: &[f64], zs: &[f64]) -> MathResult<BoundGridInterpolator> {
        if xs.is_empty() {
            return Err(MathError::insufficient_data(1, 0));
        }
        if xs.len() != ys.len() || xs.len() != zs.len() {
            return Err(MathError::invalid_input(format!(
                "grid nodes must have equal lengths: {}, {}, {}",
                xs.len(),
                ys.len(),
                zs.len()
            )));
        }

        let mut order: Vec<usize> = (0..xs.len()).collect();
        order.sort_by(|&a, &b| {
            xs[a]
                .total_cmp(&xs[b])
                .then_with(|| ys[a].total_cmp(&ys[b]))
        });

        let mut slices: Vec<Slice> = Vec::new();
        let mut start = 0;
        while start < order.len() {
            let x = xs[order[start]];
            let end = order[start..]
                .iter()
                .position(|&i| xs[i] != x)
                .map_or(order.len(), |offset| start + offset);
            let indices = order[start..end].to_vec();
            let curve = if indices.len() == 1 {
                SliceCurve::Constant(zs[indices[0]])
            } else {
                SliceCurve::Bound(self.y_method.bind(
                    indices.iter().map(|&i| ys[i]).collect(),
                    indices.iter().map(|&i| zs[i]).collect(),
                    self.y_extrapolation,
                )?)
            };
            slices.push(Slice { x, indices, curve });
            start = end;
        }

        Ok(BoundGridInterpolator {
            config: *self,
            slices,
            parameter_count: xs.len(),
        })
    }
}

#[derive(Debug, Clone)]
enum SliceCurve {
    Constant(f64),
    Bound(BoundInterpolator),
}

#[derive(Debug, Clone)]
struct Slice {
    x: f64,
    /// Positions of this slice's nodes in the caller's node order.
    indices: Vec<usize>,
    curve: SliceCurve,
}

impl Slice {
    fn value(&self, y: f64) -> MathResult<f64> {
        match &self.curve {
            SliceCurve::Constant(z) => Ok(*z),
            SliceCurve::Bound(interp) => interp.interpolate(y),
        }
    }

    fn sensitivity(&self, y: f64) -> MathResult<Vec<f64>> {
        match &self.curve {
            SliceCurve::Constant(_) => Ok(vec![1.0]),
            SliceCurve::Bound(interp) => interp.parameter_sensitivity(y),
        }
    }
}

/// A [`GridInterpolator`] bound to its nodes.
#[derive(Debug, Clone)]
pub struct BoundGridInterpolator {
    config: GridInterpolator,
    slices: Vec<Slice>,
    parameter_count: usize,
}

impl BoundGridInterpolator {
    /// Returns the number of nodes.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    /// Returns the distinct x values, ascending.
    #[must_use]
    pub fn slice_xs(&self) -> Vec<f64> {
        self.slices.iter().map(|s| s.x).collect()
    }

    /// Interpolates across slices given each slice's value at the query y.
    fn across(&self, values: Vec<f64>) -> MathResult<Option<BoundInterpolator>> {
        if self.slices.len() == 1 {
            return Ok(None);
        }
        self.config
            .x_method
            .bind(self.slice_xs(), values, self.config.x_extrapolation)
            .map(Some)
    }

    /// Returns the interpolated value at `(x, y)`.
    pub fn interpolate(&self, x: f64, y: f64) -> MathResult<f64> {
        let values = self
            .slices
            .iter()
            .map(|s| s.value(y))
            .collect::<MathResult<Vec<_>>>()?;
        match self.across(values.clone())? {
            Some(interp) => interp.interpolate(x),
            None => Ok(values[0]),
        }
    }

    /// Returns the derivative of the value at `(x, y)` with respect to each node.
    pub fn parameter_sensitivity(&self, x: f64, y: f64) -> MathResult<Vec<f64>> {
        let values = self
            .slices
            .iter()
            .map(|s| s.value(y))
            .collect::<MathResult<Vec<_>>>()?;
        let weights = match self.across(values)? {
            Some(interp) => interp.parameter_sensitivity(x)?,
            None => vec![1.0],
        };

        let mut sensitivity = vec![0.0; self.parameter_count];
        for (slice, weight) in self.slices.iter().zip(weights) {
            if weight == 0.0 {
                continue;
            }
            for (&node, s) in slice.indices.iter().zip(slice.sensitivity(y)?) {
                sensitivity[node] += weight * s;
            }
        }
        Ok(sensitivity)
    }
}
