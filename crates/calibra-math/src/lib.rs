//! # Calibra Math
//!
//! Numerical building blocks for the Calibra crates.
//!
//! This crate provides:
//!
//! - **Interpolation**: 1-D interpolators with parameter sensitivities and a
//!   2-D grid interpolator for scattered surface nodes
//! - **Extrapolation**: boundary policies shared by all interpolators
//! - **Differentiation**: finite-difference differentiators for scalar
//!   functions and vector fields, with an optional domain
//! - **Solvers**: Brent root finding
//! - **Linear Algebra**: matrix inversion and linear systems
//! - **Distributions**: the standard normal distribution
//!
//! ## Design Philosophy
//!
//! - **Explicit values**: differentiators and interpolators are plain values
//!   constructed by the caller, never shared global instances
//! - **Sensitivities first**: every interpolator reports the derivative of
//!   its value with respect to each node value

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]

pub mod differentiation;
pub mod distributions;
pub mod error;
pub mod extrapolation;
pub mod interpolation;
pub mod linear_algebra;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::differentiation::{Differentiator, FiniteDifferenceType};
    pub use crate::distributions::{normal_cdf, normal_pdf};
    pub use crate::error::{MathError, MathResult};
    pub use crate::extrapolation::ExtrapolationMethod;
    pub use crate::interpolation::{
        BoundGridInterpolator, BoundInterpolator, GridInterpolator, InterpolationMethod,
        Interpolator, LinearInterpolator, LogLinearInterpolator, TimeSquareInterpolator,
    };
    pub use crate::solvers::{brent, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};
