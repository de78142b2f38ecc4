//! # Calibra Curves
//!
//! Parameterized curves and the immutable market data snapshot that holds
//! them.
//!
//! ## Architecture
//!
//! - [`Curve`]: a curve described by a finite list of parameters. Changing a
//!   parameter never mutates the curve; it returns a new one.
//! - [`InterpolatedNodalCurve`]: the nodal curve, whose parameters are the
//!   y values of its nodes. Only nodal curves can be bumped node by node.
//! - [`ImmutableRatesProvider`]: discount curves per currency and forward
//!   curves per rate index, valid for one valuation date. Replacing a curve
//!   produces a new snapshot sharing every other curve.
//! - [`CurrencyParameterSensitivities`]: sensitivities to curve parameters,
//!   keyed by curve name and currency.
//!
//! ## Quick Start
//!
//! ```rust
//! use calibra_core::{Currency, Date};
//! use calibra_curves::prelude::*;
//! use std::sync::Arc;
//!
//! let curve = InterpolatedNodalCurve::zero_rates(
//!     "USD-Disc",
//!     vec![1.0, 2.0, 5.0],
//!     vec![0.03, 0.032, 0.035],
//! )
//! .unwrap();
//! let provider = ImmutableRatesProvider::new(Date::from_ymd(2024, 1, 2).unwrap())
//!     .with_discount_curve(Currency::USD, Arc::new(curve));
//!
//! let df = provider.discount_factor(Currency::USD, 2.0).unwrap();
//! assert!((df - (-0.064f64).exp()).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]

pub mod curves;
pub mod error;
pub mod index;
pub mod provider;
pub mod sensitivity;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::curves::{ConstantCurve, Curve, CurveMetadata, CurveRef, InterpolatedNodalCurve};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::index::RateIndex;
    pub use crate::provider::ImmutableRatesProvider;
    pub use crate::sensitivity::{CurrencyParameterSensitivities, CurrencyParameterSensitivity};
}

pub use curves::{ConstantCurve, Curve, CurveMetadata, CurveRef, InterpolatedNodalCurve};
pub use error::{CurveError, CurveResult};
pub use index::RateIndex;
pub use provider::ImmutableRatesProvider;
pub use sensitivity::{CurrencyParameterSensitivities, CurrencyParameterSensitivity};
