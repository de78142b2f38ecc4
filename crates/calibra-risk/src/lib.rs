//! # Calibra Risk
//!
//! Sensitivities of rates valuations to curve parameters.
//!
//! - [`RatesFiniteDifferenceSensitivityCalculator`]: bump each node of each
//!   curve of an [`ImmutableRatesProvider`](calibra_curves::ImmutableRatesProvider)
//!   and revalue.
//! - [`curve_sensitivity`]: invert market-quote Jacobians and rebucket
//!   sensitivities onto a grid of dates.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod curve_sensitivity;
pub mod error;
pub mod finite_difference;

pub use config::FiniteDifferenceConfig;
pub use curve_sensitivity::{
    jacobian_from_market_quote_sensitivities, linear_rebucketing, linear_rebucketing_with_tenors,
    CurveParameterSize,
};
pub use error::{RiskError, RiskResult};
pub use finite_difference::RatesFiniteDifferenceSensitivityCalculator;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::FiniteDifferenceConfig;
    pub use crate::curve_sensitivity::*;
    pub use crate::error::{RiskError, RiskResult};
    pub use crate::finite_difference::RatesFiniteDifferenceSensitivityCalculator;
}
