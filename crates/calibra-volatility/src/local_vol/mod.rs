//! Local volatility calibration.
//!
//! Two calculators turn a surface of implied volatilities or call prices
//! into local volatility:
//!
//! - [`ImpliedTrinomialTreeLocalVolatilityCalculator`] builds an implied
//!   trinomial tree and returns the local volatility at its nodes as an
//!   [`InterpolatedNodalSurface`](crate::surface::InterpolatedNodalSurface).
//! - [`DupireLocalVolatilityCalculator`] returns a [`DeformedSurface`] that
//!   applies Dupire's formula lazily at each queried point, together with
//!   the sensitivity to every parameter of the input surface.
//!
//! Rates are given as curves of continuously compounded zero rates against
//! time in years.

mod dupire;
mod implied_tree;

pub use dupire::{DeformedSurface, DupireInput, DupireLocalVolatilityCalculator, ValueDerivatives};
pub use implied_tree::ImpliedTrinomialTreeLocalVolatilityCalculator;

use calibra_curves::CurveRef;

use crate::error::VolatilityResult;
use crate::surface::SurfaceRef;

/// Derives local volatility from an implied volatility or call price surface.
///
/// Input surfaces have time on the x axis and strike on the y axis.
pub trait LocalVolatilityCalculator {
    /// The local volatility surface produced.
    type Output;

    /// Local volatility from a surface of Black-Scholes implied volatilities.
    fn local_volatility_from_implied_volatility(
        &self,
        implied_volatility: &SurfaceRef,
        spot: f64,
        interest_rate: &CurveRef,
        dividend_rate: &CurveRef,
    ) -> VolatilityResult<Self::Output>;

    /// Local volatility from a surface of European call prices.
    fn local_volatility_from_price(
        &self,
        call_price: &SurfaceRef,
        spot: f64,
        interest_rate: &CurveRef,
        dividend_rate: &CurveRef,
    ) -> VolatilityResult<Self::Output>;
}
