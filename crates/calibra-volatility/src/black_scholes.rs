//! Black-Scholes formulas with continuous rate and dividend yield.
//!
//! Used as the fallback price of the implied tree and to read the grid
//! volatility off a price surface.

use calibra_math::distributions::{normal_cdf, normal_pdf};
use calibra_math::solvers::{brent, SolverConfig};

use crate::error::{VolatilityError, VolatilityResult};
use crate::types::PutCall;

/// Lowest volatility searched by [`implied_volatility`].
pub const MIN_IMPLIED_VOLATILITY: f64 = 1e-6;

/// Highest volatility searched by [`implied_volatility`].
pub const MAX_IMPLIED_VOLATILITY: f64 = 5.0;

fn d1_d2(
    spot: f64,
    strike: f64,
    time: f64,
    volatility: f64,
    rate: f64,
    dividend: f64,
) -> (f64, f64) {
    let sig_sqrt_t = volatility * time.sqrt();
    let d1 = ((spot / strike).ln() + (rate - dividend + 0.5 * volatility * volatility) * time)
        / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

/// Price of a European option.
///
/// With no time or no volatility left the price is the discounted payoff
/// on the forward.
#[must_use]
pub fn price(
    put_call: PutCall,
    spot: f64,
    strike: f64,
    time: f64,
    volatility: f64,
    rate: f64,
    dividend: f64,
) -> f64 {
    let df_r = (-rate * time).exp();
    let df_q = (-dividend * time).exp();
    if time <= 0.0 || volatility <= 0.0 {
        return (put_call.sign() * (spot * df_q - strike * df_r)).max(0.0);
    }
    let (d1, d2) = d1_d2(spot, strike, time, volatility, rate, dividend);
    let sign = put_call.sign();
    sign * (spot * df_q * normal_cdf(sign * d1) - strike * df_r * normal_cdf(sign * d2))
}

/// Sensitivity of the price to volatility. Identical for calls and puts.
#[must_use]
pub fn vega(spot: f64, strike: f64, time: f64, volatility: f64, rate: f64, dividend: f64) -> f64 {
    if time <= 0.0 || volatility <= 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(spot, strike, time, volatility, rate, dividend);
    spot * (-dividend * time).exp() * normal_pdf(d1) * time.sqrt()
}

/// Volatility that reproduces `target` as a Black-Scholes price.
///
/// # Errors
///
/// Returns `InvalidParameter` when the price lies outside the range
/// reachable by volatilities in
/// [`MIN_IMPLIED_VOLATILITY`, `MAX_IMPLIED_VOLATILITY`].
pub fn implied_volatility(
    target: f64,
    put_call: PutCall,
    spot: f64,
    strike: f64,
    time: f64,
    rate: f64,
    dividend: f64,
) -> VolatilityResult<f64> {
    if time <= 0.0 {
        return Err(VolatilityError::invalid_parameter(format!(
            "implied volatility needs positive time, got {time}"
        )));
    }
    let objective = |vol: f64| price(put_call, spot, strike, time, vol, rate, dividend) - target;
    let low = objective(MIN_IMPLIED_VOLATILITY);
    let high = objective(MAX_IMPLIED_VOLATILITY);
    if low > 0.0 || high < 0.0 {
        return Err(VolatilityError::invalid_parameter(format!(
            "price {target} has no implied volatility for {put_call} strike {strike}, time {time}"
        )));
    }
    let result = brent(
        objective,
        MIN_IMPLIED_VOLATILITY,
        MAX_IMPLIED_VOLATILITY,
        &SolverConfig::new(1e-12, 200),
    )?;
    Ok(result.root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_price() {
        // Hull, spot 42, strike 40, 6 months, 10% rate, 20% vol
        let call = price(PutCall::Call, 42.0, 40.0, 0.5, 0.2, 0.1, 0.0);
        let put = price(PutCall::Put, 42.0, 40.0, 0.5, 0.2, 0.1, 0.0);
        assert_relative_eq!(call, 4.7594, epsilon = 1e-4);
        assert_relative_eq!(put, 0.8086, epsilon = 1e-4);
    }

    #[test]
    fn test_put_call_parity() {
        let (s, k, t, v, r, q) = (100.0, 95.0, 1.5, 0.3, 0.04, 0.02);
        let call = price(PutCall::Call, s, k, t, v, r, q);
        let put = price(PutCall::Put, s, k, t, v, r, q);
        assert_relative_eq!(
            call - put,
            s * (-q * t).exp() - k * (-r * t).exp(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_degenerate_inputs() {
        let expired = price(PutCall::Call, 110.0, 100.0, 0.0, 0.2, 0.05, 0.0);
        assert_relative_eq!(expired, 10.0);
        let zero_vol = price(PutCall::Put, 90.0, 100.0, 1.0, 0.0, 0.0, 0.0);
        assert_relative_eq!(zero_vol, 10.0, epsilon = 1e-12);
        assert_eq!(vega(100.0, 100.0, 0.0, 0.2, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_vega_matches_bump() {
        let (s, k, t, v, r, q) = (100.0, 110.0, 2.0, 0.25, 0.03, 0.01);
        let h = 1e-6;
        let call = |vol: f64| price(PutCall::Call, s, k, t, vol, r, q);
        let fd = (call(v + h) - call(v - h)) / (2.0 * h);
        assert_relative_eq!(vega(s, k, t, v, r, q), fd, epsilon = 1e-5);
    }

    #[test]
    fn test_implied_volatility_round_trip() {
        let cases = [
            (PutCall::Call, 80.0),
            (PutCall::Call, 120.0),
            (PutCall::Put, 90.0),
        ];
        for (put_call, strike) in cases {
            let target = price(put_call, 100.0, strike, 1.0, 0.27, 0.03, 0.01);
            let vol = implied_volatility(target, put_call, 100.0, strike, 1.0, 0.03, 0.01).unwrap();
            assert_relative_eq!(vol, 0.27, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_implied_volatility_out_of_bounds() {
        // below intrinsic value
        assert!(matches!(
            implied_volatility(1.0, PutCall::Call, 100.0, 80.0, 1.0, 0.0, 0.0),
            Err(VolatilityError::InvalidParameter { .. })
        ));
        assert!(implied_volatility(5.0, PutCall::Call, 100.0, 100.0, 0.0, 0.0, 0.0).is_err());
    }
}
