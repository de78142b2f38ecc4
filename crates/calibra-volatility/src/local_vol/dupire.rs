//! Dupire local volatility with parameter sensitivities.
//!
//! The calculator returns a [`DeformedSurface`]: nothing is computed until
//! the surface is queried. Each query differentiates the source surface
//! numerically in time and strike, carrying the source's parameter
//! sensitivities through every finite difference, and combines the results
//! with Dupire's formula.
//!
//! For a surface of call prices `C(T, K)`:
//!
//! ```text
//! σ²(T, K) = 2 (∂C/∂T + q C + (r - q) K ∂C/∂K) / (K² ∂²C/∂K²)
//! ```
//!
//! For a surface of implied volatilities `σ̂(T, K)`, with
//! `h₁ = (ln(S/K) + (r - q + σ̂²/2) T) / σ̂` and `h₂ = h₁ - σ̂ T`:
//!
//! ```text
//!             σ̂ (σ̂ + 2T (∂σ̂/∂T + (r - q) K ∂σ̂/∂K))
//! σ²(T, K) = ------------------------------------------------------------
//!            1 + 2 h₁ K ∂σ̂/∂K + K² (h₁ h₂ (∂σ̂/∂K)² + T σ̂ ∂²σ̂/∂K²)
//! ```
//!
//! Rates are read from zero-rate curves at the query time.

use std::iter;
use std::sync::Arc;

use calibra_core::market::ValueType;
use calibra_core::Validate;
use calibra_curves::CurveRef;
use calibra_math::differentiation::{Differentiator, FiniteDifferenceType};
use nalgebra::DVector;

use super::LocalVolatilityCalculator;
use crate::config::DupireConfig;
use crate::error::{VolatilityError, VolatilityResult};
use crate::surface::{Surface, SurfaceMetadata, SurfaceRef};

/// What the source surface of a [`DeformedSurface`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DupireInput {
    /// European call prices.
    Price,
    /// Black-Scholes implied volatilities.
    ImpliedVolatility,
}

/// A value and its derivatives with respect to a list of parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDerivatives {
    /// The value.
    pub value: f64,
    /// Derivative of the value with respect to each parameter.
    pub derivatives: Vec<f64>,
}

/// Local volatility computed by Dupire's formula.
#[derive(Debug, Clone, Default)]
pub struct DupireLocalVolatilityCalculator {
    config: DupireConfig,
}

impl DupireLocalVolatilityCalculator {
    /// Creates a calculator.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid.
    pub fn new(config: DupireConfig) -> VolatilityResult<Self> {
        config.validate_or_error()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DupireConfig {
        &self.config
    }

    fn deform(
        &self,
        source: &SurfaceRef,
        input: DupireInput,
        spot: f64,
        interest_rate: &CurveRef,
        dividend_rate: &CurveRef,
    ) -> VolatilityResult<DeformedSurface> {
        if !(spot.is_finite() && spot > 0.0) {
            return Err(VolatilityError::invalid_parameter(format!(
                "spot must be positive, got {spot}"
            )));
        }
        let differentiator = Differentiator::new(FiniteDifferenceType::Central, self.config.step)?
            .with_domain(0.0, f64::INFINITY);
        let metadata = SurfaceMetadata::new(
            format!("{}-LocalVol", source.name()).as_str(),
            ValueType::LocalVolatility,
        )
        .with_parameter_metadata(source.metadata().parameter_metadata.clone());

        Ok(DeformedSurface {
            metadata,
            source: Arc::clone(source),
            input,
            spot,
            interest_rate: Arc::clone(interest_rate),
            dividend_rate: Arc::clone(dividend_rate),
            time_differentiator: differentiator,
            strike_differentiator: differentiator,
            small_strike: self.config.small_strike,
        })
    }
}

impl LocalVolatilityCalculator for DupireLocalVolatilityCalculator {
    type Output = DeformedSurface;

    fn local_volatility_from_implied_volatility(
        &self,
        implied_volatility: &SurfaceRef,
        spot: f64,
        interest_rate: &CurveRef,
        dividend_rate: &CurveRef,
    ) -> VolatilityResult<DeformedSurface> {
        self.deform(
            implied_volatility,
            DupireInput::ImpliedVolatility,
            spot,
            interest_rate,
            dividend_rate,
        )
    }

    fn local_volatility_from_price(
        &self,
        call_price: &SurfaceRef,
        spot: f64,
        interest_rate: &CurveRef,
        dividend_rate: &CurveRef,
    ) -> VolatilityResult<DeformedSurface> {
        self.deform(
            call_price,
            DupireInput::Price,
            spot,
            interest_rate,
            dividend_rate,
        )
    }
}

/// Local volatility evaluated on demand from a source surface.
///
/// The parameters are those of the source surface; bumping one rebuilds the
/// deformed surface over the bumped source.
#[derive(Debug, Clone)]
pub struct DeformedSurface {
    metadata: SurfaceMetadata,
    source: SurfaceRef,
    input: DupireInput,
    spot: f64,
    interest_rate: CurveRef,
    dividend_rate: CurveRef,
    time_differentiator: Differentiator,
    strike_differentiator: Differentiator,
    small_strike: f64,
}

/// Source values and first and second partial derivatives at one point.
///
/// Entry 0 of each vector is the surface value, the rest its parameter
/// sensitivities.
struct Partials {
    value: DVector<f64>,
    d_time: DVector<f64>,
    d_strike: DVector<f64>,
    d_strike2: DVector<f64>,
}

impl DeformedSurface {
    /// Returns the source surface.
    #[must_use]
    pub fn source(&self) -> &SurfaceRef {
        &self.source
    }

    /// Returns what the source surface holds.
    #[must_use]
    pub fn input(&self) -> DupireInput {
        self.input
    }

    /// Local volatility at `(time, strike)` and its sensitivity to each
    /// parameter of the source surface.
    ///
    /// # Errors
    ///
    /// Returns `NegativeVariance` if the source surface admits arbitrage at
    /// this point, and propagates failures of the source surface or rate
    /// curves.
    pub fn evaluate(&self, time: f64, strike: f64) -> VolatilityResult<ValueDerivatives> {
        let rate = self.interest_rate.y_value(time)?;
        let dividend = self.dividend_rate.y_value(time)?;

        let (variance, variance_sensitivity) = match self.input {
            DupireInput::ImpliedVolatility if strike < self.small_strike => {
                let value = self.field(time, strike)?;
                let d_time = self
                    .time_differentiator
                    .first_derivative_vector(|t| self.field(t, strike), time)?;
                small_strike_variance(time, &value, &d_time)
            }
            DupireInput::ImpliedVolatility => {
                let partials = self.partials(time, strike)?;
                self.implied_volatility_variance(time, strike, rate, dividend, &partials)
            }
            DupireInput::Price => {
                let partials = self.partials(time, strike)?;
                price_variance(strike, rate, dividend, &partials)
            }
        };

        if variance.is_nan() || variance < 0.0 {
            return Err(VolatilityError::negative_variance(time, strike, variance));
        }
        let value = variance.sqrt();
        let derivatives = if value == 0.0 {
            vec![0.0; variance_sensitivity.len()]
        } else {
            variance_sensitivity
                .iter()
                .map(|dv| dv / (2.0 * value))
                .collect()
        };
        Ok(ValueDerivatives { value, derivatives })
    }

    /// The source value at `(time, strike)` followed by its parameter sensitivities.
    fn field(&self, time: f64, strike: f64) -> VolatilityResult<DVector<f64>> {
        let value = self.source.z_value(time, strike)?;
        let sensitivity = self.source.z_value_parameter_sensitivity(time, strike)?;
        Ok(DVector::from_iterator(sensitivity.len() + 1, iter::once(value).chain(sensitivity)))
    }

    fn partials(&self, time: f64, strike: f64) -> VolatilityResult<Partials> {
        Ok(Partials {
            value: self.field(time, strike)?,
            d_time: self
                .time_differentiator
                .first_derivative_vector(|t| self.field(t, strike), time)?,
            d_strike: self
                .strike_differentiator
                .first_derivative_vector(|k| self.field(time, k), strike)?,
            d_strike2: self
                .strike_differentiator
                .second_derivative_vector(|k| self.field(time, k), strike)?,
        })
    }

    fn implied_volatility_variance(
        &self,
        time: f64,
        strike: f64,
        rate: f64,
        dividend: f64,
        partials: &Partials,
    ) -> (f64, Vec<f64>) {
        let Partials {
            value,
            d_time,
            d_strike,
            d_strike2,
        } = partials;
        let drift = rate - dividend;
        let (vol, vol_t, vol_k, vol_kk) = (value[0], d_time[0], d_strike[0], d_strike2[0]);

        let h1 = ((self.spot / strike).ln() + (drift + 0.5 * vol * vol) * time) / vol;
        let h2 = h1 - vol * time;
        let slope = vol_t + drift * strike * vol_k;
        let numerator = vol * (vol + 2.0 * time * slope);
        let denominator = 1.0
            + 2.0 * h1 * strike * vol_k
            + strike * strike * (h1 * h2 * vol_k * vol_k + time * vol * vol_kk);
        let variance = numerator / denominator;

        let sensitivity = (1..value.len())
            .map(|p| {
                let (vol_p, vol_tp, vol_kp, vol_kkp) =
                    (value[p], d_time[p], d_strike[p], d_strike2[p]);
                let h1_p = (time - h1 / vol) * vol_p;
                let h2_p = h1_p - time * vol_p;
                let numerator_p = vol_p * (vol + 2.0 * time * slope)
                    + vol * (vol_p + 2.0 * time * (vol_tp + drift * strike * vol_kp));
                let denominator_p = 2.0 * strike * (h1_p * vol_k + h1 * vol_kp)
                    + strike
                        * strike
                        * (h1_p * h2 * vol_k * vol_k
                            + h1 * h2_p * vol_k * vol_k
                            + 2.0 * h1 * h2 * vol_k * vol_kp
                            + time * (vol_p * vol_kk + vol * vol_kkp));
                (numerator_p * denominator - numerator * denominator_p)
                    / (denominator * denominator)
            })
            .collect();
        (variance, sensitivity)
    }
}

/// Variance from implied volatility as the strike goes to zero.
///
/// The strike terms vanish and local variance is the time derivative of
/// total implied variance.
fn small_strike_variance(
    time: f64,
    value: &DVector<f64>,
    d_time: &DVector<f64>,
) -> (f64, Vec<f64>) {
    let (vol, vol_t) = (value[0], d_time[0]);
    let variance = vol * vol + 2.0 * time * vol * vol_t;
    let sensitivity = (1..value.len())
        .map(|p| 2.0 * vol * value[p] + 2.0 * time * (value[p] * vol_t + vol * d_time[p]))
        .collect();
    (variance, sensitivity)
}

fn price_variance(strike: f64, rate: f64, dividend: f64, partials: &Partials) -> (f64, Vec<f64>) {
    let Partials {
        value,
        d_time,
        d_strike,
        d_strike2,
    } = partials;
    let drift = rate - dividend;
    let numerator_at = |p: usize| d_time[p] + dividend * value[p] + drift * strike * d_strike[p];
    let denominator_at = |p: usize| strike * strike * d_strike2[p];

    let numerator = numerator_at(0);
    let denominator = denominator_at(0);
    let variance = 2.0 * numerator / denominator;
    let sensitivity = (1..value.len())
        .map(|p| {
            2.0 * (numerator_at(p) * denominator - numerator * denominator_at(p))
                / (denominator * denominator)
        })
        .collect();
    (variance, sensitivity)
}

impl Surface for DeformedSurface {
    fn metadata(&self) -> &SurfaceMetadata {
        &self.metadata
    }

    fn parameter_count(&self) -> usize {
        self.source.parameter_count()
    }

    fn parameter(&self, index: usize) -> VolatilityResult<f64> {
        self.source.parameter(index)
    }

    fn with_parameter(&self, index: usize, value: f64) -> VolatilityResult<SurfaceRef> {
        let source = self.source.with_parameter(index, value)?;
        Ok(Arc::new(Self {
            source,
            ..self.clone()
        }))
    }

    fn z_value(&self, x: f64, y: f64) -> VolatilityResult<f64> {
        self.evaluate(x, y).map(|v| v.value)
    }

    fn z_value_parameter_sensitivity(&self, x: f64, y: f64) -> VolatilityResult<Vec<f64>> {
        self.evaluate(x, y).map(|v| v.derivatives)
    }
}
