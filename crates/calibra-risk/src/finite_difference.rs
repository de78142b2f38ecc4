//! Curve sensitivities by bump and revalue.
//!
//! ## Formula
//!
//! ```text
//! ∂V/∂pᵢ ≈ (V(p + h·eᵢ) - V(p)) / h
//! ```
//!
//! where `h` is the absolute shift and `eᵢ` moves parameter `i` of one
//! curve only. Every bumped value comes from a fresh snapshot, so the
//! revaluations of one curve are independent and run in parallel.

use calibra_core::CurrencyAmount;
use calibra_core::Validate;
use calibra_curves::{
    CurrencyParameterSensitivities, CurrencyParameterSensitivity, Curve, CurveRef,
    ImmutableRatesProvider,
};
use rayon::prelude::*;
use tracing::debug;

use crate::config::FiniteDifferenceConfig;
use crate::error::{RiskError, RiskResult};

/// Forward-difference sensitivity to every node of every curve of a
/// rates provider.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use calibra_core::{Currency, CurrencyAmount, Date};
/// use calibra_curves::prelude::*;
/// use calibra_risk::RatesFiniteDifferenceSensitivityCalculator;
///
/// let curve =
///     InterpolatedNodalCurve::zero_rates("USD-Disc", vec![1.0, 5.0], vec![0.03, 0.035]).unwrap();
/// let provider = ImmutableRatesProvider::new(Date::from_ymd(2024, 1, 2).unwrap())
///     .with_discount_curve(Currency::USD, Arc::new(curve));
///
/// let calculator = RatesFiniteDifferenceSensitivityCalculator::default();
/// let sensitivities = calculator
///     .sensitivity(&provider, |p| {
///         p.discount_factor(Currency::USD, 5.0)
///             .map(|df| CurrencyAmount::new(Currency::USD, 1_000_000.0 * df))
///     })
///     .unwrap();
/// assert_eq!(sensitivities.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RatesFiniteDifferenceSensitivityCalculator {
    config: FiniteDifferenceConfig,
}

impl RatesFiniteDifferenceSensitivityCalculator {
    /// Creates a calculator.
    ///
    /// # Errors
    ///
    /// Fails if the shift is not positive.
    pub fn new(config: FiniteDifferenceConfig) -> RiskResult<Self> {
        config.validate_or_error()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &FiniteDifferenceConfig {
        &self.config
    }

    /// Sensitivity of `valuation_fn` to each parameter of each discount and
    /// forward curve of `provider`.
    ///
    /// Entries are keyed by curve name and by the currency of the value.
    /// A curve used both for discounting and for an index gets one entry
    /// holding the sum of both.
    ///
    /// # Errors
    ///
    /// Returns `CurveNotNodal` for a curve that is not an
    /// [`InterpolatedNodalCurve`](calibra_curves::InterpolatedNodalCurve),
    /// and `InvalidParameter` if a bumped value comes back in another
    /// currency. Failures of `valuation_fn` are passed through.
    pub fn sensitivity<F, E>(
        &self,
        provider: &ImmutableRatesProvider,
        valuation_fn: F,
    ) -> RiskResult<CurrencyParameterSensitivities>
    where
        F: Fn(&ImmutableRatesProvider) -> Result<CurrencyAmount, E> + Sync,
        RiskError: From<E>,
    {
        let base = valuation_fn(provider)?;
        let mut result = CurrencyParameterSensitivities::empty();
        for (currency, curve) in provider.discount_curves() {
            let sensitivity = self.curve_sensitivity(curve, base, &valuation_fn, |bumped| {
                provider.clone().with_discount_curve(currency, bumped)
            })?;
            result = result.combined_with_one(sensitivity)?;
        }
        for (index, curve) in provider.index_curves() {
            let sensitivity = self.curve_sensitivity(curve, base, &valuation_fn, |bumped| {
                provider.clone().with_index_curve(index, bumped)
            })?;
            result = result.combined_with_one(sensitivity)?;
        }
        Ok(result)
    }

    fn curve_sensitivity<F, E, B>(
        &self,
        curve: &CurveRef,
        base: CurrencyAmount,
        valuation_fn: &F,
        rebuild: B,
    ) -> RiskResult<CurrencyParameterSensitivity>
    where
        F: Fn(&ImmutableRatesProvider) -> Result<CurrencyAmount, E> + Sync,
        RiskError: From<E>,
        B: Fn(CurveRef) -> ImmutableRatesProvider + Sync,
    {
        let nodal = curve
            .as_nodal()
            .ok_or_else(|| RiskError::curve_not_nodal(curve.name().as_str()))?;
        let count = nodal.parameter_count();
        let shift = self.config.shift;
        debug!(curve = %curve.name(), parameters = count, shift, "finite difference sensitivity");

        let bump = |index: usize| -> RiskResult<f64> {
            let bumped = rebuild(nodal.with_perturbation(index, shift)?);
            let value = valuation_fn(&bumped)?;
            if value.currency() != base.currency() {
                return Err(RiskError::invalid_parameter(format!(
                    "bumped value in {}, base value in {}",
                    value.currency(),
                    base.currency()
                )));
            }
            Ok((value.amount() - base.amount()) / shift)
        };
        let sensitivity = if self.config.parallel {
            (0..count).into_par_iter().map(bump).collect::<RiskResult<Vec<_>>>()?
        } else {
            (0..count).map(bump).collect::<RiskResult<Vec<_>>>()?
        };

        let metadata = (0..count).map(|i| nodal.parameter_metadata(i)).collect();
        Ok(CurrencyParameterSensitivity::new(
            curve.name().clone(),
            base.currency(),
            metadata,
            sensitivity,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use calibra_core::{Currency, Date};
    use calibra_curves::{
        ConstantCurve, CurveError, CurveMetadata, InterpolatedNodalCurve, RateIndex,
    };
    use std::sync::Arc;

    const TIMES: [f64; 3] = [1.0, 2.0, 5.0];

    fn curve(name: &str, rates: Vec<f64>) -> CurveRef {
        Arc::new(InterpolatedNodalCurve::zero_rates(name, TIMES.to_vec(), rates).unwrap())
    }

    fn provider() -> ImmutableRatesProvider {
        ImmutableRatesProvider::new(Date::from_ymd(2024, 1, 2).unwrap())
            .with_discount_curve(Currency::USD, curve("USD-Disc", vec![0.03, 0.032, 0.035]))
            .with_index_curve(
                RateIndex::Sofr,
                curve("USD-SOFR", vec![0.031, 0.033, 0.036]),
            )
    }

    /// Sum of time times rate over the nodes of every curve.
    fn weighted_rates(provider: &ImmutableRatesProvider) -> Result<CurrencyAmount, CurveError> {
        let curves = provider
            .discount_curves()
            .map(|(_, c)| c)
            .chain(provider.index_curves().map(|(_, c)| c));
        let mut total = 0.0;
        for curve in curves {
            let nodal = curve
                .as_nodal()
                .ok_or_else(|| CurveError::invalid_curve("not nodal"))?;
            total += nodal
                .x_values()
                .iter()
                .zip(nodal.y_values())
                .map(|(x, y)| x * y)
                .sum::<f64>();
        }
        Ok(CurrencyAmount::new(Currency::USD, total))
    }

    #[test]
    fn test_linear_value_gives_node_times() {
        let calculator = RatesFiniteDifferenceSensitivityCalculator::default();
        let result = calculator.sensitivity(&provider(), weighted_rates).unwrap();

        assert_eq!(result.len(), 2);
        for name in ["USD-Disc", "USD-SOFR"] {
            let s = result.find(&name.into(), Currency::USD).unwrap();
            assert_eq!(s.parameter_count(), 3);
            for (value, t) in s.sensitivity().iter().zip(TIMES) {
                assert_relative_eq!(*value, t, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let valuation = |p: &ImmutableRatesProvider| {
            p.discount_factor(Currency::USD, 3.0)
                .map(|df| CurrencyAmount::new(Currency::USD, 100.0 * df))
        };
        let parallel = RatesFiniteDifferenceSensitivityCalculator::default()
            .sensitivity(&provider(), valuation)
            .unwrap();
        let sequential = RatesFiniteDifferenceSensitivityCalculator::new(FiniteDifferenceConfig {
            parallel: false,
            ..FiniteDifferenceConfig::default()
        })
        .unwrap()
        .sensitivity(&provider(), valuation)
        .unwrap();
        assert_eq!(parallel, sequential);

        // the forward curve does not enter the value
        let fwd = parallel.find(&"USD-SOFR".into(), Currency::USD).unwrap();
        assert!(fwd.sensitivity().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_constant_curve_is_rejected() {
        let provider = provider().with_discount_curve(
            Currency::EUR,
            Arc::new(ConstantCurve::new(CurveMetadata::zero_rates("EUR-Disc"), 0.02)),
        );
        // the valuation itself accepts any curve kind
        let valuation = |p: &ImmutableRatesProvider| {
            p.discount_factor(Currency::USD, 1.5)
                .map(|df| CurrencyAmount::new(Currency::USD, df))
        };
        let result =
            RatesFiniteDifferenceSensitivityCalculator::default().sensitivity(&provider, valuation);
        assert!(matches!(
            result,
            Err(RiskError::CurveNotNodal { name }) if name == "EUR-Disc"
        ));
    }

    #[test]
    fn test_currency_change_is_rejected() {
        let base = provider();
        let base_rate = base.zero_rate(Currency::USD, 1.0).unwrap();
        let valuation = move |p: &ImmutableRatesProvider| -> RiskResult<CurrencyAmount> {
            let rate = p.zero_rate(Currency::USD, 1.0)?;
            let currency = if rate == base_rate {
                Currency::USD
            } else {
                Currency::EUR
            };
            Ok(CurrencyAmount::new(currency, rate))
        };
        assert!(matches!(
            RatesFiniteDifferenceSensitivityCalculator::default().sensitivity(&base, valuation),
            Err(RiskError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_invalid_shift() {
        let config = FiniteDifferenceConfig::with_shift(0.0);
        assert!(RatesFiniteDifferenceSensitivityCalculator::new(config).is_err());
    }
}
