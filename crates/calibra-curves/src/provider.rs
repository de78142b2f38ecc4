//! Immutable rates provider.

use std::collections::BTreeMap;

use calibra_core::market::ValueType;
use calibra_core::{Currency, Date};

use crate::curves::CurveRef;
use crate::error::{CurveError, CurveResult};
use crate::index::RateIndex;

/// Days per year of the ACT/365F convention used to measure curve time.
const DAYS_PER_YEAR: f64 = 365.0;

/// A snapshot of rates market data for one valuation date.
///
/// Holds a discount curve per currency and a forward curve per rate index.
/// Curves are shared through [`CurveRef`], so replacing one curve produces a
/// new provider that still shares every other curve with the original. No
/// method mutates a provider after construction.
///
/// Curve x values are year fractions from the valuation date. Zero-rate
/// curves hold continuously compounded rates; discount-factor curves hold
/// discount factors.
#[derive(Debug, Clone)]
pub struct ImmutableRatesProvider {
    valuation_date: Date,
    discount_curves: BTreeMap<Currency, CurveRef>,
    index_curves: BTreeMap<RateIndex, CurveRef>,
}

impl ImmutableRatesProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new(valuation_date: Date) -> Self {
        Self {
            valuation_date,
            discount_curves: BTreeMap::new(),
            index_curves: BTreeMap::new(),
        }
    }

    /// Returns a provider with the discount curve for `currency` set.
    #[must_use]
    pub fn with_discount_curve(mut self, currency: Currency, curve: CurveRef) -> Self {
        self.discount_curves.insert(currency, curve);
        self
    }

    /// Returns a provider with the forward curve for `index` set.
    #[must_use]
    pub fn with_index_curve(mut self, index: RateIndex, curve: CurveRef) -> Self {
        self.index_curves.insert(index, curve);
        self
    }

    /// Returns the valuation date.
    #[must_use]
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// Returns the discount curve for a currency.
    pub fn discount_curve(&self, currency: Currency) -> CurveResult<&CurveRef> {
        self.discount_curves
            .get(&currency)
            .ok_or_else(|| CurveError::curve_not_found(format!("{currency} discount")))
    }

    /// Returns the forward curve for an index.
    pub fn index_curve(&self, index: RateIndex) -> CurveResult<&CurveRef> {
        self.index_curves
            .get(&index)
            .ok_or_else(|| CurveError::curve_not_found(format!("{index} forward")))
    }

    /// Discount curves, ordered by currency.
    pub fn discount_curves(&self) -> impl Iterator<Item = (Currency, &CurveRef)> {
        self.discount_curves.iter().map(|(c, curve)| (*c, curve))
    }

    /// Forward curves, ordered by index.
    pub fn index_curves(&self) -> impl Iterator<Item = (RateIndex, &CurveRef)> {
        self.index_curves.iter().map(|(i, curve)| (*i, curve))
    }

    /// Year fraction from the valuation date to `date`, ACT/365F.
    #[must_use]
    pub fn year_fraction(&self, date: Date) -> f64 {
        self.valuation_date.days_between(&date) as f64 / DAYS_PER_YEAR
    }

    /// Discount factor in `currency` at time `t`.
    pub fn discount_factor(&self, currency: Currency, t: f64) -> CurveResult<f64> {
        discount_factor_on(self.discount_curve(currency)?, t)
    }

    /// Continuously compounded zero rate in `currency` at time `t`.
    ///
    /// At `t = 0` the rate of a zero-rate curve is read directly; a
    /// discount-factor curve has no defined rate there.
    pub fn zero_rate(&self, currency: Currency, t: f64) -> CurveResult<f64> {
        let curve = self.discount_curve(currency)?;
        if curve.metadata().y_value_type == ValueType::ZeroRate {
            return curve.y_value(t);
        }
        if t <= 0.0 {
            return Err(CurveError::invalid_curve(format!(
                "zero rate undefined at time {t}"
            )));
        }
        Ok(-discount_factor_on(curve, t)?.ln() / t)
    }

    /// Simply compounded forward rate of `index` between `t1` and `t2`.
    pub fn index_forward_rate(&self, index: RateIndex, t1: f64, t2: f64) -> CurveResult<f64> {
        if t2 <= t1 {
            return Err(CurveError::invalid_curve(format!(
                "forward period [{t1}, {t2}] is empty"
            )));
        }
        let curve = self.index_curve(index)?;
        let df1 = discount_factor_on(curve, t1)?;
        let df2 = discount_factor_on(curve, t2)?;
        Ok((df1 / df2 - 1.0) / (t2 - t1))
    }

    /// Returns a provider holding the curves of both.
    ///
    /// # Errors
    ///
    /// Fails if the valuation dates differ or a currency or index appears
    /// in both.
    pub fn combined_with(&self, other: &ImmutableRatesProvider) -> CurveResult<Self> {
        if self.valuation_date != other.valuation_date {
            return Err(CurveError::valuation_date_mismatch(
                self.valuation_date,
                other.valuation_date,
            ));
        }
        let mut combined = self.clone();
        for (currency, curve) in &other.discount_curves {
            if combined
                .discount_curves
                .insert(*currency, curve.clone())
                .is_some()
            {
                return Err(CurveError::DuplicateCurve {
                    name: format!("{currency} discount"),
                });
            }
        }
        for (index, curve) in &other.index_curves {
            if combined.index_curves.insert(*index, curve.clone()).is_some() {
                return Err(CurveError::DuplicateCurve {
                    name: format!("{index} forward"),
                });
            }
        }
        Ok(combined)
    }
}

fn discount_factor_on(curve: &CurveRef, t: f64) -> CurveResult<f64> {
    match curve.metadata().y_value_type {
        ValueType::ZeroRate => Ok((-curve.y_value(t)? * t).exp()),
        ValueType::DiscountFactor => curve.y_value(t),
        other => Err(CurveError::invalid_curve(format!(
            "curve {} holds {other}, not zero rates or discount factors",
            curve.name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::{ConstantCurve, CurveMetadata, InterpolatedNodalCurve};
    use approx::assert_relative_eq;
    use calibra_core::market::CurveName;
    use std::sync::Arc;

    fn date() -> Date {
        Date::from_ymd(2024, 1, 2).unwrap()
    }

    fn provider() -> ImmutableRatesProvider {
        let usd = InterpolatedNodalCurve::zero_rates("USD-Disc", vec![1.0, 5.0], vec![0.04, 0.05])
            .unwrap();
        let sofr = InterpolatedNodalCurve::zero_rates("USD-SOFR", vec![1.0, 5.0], vec![0.045, 0.05])
            .unwrap();
        ImmutableRatesProvider::new(date())
            .with_discount_curve(Currency::USD, Arc::new(usd))
            .with_index_curve(RateIndex::Sofr, Arc::new(sofr))
    }

    #[test]
    fn test_discount_factor_and_zero_rate() {
        let p = provider();
        assert_relative_eq!(
            p.discount_factor(Currency::USD, 3.0).unwrap(),
            (-0.045f64 * 3.0).exp(),
            epsilon = 1e-14
        );
        assert_relative_eq!(
            p.zero_rate(Currency::USD, 3.0).unwrap(),
            0.045,
            epsilon = 1e-14
        );
        assert!(p.discount_factor(Currency::EUR, 1.0).is_err());
    }

    #[test]
    fn test_discount_factor_curve() {
        let curve = ConstantCurve::new(CurveMetadata::discount_factors("EUR-DF"), 0.9);
        let p =
            ImmutableRatesProvider::new(date()).with_discount_curve(Currency::EUR, Arc::new(curve));
        assert_relative_eq!(p.discount_factor(Currency::EUR, 2.0).unwrap(), 0.9);
        assert_relative_eq!(
            p.zero_rate(Currency::EUR, 2.0).unwrap(),
            -(0.9f64.ln()) / 2.0,
            epsilon = 1e-14
        );
        assert!(p.zero_rate(Currency::EUR, 0.0).is_err());
    }

    #[test]
    fn test_forward_rate() {
        let p = provider();
        let df1 = (-0.045f64).exp();
        let df2 = (-0.05f64 * 5.0).exp();
        assert_relative_eq!(
            p.index_forward_rate(RateIndex::Sofr, 1.0, 5.0).unwrap(),
            (df1 / df2 - 1.0) / 4.0,
            epsilon = 1e-14
        );
        assert!(p.index_forward_rate(RateIndex::Sofr, 2.0, 2.0).is_err());
    }

    #[test]
    fn test_year_fraction() {
        let p = provider();
        assert_relative_eq!(p.year_fraction(Date::from_ymd(2025, 1, 1).unwrap()), 1.0);
    }

    #[test]
    fn test_replacing_a_curve_leaves_original() {
        let p = provider();
        let bumped = p
            .discount_curve(Currency::USD)
            .unwrap()
            .with_perturbation(0, 0.01)
            .unwrap();
        let q = p.clone().with_discount_curve(Currency::USD, bumped);
        assert_relative_eq!(p.zero_rate(Currency::USD, 1.0).unwrap(), 0.04);
        assert_relative_eq!(q.zero_rate(Currency::USD, 1.0).unwrap(), 0.05);
        assert!(Arc::ptr_eq(
            p.index_curve(RateIndex::Sofr).unwrap(),
            q.index_curve(RateIndex::Sofr).unwrap()
        ));
    }

    #[test]
    fn test_combined_with() {
        let p = provider();
        let eur = ConstantCurve::new(CurveMetadata::zero_rates("EUR-Disc"), 0.02);
        let other =
            ImmutableRatesProvider::new(date()).with_discount_curve(Currency::EUR, Arc::new(eur));
        let combined = p.combined_with(&other).unwrap();
        let names: Vec<CurveName> =
            combined.discount_curves().map(|(_, c)| c.name().clone()).collect();
        assert_eq!(
            names,
            vec![CurveName::new("USD-Disc"), CurveName::new("EUR-Disc")]
        );

        assert!(matches!(
            p.combined_with(&p),
            Err(CurveError::DuplicateCurve { .. })
        ));
        let later = ImmutableRatesProvider::new(date().add_days(1));
        assert!(matches!(
            p.combined_with(&later),
            Err(CurveError::ValuationDateMismatch { .. })
        ));
    }
}
