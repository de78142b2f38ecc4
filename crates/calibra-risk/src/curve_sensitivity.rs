//! Utilities on curve sensitivities: Jacobians and date rebucketing.
//!
//! Linear rebucketing moves the sensitivity of each dated parameter onto the
//! two target dates around it, with a triangular weight:
//!
//! ```text
//! w_earlier = (later - date) / (later - earlier)
//! w_later   = 1 - w_earlier
//! ```
//!
//! Parameters dated before the first target or after the last one go
//! entirely to that target. The weights of each parameter sum to one, so
//! the total sensitivity is unchanged.

use calibra_core::market::{CurveName, ParameterMetadata};
use calibra_core::Date;
use calibra_curves::{CurrencyParameterSensitivities, CurrencyParameterSensitivity};
use calibra_math::linear_algebra::invert;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

/// A curve name and its number of parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveParameterSize {
    /// The curve name.
    pub name: CurveName,
    /// The number of parameters of the curve.
    pub parameter_count: usize,
}

impl CurveParameterSize {
    /// Creates a curve parameter size.
    #[must_use]
    pub fn new(name: impl Into<CurveName>, parameter_count: usize) -> Self {
        Self {
            name: name.into(),
            parameter_count,
        }
    }
}

/// Inverse of the Jacobian of market quotes with respect to curve parameters.
///
/// Row `i` of the Jacobian is the sensitivity of market quote `i` to the
/// curve parameters, laid out curve after curve in `curve_order`. The result
/// holds the sensitivity of each curve parameter to each market quote.
///
/// Sensitivities are read in the currency of the first entry found; a curve
/// missing from a row contributes zeros.
///
/// # Errors
///
/// Returns `InvalidParameter` if there is not one row per curve parameter
/// or an entry has the wrong size, and `Math(SingularMatrix)` if the
/// Jacobian cannot be inverted.
pub fn jacobian_from_market_quote_sensitivities(
    curve_order: &[CurveParameterSize],
    sensitivities: &[CurrencyParameterSensitivities],
) -> RiskResult<DMatrix<f64>> {
    let size: usize = curve_order.iter().map(|c| c.parameter_count).sum();
    if size == 0 || sensitivities.len() != size {
        return Err(RiskError::invalid_parameter(format!(
            "{} market quote sensitivities for {} curve parameters",
            sensitivities.len(),
            size
        )));
    }
    let currency = sensitivities
        .iter()
        .flat_map(CurrencyParameterSensitivities::iter)
        .map(CurrencyParameterSensitivity::currency)
        .next()
        .ok_or_else(|| RiskError::invalid_parameter("market quote sensitivities are all empty"))?;

    let mut jacobian = DMatrix::zeros(size, size);
    for (row, quote) in sensitivities.iter().enumerate() {
        let mut column = 0;
        for curve in curve_order {
            if let Some(entry) = quote.find(&curve.name, currency) {
                if entry.parameter_count() != curve.parameter_count {
                    return Err(RiskError::invalid_parameter(format!(
                        "curve {} has {} parameters, sensitivity has {}",
                        curve.name,
                        curve.parameter_count,
                        entry.parameter_count()
                    )));
                }
                for (k, value) in entry.sensitivity().iter().enumerate() {
                    jacobian[(row, column + k)] = *value;
                }
            }
            column += curve.parameter_count;
        }
    }
    Ok(invert(&jacobian)?)
}

/// Rebuckets dated sensitivities onto `target_dates`.
///
/// Every entry keeps its curve name and currency; its parameters become the
/// target dates.
///
/// # Errors
///
/// Returns `InvalidParameter` if the target dates are empty or not strictly
/// increasing, or if a parameter carries no date.
pub fn linear_rebucketing(
    sensitivities: &CurrencyParameterSensitivities,
    target_dates: &[Date],
) -> RiskResult<CurrencyParameterSensitivities> {
    if target_dates.is_empty() || target_dates.windows(2).any(|w| w[0] >= w[1]) {
        return Err(RiskError::invalid_parameter(
            "target dates must be non-empty and strictly increasing",
        ));
    }
    let metadata: Vec<ParameterMetadata> =
        target_dates.iter().copied().map(ParameterMetadata::dated).collect();

    let rebucketed = sensitivities
        .iter()
        .map(|s| {
            let mut buckets = vec![0.0; target_dates.len()];
            for (parameter, &value) in s.parameter_metadata().iter().zip(s.sensitivity()) {
                let date = parameter.date().ok_or_else(|| {
                    RiskError::invalid_parameter(format!(
                        "parameter {} of {} has no date",
                        parameter.label(),
                        s.name()
                    ))
                })?;
                distribute(date, value, target_dates, &mut buckets);
            }
            Ok(CurrencyParameterSensitivity::new(
                s.name().clone(),
                s.currency(),
                metadata.clone(),
                buckets,
            )?)
        })
        .collect::<RiskResult<Vec<_>>>()?;
    Ok(CurrencyParameterSensitivities::from_sensitivities(rebucketed)?)
}

/// Rebuckets tenor sensitivities onto `target_dates`.
///
/// Each parameter is dated at `reference_date` plus its tenor.
///
/// # Errors
///
/// As [`linear_rebucketing`], and `InvalidParameter` if a parameter carries
/// no tenor.
pub fn linear_rebucketing_with_tenors(
    sensitivities: &CurrencyParameterSensitivities,
    target_dates: &[Date],
    reference_date: Date,
) -> RiskResult<CurrencyParameterSensitivities> {
    let dated = sensitivities
        .iter()
        .map(|s| {
            let metadata = s
                .parameter_metadata()
                .iter()
                .map(|parameter| {
                    let tenor = parameter.tenor_value().ok_or_else(|| {
                        RiskError::invalid_parameter(format!(
                            "parameter {} of {} has no tenor",
                            parameter.label(),
                            s.name()
                        ))
                    })?;
                    Ok(parameter.clone().with_date(tenor.add_to(reference_date)?))
                })
                .collect::<RiskResult<Vec<_>>>()?;
            Ok(CurrencyParameterSensitivity::new(
                s.name().clone(),
                s.currency(),
                metadata,
                s.sensitivity().to_vec(),
            )?)
        })
        .collect::<RiskResult<Vec<_>>>()?;
    linear_rebucketing(
        &CurrencyParameterSensitivities::from_sensitivities(dated)?,
        target_dates,
    )
}

fn distribute(date: Date, value: f64, targets: &[Date], buckets: &mut [f64]) {
    let last = targets.len() - 1;
    if date <= targets[0] {
        buckets[0] += value;
        return;
    }
    if date >= targets[last] {
        buckets[last] += value;
        return;
    }
    let later = targets.partition_point(|&t| t <= date);
    let earlier = later - 1;
    let span = targets[earlier].days_between(&targets[later]) as f64;
    let weight = date.days_between(&targets[later]) as f64 / span;
    buckets[earlier] += weight * value;
    buckets[later] += (1.0 - weight) * value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use calibra_core::market::Tenor;
    use calibra_core::Currency;
    use calibra_math::MathError;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn dated(name: &str, dates: &[Date], values: Vec<f64>) -> CurrencyParameterSensitivity {
        CurrencyParameterSensitivity::new(
            name,
            Currency::USD,
            dates.iter().copied().map(ParameterMetadata::dated).collect(),
            values,
        )
        .unwrap()
    }

    #[test]
    fn test_rebucketing_splits_between_neighbours() {
        let targets = [date(2025, 1, 1), date(2025, 1, 11), date(2025, 1, 31)];
        let sensitivities = CurrencyParameterSensitivities::of(dated(
            "USD-Disc",
            &[
                date(2024, 6, 1),
                date(2025, 1, 4),
                date(2025, 1, 21),
                date(2026, 1, 1),
            ],
            vec![1.0, 10.0, 100.0, 1000.0],
        ));
        let result = linear_rebucketing(&sensitivities, &targets).unwrap();
        let s = result.find(&"USD-Disc".into(), Currency::USD).unwrap();

        // 4 Jan is 3 days after 1 Jan, 7 days before 11 Jan: 0.7 / 0.3
        // 21 Jan is midway between 11 Jan and 31 Jan
        assert_relative_eq!(s.sensitivity()[0], 1.0 + 7.0, epsilon = 1e-12);
        assert_relative_eq!(s.sensitivity()[1], 3.0 + 50.0, epsilon = 1e-12);
        assert_relative_eq!(s.sensitivity()[2], 50.0 + 1000.0, epsilon = 1e-12);
        assert_eq!(s.parameter_metadata()[1].date(), Some(targets[1]));
    }

    #[test]
    fn test_rebucketing_rejects_bad_input() {
        let sensitivities =
            CurrencyParameterSensitivities::of(dated("USD-Disc", &[date(2025, 1, 4)], vec![1.0]));
        let reversed = [date(2025, 2, 1), date(2025, 1, 1)];
        assert!(linear_rebucketing(&sensitivities, &[]).is_err());
        assert!(linear_rebucketing(&sensitivities, &reversed).is_err());

        let undated = CurrencyParameterSensitivities::of(
            CurrencyParameterSensitivity::new(
                "USD-Disc",
                Currency::USD,
                vec![ParameterMetadata::labelled("1.0")],
                vec![1.0],
            )
            .unwrap(),
        );
        assert!(matches!(
            linear_rebucketing(&undated, &[date(2025, 1, 1)]),
            Err(RiskError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_rebucketing_with_tenors() {
        let reference = date(2025, 1, 15);
        let tenors: Vec<ParameterMetadata> = ["6M", "18M"]
            .iter()
            .map(|t| ParameterMetadata::tenor(t.parse::<Tenor>().unwrap()))
            .collect();
        let sensitivities = CurrencyParameterSensitivities::of(
            CurrencyParameterSensitivity::new("USD-Disc", Currency::USD, tenors, vec![2.0, 4.0])
                .unwrap(),
        );
        let targets = [date(2026, 1, 15), date(2027, 1, 15)];
        let result = linear_rebucketing_with_tenors(&sensitivities, &targets, reference).unwrap();
        let s = result.find(&"USD-Disc".into(), Currency::USD).unwrap();

        // 6M clamps to the first target; 18M falls between the two
        let days = targets[0].days_between(&targets[1]) as f64;
        let w = date(2026, 7, 15).days_between(&targets[1]) as f64 / days;
        assert_relative_eq!(s.sensitivity()[0], 2.0 + 4.0 * w, epsilon = 1e-12);
        assert_relative_eq!(s.sensitivity()[1], 4.0 * (1.0 - w), epsilon = 1e-12);

        let labelled =
            CurrencyParameterSensitivities::of(dated("USD-Disc", &[reference], vec![1.0]));
        assert!(linear_rebucketing_with_tenors(&labelled, &targets, reference).is_err());
    }

    #[test]
    fn test_jacobian_inverse() {
        let order = [
            CurveParameterSize::new("USD-Disc", 1),
            CurveParameterSize::new("USD-SOFR", 2),
        ];
        let sofr_dates = [date(2026, 1, 1), date(2027, 1, 1)];
        let row = |disc: f64, sofr: [f64; 2]| {
            CurrencyParameterSensitivities::from_sensitivities([
                dated("USD-Disc", &[date(2026, 1, 1)], vec![disc]),
                dated("USD-SOFR", &sofr_dates, sofr.to_vec()),
            ])
            .unwrap()
        };
        let quotes = [
            row(2.0, [0.0, 0.0]),
            row(0.5, [1.0, 0.0]),
            row(0.0, [0.5, 4.0]),
        ];
        let inverse = jacobian_from_market_quote_sensitivities(&order, &quotes).unwrap();

        let jacobian =
            DMatrix::from_row_slice(3, 3, &[2.0, 0.0, 0.0, 0.5, 1.0, 0.0, 0.0, 0.5, 4.0]);
        let identity = jacobian * inverse;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(identity[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_jacobian_errors() {
        let order = [CurveParameterSize::new("USD-Disc", 2)];
        let dates = [date(2026, 1, 1), date(2027, 1, 1)];
        let row = |values: Vec<f64>| {
            CurrencyParameterSensitivities::of(dated("USD-Disc", &dates, values))
        };
        // missing curve in the second row leaves it zero
        let singular = [row(vec![1.0, 2.0]), CurrencyParameterSensitivities::empty()];
        assert!(matches!(
            jacobian_from_market_quote_sensitivities(&order, &singular),
            Err(RiskError::Math(MathError::SingularMatrix))
        ));
        assert!(matches!(
            jacobian_from_market_quote_sensitivities(&order, &[row(vec![1.0, 2.0])]),
            Err(RiskError::InvalidParameter { .. })
        ));
    }

    proptest! {
        /// Rebucketing moves sensitivity between dates but never creates or
        /// loses any.
        #[test]
        fn rebucketing_conserves_total(
            offsets in proptest::collection::vec(0i64..4000, 1..12),
            values in proptest::collection::vec(-1000.0_f64..1000.0, 12),
        ) {
            let start = date(2024, 1, 1);
            let dates: Vec<Date> = offsets.iter().map(|&d| start.add_days(d)).collect();
            let values = values[..dates.len()].to_vec();
            let total: f64 = values.iter().sum();
            let sensitivities =
                CurrencyParameterSensitivities::of(dated("USD-Disc", &dates, values));

            let targets = [365, 730, 1825, 3650].map(|days| start.add_days(days));
            let result = linear_rebucketing(&sensitivities, &targets).unwrap();
            let rebucketed: f64 = result.iter().flat_map(|s| s.sensitivity().iter()).sum();
            prop_assert!((rebucketed - total).abs() < 1e-9 * (1.0 + total.abs()) + 1e-9);
        }
    }
}
