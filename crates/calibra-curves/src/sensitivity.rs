//! Sensitivities to curve parameters.
//!
//! A [`CurrencyParameterSensitivity`] holds the derivative of some value with
//! respect to each parameter of one curve, expressed in one currency.
//! [`CurrencyParameterSensitivities`] collects these across curves, keeping
//! at most one entry per (curve name, currency) pair.

use calibra_core::market::{CurveName, ParameterMetadata};
use calibra_core::{Currency, CurrencyAmount, MultiCurrencyAmount};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Sensitivity to the parameters of a single curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyParameterSensitivity {
    name: CurveName,
    currency: Currency,
    parameter_metadata: Vec<ParameterMetadata>,
    sensitivity: Vec<f64>,
}

impl CurrencyParameterSensitivity {
    /// Creates a sensitivity.
    ///
    /// # Errors
    ///
    /// Fails if there is not exactly one metadata entry per value.
    pub fn new(
        name: impl Into<CurveName>,
        currency: Currency,
        parameter_metadata: Vec<ParameterMetadata>,
        sensitivity: Vec<f64>,
    ) -> CurveResult<Self> {
        let name = name.into();
        if parameter_metadata.len() != sensitivity.len() {
            return Err(CurveError::SensitivitySizeMismatch {
                name: name.to_string(),
                expected: sensitivity.len(),
                got: parameter_metadata.len(),
            });
        }
        Ok(Self {
            name,
            currency,
            parameter_metadata,
            sensitivity,
        })
    }

    /// Returns the curve name.
    #[must_use]
    pub fn name(&self) -> &CurveName {
        &self.name
    }

    /// Returns the currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the parameter metadata.
    #[must_use]
    pub fn parameter_metadata(&self) -> &[ParameterMetadata] {
        &self.parameter_metadata
    }

    /// Returns the sensitivity values.
    #[must_use]
    pub fn sensitivity(&self) -> &[f64] {
        &self.sensitivity
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.sensitivity.len()
    }

    /// Scales every value.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            sensitivity: self.sensitivity.iter().map(|s| s * factor).collect(),
            ..self.clone()
        }
    }

    /// Adds another sensitivity to the same curve, element by element.
    pub fn plus(&self, other: &CurrencyParameterSensitivity) -> CurveResult<Self> {
        if self.name != other.name || self.currency != other.currency {
            return Err(CurveError::invalid_curve(format!(
                "cannot add sensitivity to {}/{} to {}/{}",
                other.name, other.currency, self.name, self.currency
            )));
        }
        if self.sensitivity.len() != other.sensitivity.len() {
            return Err(CurveError::SensitivitySizeMismatch {
                name: self.name.to_string(),
                expected: self.sensitivity.len(),
                got: other.sensitivity.len(),
            });
        }
        Ok(Self {
            sensitivity: self
                .sensitivity
                .iter()
                .zip(&other.sensitivity)
                .map(|(a, b)| a + b)
                .collect(),
            ..self.clone()
        })
    }

    /// Returns the sum of all values.
    #[must_use]
    pub fn total(&self) -> CurrencyAmount {
        CurrencyAmount::new(self.currency, self.sensitivity.iter().sum())
    }
}

/// Sensitivities to the parameters of several curves.
///
/// Entries are kept sorted by curve name, then currency.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrencyParameterSensitivities {
    sensitivities: Vec<CurrencyParameterSensitivity>,
}

impl CurrencyParameterSensitivities {
    /// An empty collection.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A collection holding one sensitivity.
    #[must_use]
    pub fn of(sensitivity: CurrencyParameterSensitivity) -> Self {
        Self {
            sensitivities: vec![sensitivity],
        }
    }

    /// Builds a collection, merging entries for the same curve and currency.
    pub fn from_sensitivities(
        sensitivities: impl IntoIterator<Item = CurrencyParameterSensitivity>,
    ) -> CurveResult<Self> {
        sensitivities
            .into_iter()
            .try_fold(Self::empty(), |acc, s| acc.combined_with_one(s))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sensitivities.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sensitivities.is_empty()
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &CurrencyParameterSensitivity> {
        self.sensitivities.iter()
    }

    /// Finds the entry for a curve and currency.
    #[must_use]
    pub fn find(
        &self,
        name: &CurveName,
        currency: Currency,
    ) -> Option<&CurrencyParameterSensitivity> {
        self.sensitivities
            .iter()
            .find(|s| &s.name == name && s.currency == currency)
    }

    /// Merges two collections, adding entries for the same curve and currency.
    ///
    /// # Errors
    ///
    /// Fails if two entries for the same curve and currency differ in size.
    pub fn combined_with(&self, other: &CurrencyParameterSensitivities) -> CurveResult<Self> {
        other
            .sensitivities
            .iter()
            .cloned()
            .try_fold(self.clone(), Self::combined_with_one)
    }

    /// Adds one sensitivity, merging it with an existing entry if present.
    pub fn combined_with_one(
        mut self,
        sensitivity: CurrencyParameterSensitivity,
    ) -> CurveResult<Self> {
        let key = (sensitivity.name.clone(), sensitivity.currency);
        match self
            .sensitivities
            .binary_search_by(|s| (&s.name, s.currency).cmp(&(&key.0, key.1)))
        {
            Ok(pos) => {
                self.sensitivities[pos] = self.sensitivities[pos].plus(&sensitivity)?;
            }
            Err(pos) => self.sensitivities.insert(pos, sensitivity),
        }
        Ok(self)
    }

    /// Scales every entry.
    #[must_use]
    pub fn multiplied_by(&self, factor: f64) -> Self {
        Self {
            sensitivities: self
                .sensitivities
                .iter()
                .map(|s| s.multiplied_by(factor))
                .collect(),
        }
    }

    /// Sums every entry, per currency.
    #[must_use]
    pub fn total(&self) -> MultiCurrencyAmount {
        self.sensitivities
            .iter()
            .fold(MultiCurrencyAmount::empty(), |acc, s| acc.plus(s.total()))
    }
}

impl IntoIterator for CurrencyParameterSensitivities {
    type Item = CurrencyParameterSensitivity;
    type IntoIter = std::vec::IntoIter<CurrencyParameterSensitivity>;

    fn into_iter(self) -> Self::IntoIter {
        self.sensitivities.into_iter()
    }
}
