//! Parameter metadata and value types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Tenor;
use crate::types::Date;

/// What the values of a curve or surface axis represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ValueType {
    /// Time as a year fraction.
    #[default]
    YearFraction,
    /// Continuously compounded zero rate.
    ZeroRate,
    /// Discount factor.
    DiscountFactor,
    /// Forward rate.
    ForwardRate,
    /// Option strike.
    Strike,
    /// Black implied volatility.
    BlackVolatility,
    /// Local volatility.
    LocalVolatility,
    /// Option price.
    Price,
    /// Anything not listed above.
    Unknown,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::YearFraction => "YearFraction",
            ValueType::ZeroRate => "ZeroRate",
            ValueType::DiscountFactor => "DiscountFactor",
            ValueType::ForwardRate => "ForwardRate",
            ValueType::Strike => "Strike",
            ValueType::BlackVolatility => "BlackVolatility",
            ValueType::LocalVolatility => "LocalVolatility",
            ValueType::Price => "Price",
            ValueType::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// Describes a single parameter of a curve or surface.
///
/// The label is always present. A date or tenor is present when the
/// parameter corresponds to a point in time, which is what date-based
/// rebucketing relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterMetadata {
    label: String,
    date: Option<Date>,
    tenor: Option<Tenor>,
}

impl ParameterMetadata {
    /// Metadata with only a label.
    #[must_use]
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            date: None,
            tenor: None,
        }
    }

    /// Metadata for a dated node; the label is the date.
    #[must_use]
    pub fn dated(date: Date) -> Self {
        Self {
            label: date.to_string(),
            date: Some(date),
            tenor: None,
        }
    }

    /// Metadata for a tenor node; the label is the tenor code.
    #[must_use]
    pub fn tenor(tenor: Tenor) -> Self {
        Self {
            label: tenor.to_string(),
            date: None,
            tenor: Some(tenor),
        }
    }

    /// Empty metadata for the parameter at `index`.
    #[must_use]
    pub fn empty(index: usize) -> Self {
        Self::labelled(format!("p{index}"))
    }

    /// Attaches a date.
    #[must_use]
    pub fn with_date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the date, if any.
    #[must_use]
    pub fn date(&self) -> Option<Date> {
        self.date
    }

    /// Returns the tenor, if any.
    #[must_use]
    pub fn tenor_value(&self) -> Option<Tenor> {
        self.tenor
    }
}
