//! Rate indices whose forward curves a rates provider can hold.

use std::fmt;
use std::str::FromStr;

use calibra_core::Currency;
use serde::{Deserialize, Serialize};

use crate::error::CurveError;

/// A floating rate index.
///
/// Overnight risk-free rates and the main term rates. Each index is
/// denominated in one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RateIndex {
    /// Secured Overnight Financing Rate (USD)
    Sofr,
    /// Euro Short-Term Rate (EUR)
    Estr,
    /// Sterling Overnight Index Average (GBP)
    Sonia,
    /// Tokyo Overnight Average Rate (JPY)
    Tonar,
    /// Swiss Average Rate Overnight (CHF)
    Saron,
    /// Euribor 3M (EUR)
    Euribor3M,
    /// Euribor 6M (EUR)
    Euribor6M,
    /// Tibor 3M (JPY)
    Tibor3M,
}

impl RateIndex {
    /// Every index, in declaration order.
    pub const ALL: [RateIndex; 8] = [
        RateIndex::Sofr,
        RateIndex::Estr,
        RateIndex::Sonia,
        RateIndex::Tonar,
        RateIndex::Saron,
        RateIndex::Euribor3M,
        RateIndex::Euribor6M,
        RateIndex::Tibor3M,
    ];

    /// Returns the currency of the index.
    #[must_use]
    pub fn currency(&self) -> Currency {
        match self {
            RateIndex::Sofr => Currency::USD,
            RateIndex::Estr | RateIndex::Euribor3M | RateIndex::Euribor6M => Currency::EUR,
            RateIndex::Sonia => Currency::GBP,
            RateIndex::Tonar | RateIndex::Tibor3M => Currency::JPY,
            RateIndex::Saron => Currency::CHF,
        }
    }

    /// Returns true for overnight rates.
    #[must_use]
    pub fn is_overnight(&self) -> bool {
        matches!(
            self,
            RateIndex::Sofr
                | RateIndex::Estr
                | RateIndex::Sonia
                | RateIndex::Tonar
                | RateIndex::Saron
        )
    }

    /// Returns the market name of the index.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            RateIndex::Sofr => "SOFR",
            RateIndex::Estr => "ESTR",
            RateIndex::Sonia => "SONIA",
            RateIndex::Tonar => "TONAR",
            RateIndex::Saron => "SARON",
            RateIndex::Euribor3M => "EURIBOR-3M",
            RateIndex::Euribor6M => "EURIBOR-6M",
            RateIndex::Tibor3M => "TIBOR-3M",
        }
    }
}

impl fmt::Display for RateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RateIndex {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        RateIndex::ALL
            .into_iter()
            .find(|index| index.name() == upper)
            .ok_or_else(|| CurveError::curve_not_found(format!("rate index {s}")))
    }
}
