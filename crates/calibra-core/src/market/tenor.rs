//! Tenors such as `3M` or `10Y`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Unit of a tenor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TenorUnit {
    /// Calendar days.
    Days,
    /// Weeks of seven days.
    Weeks,
    /// Calendar months.
    Months,
    /// Calendar years.
    Years,
}

/// A period measured from a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tenor {
    amount: u32,
    unit: TenorUnit,
}

impl Tenor {
    /// Creates a tenor.
    #[must_use]
    pub const fn new(amount: u32, unit: TenorUnit) -> Self {
        Self { amount, unit }
    }

    /// A tenor in months.
    #[must_use]
    pub const fn months(amount: u32) -> Self {
        Self::new(amount, TenorUnit::Months)
    }

    /// A tenor in years.
    #[must_use]
    pub const fn years(amount: u32) -> Self {
        Self::new(amount, TenorUnit::Years)
    }

    /// Returns the date this tenor after `date`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is out of range.
    pub fn add_to(&self, date: Date) -> CoreResult<Date> {
        let amount = self.amount as i32;
        match self.unit {
            TenorUnit::Days => Ok(date.add_days(i64::from(amount))),
            TenorUnit::Weeks => Ok(date.add_days(7 * i64::from(amount))),
            TenorUnit::Months => date.add_months(amount),
            TenorUnit::Years => date.add_years(amount),
        }
    }

    /// Approximate length in years, used for ordering tenors.
    #[must_use]
    pub fn approx_years(&self) -> f64 {
        let amount = f64::from(self.amount);
        match self.unit {
            TenorUnit::Days => amount / 365.0,
            TenorUnit::Weeks => 7.0 * amount / 365.0,
            TenorUnit::Months => amount / 12.0,
            TenorUnit::Years => amount,
        }
    }
}

impl FromStr for Tenor {
    type Err = CoreError;

    /// Parses codes such as `1D`, `2W`, `6M` and `10Y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        let split = code
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| CoreError::unknown_tenor(s))?;
        let (digits, unit) = code.split_at(split);
        let amount: u32 = digits.parse().map_err(|_| CoreError::unknown_tenor(s))?;
        let unit = match unit {
            "D" => TenorUnit::Days,
            "W" => TenorUnit::Weeks,
            "M" => TenorUnit::Months,
            "Y" => TenorUnit::Years,
            _ => return Err(CoreError::unknown_tenor(s)),
        };
        Ok(Self::new(amount, unit))
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            TenorUnit::Days => 'D',
            TenorUnit::Weeks => 'W',
            TenorUnit::Months => 'M',
            TenorUnit::Years => 'Y',
        };
        write!(f, "{}{}", self.amount, unit)
    }
}
