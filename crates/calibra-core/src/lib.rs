//! # Calibra Core
//!
//! Core types shared by every Calibra crate.
//!
//! - **Types**: `Date`, `Currency`, `CurrencyAmount`, `MultiCurrencyAmount`
//! - **Market metadata**: curve and surface names, value types, tenors and
//!   the per-parameter metadata attached to sensitivities
//!
//! ## Example
//!
//! ```rust
//! use calibra_core::prelude::*;
//!
//! let date = Date::from_ymd(2024, 3, 15).unwrap();
//! let amount = CurrencyAmount::new(Currency::USD, 125.0);
//! assert_eq!(date.add_days(1).day(), 16);
//! assert_eq!(amount.currency(), Currency::USD);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod market;
pub mod types;
pub mod validation;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::market::{CurveName, ParameterMetadata, SurfaceName, Tenor, ValueType};
    pub use crate::types::{Currency, CurrencyAmount, Date, MultiCurrencyAmount};
    pub use crate::validation::{Validate, ValidationError};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Currency, CurrencyAmount, Date, MultiCurrencyAmount};
pub use validation::{Validate, ValidationError};
