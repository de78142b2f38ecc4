//! # Calibra Volatility
//!
//! Trinomial trees and local volatility calibration.
//!
//! ## Architecture
//!
//! - [`tree`]: recombining trinomial trees pricing European, American and
//!   knock-out options over a Cox-Ross-Rubinstein or Trigeorgis lattice.
//! - [`surface`]: surfaces over time and strike, defined by parameters that
//!   can be bumped one at a time.
//! - [`local_vol`]: local volatility from an implied volatility or call
//!   price surface, either as nodes of an implied trinomial tree or lazily
//!   through Dupire's formula with parameter sensitivities.
//! - [`black_scholes`]: closed-form prices, vega and implied volatility.
//!
//! ## Quick Start
//!
//! ```rust
//! use calibra_volatility::prelude::*;
//!
//! let tree = TrinomialTree::new(LatticeSpecification::CoxRossRubinstein);
//! let option = OptionFunction::american(PutCall::Put, 100.0, 1.0, 200);
//! let price = tree.price(&option, 100.0, 0.2, 0.05, 0.0).unwrap();
//! assert!(price > 5.5 && price < 6.5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::uninlined_format_args)]

pub mod black_scholes;
pub mod config;
pub mod error;
pub mod local_vol;
pub mod surface;
pub mod tree;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{DupireConfig, ImpliedTreeConfig};
    pub use crate::error::{VolatilityError, VolatilityResult};
    pub use crate::local_vol::{
        DeformedSurface, DupireInput, DupireLocalVolatilityCalculator,
        ImpliedTrinomialTreeLocalVolatilityCalculator, LocalVolatilityCalculator, ValueDerivatives,
    };
    pub use crate::surface::{
        ConstantSurface, InterpolatedNodalSurface, Surface, SurfaceMetadata, SurfaceRef,
    };
    pub use crate::tree::{LatticeSpecification, OptionFunction, TreeResult, TrinomialTree};
    pub use crate::types::{Barrier, BarrierDirection, PutCall};
}

pub use config::{DupireConfig, ImpliedTreeConfig};
pub use error::{VolatilityError, VolatilityResult};
pub use surface::{Surface, SurfaceMetadata, SurfaceRef};
pub use types::{Barrier, BarrierDirection, PutCall};
