//! Market data naming and metadata.
//!
//! Curves and surfaces are identified by name; every parameter of a
//! parameterized market object carries [`ParameterMetadata`] so that a
//! sensitivity can be traced back to the node that produced it.

mod metadata;
mod names;
mod tenor;

pub use metadata::{ParameterMetadata, ValueType};
pub use names::{CurveName, SurfaceName};
pub use tenor::{Tenor, TenorUnit};
