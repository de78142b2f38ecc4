//! Extrapolation policies.
//!
//! Every interpolator carries one [`ExtrapolationMethod`] that decides what
//! happens outside its node range:
//!
//! | Method | Outside the nodes |
//! |--------|-------------------|
//! | None | error |
//! | Flat | value of the nearest node, zero slope |
//! | Linear | boundary segment continued in the interpolator's own coordinates |

use serde::{Deserialize, Serialize};

/// Configuration for extrapolation beyond the node range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtrapolationMethod {
    /// No extrapolation - return error outside range
    None,
    /// Constant value from boundary
    #[default]
    Flat,
    /// Continue the formula of the first or last segment.
    ///
    /// For a linear interpolator this is linear extrapolation; for a
    /// log-linear one it extends the exponential.
    Linear,
}

impl ExtrapolationMethod {
    /// Returns true if points outside the node range can be evaluated.
    #[must_use]
    pub fn allows_extrapolation(&self) -> bool {
        !matches!(self, ExtrapolationMethod::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_flat() {
        assert_eq!(ExtrapolationMethod::default(), ExtrapolationMethod::Flat);
        assert!(ExtrapolationMethod::Linear.allows_extrapolation());
        assert!(!ExtrapolationMethod::None.allows_extrapolation());
    }
}
