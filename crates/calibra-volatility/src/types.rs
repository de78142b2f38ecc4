//! Small option vocabulary shared by the formulas and the tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PutCall {
    /// Right to buy.
    Call,
    /// Right to sell.
    Put,
}

impl PutCall {
    /// +1 for a call, -1 for a put.
    #[must_use]
    pub fn sign(&self) -> f64 {
        match self {
            PutCall::Call => 1.0,
            PutCall::Put => -1.0,
        }
    }

    /// Payoff on exercise at `spot`.
    #[must_use]
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        (self.sign() * (spot - strike)).max(0.0)
    }
}

impl fmt::Display for PutCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PutCall::Call => f.write_str("Call"),
            PutCall::Put => f.write_str("Put"),
        }
    }
}

/// Side of a barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarrierDirection {
    /// Triggered when the spot rises to the barrier.
    Up,
    /// Triggered when the spot falls to the barrier.
    Down,
}

/// A constant continuously monitored barrier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    /// Which side triggers.
    pub direction: BarrierDirection,
    /// Barrier level.
    pub level: f64,
}

impl Barrier {
    /// Creates a barrier.
    #[must_use]
    pub fn new(direction: BarrierDirection, level: f64) -> Self {
        Self { direction, level }
    }

    /// Returns true if `spot` is at or beyond the barrier.
    #[must_use]
    pub fn is_breached(&self, spot: f64) -> bool {
        match self.direction {
            BarrierDirection::Up => spot >= self.level,
            BarrierDirection::Down => spot <= self.level,
        }
    }
}
