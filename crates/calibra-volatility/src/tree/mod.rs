//! Recombining trinomial trees.
//!
//! - [`LatticeSpecification`]: how a volatility and a drift become node
//!   spacing and transition probabilities
//! - [`OptionFunction`]: payoff at expiry and the rule that rolls values
//!   back one layer
//! - [`TrinomialTree`]: backward induction from expiry to today
//!
//! Layer `i` of an `n`-step tree holds `2i + 1` nodes, lowest asset first.
//! Node `j` of layer `i` carries asset `spot · d^i · (m/d)^j`.

mod lattice;
mod option_function;
mod trinomial;

pub use lattice::{LatticeParameters, LatticeSpecification};
pub use option_function::{default_next_layer, OptionFunction, VanillaOptionFunction};
pub use trinomial::{TreeResult, TrinomialTree};
