//! Backward induction on a recombining trinomial tree.

use tracing::debug;

use super::lattice::{LatticeParameters, LatticeSpecification};
use super::option_function::OptionFunction;
use crate::error::{VolatilityError, VolatilityResult};

/// Price and greeks read off the first layers of the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeResult {
    /// Present value.
    pub price: f64,
    /// First derivative with respect to spot.
    pub delta: f64,
    /// Second derivative with respect to spot.
    pub gamma: f64,
    /// Value change per year of elapsed time, spot unchanged.
    pub theta: f64,
}

/// Trinomial tree pricer.
///
/// The tree is a plain value: it holds only the lattice parameterization
/// and can price any number of options concurrently.
///
/// # Example
///
/// ```rust
/// use calibra_volatility::tree::{LatticeSpecification, OptionFunction, TrinomialTree};
/// use calibra_volatility::PutCall;
///
/// let tree = TrinomialTree::new(LatticeSpecification::CoxRossRubinstein);
/// let call = OptionFunction::european(PutCall::Call, 100.0, 1.0, 200);
/// let price = tree.price(&call, 100.0, 0.2, 0.05, 0.0).unwrap();
/// assert!((price - 10.4506).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrinomialTree {
    lattice: LatticeSpecification,
}

impl TrinomialTree {
    /// Creates a tree on the given lattice.
    #[must_use]
    pub fn new(lattice: LatticeSpecification) -> Self {
        Self { lattice }
    }

    /// Returns the lattice specification.
    #[must_use]
    pub fn lattice(&self) -> LatticeSpecification {
        self.lattice
    }

    /// Prices an option.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for non-positive spot, volatility, expiry
    /// or step count, and when the lattice probabilities fall outside (0, 1).
    pub fn price(
        &self,
        function: &OptionFunction,
        spot: f64,
        volatility: f64,
        rate: f64,
        dividend: f64,
    ) -> VolatilityResult<f64> {
        self.roll_back(function, spot, volatility, rate, dividend, |_, _| {})
            .map(|(price, _)| price)
    }

    /// Prices an option and reads delta, gamma and theta off the tree.
    ///
    /// Delta and gamma come from the three nodes of the first layer, theta
    /// from its middle node.
    pub fn price_with_greeks(
        &self,
        function: &OptionFunction,
        spot: f64,
        volatility: f64,
        rate: f64,
        dividend: f64,
    ) -> VolatilityResult<TreeResult> {
        let mut first_layer = Vec::new();
        let (price, params) =
            self.roll_back(function, spot, volatility, rate, dividend, |step, values| {
                if step == 1 {
                    first_layer = values.to_vec();
                }
            })?;
        if first_layer.len() != 3 {
            return Err(VolatilityError::invalid_parameter(
                "greeks need a tree of at least one step",
            ));
        }

        let s_down = spot * params.down_factor;
        let s_mid = spot * params.middle_factor;
        let s_up = spot * params.up_factor;
        let (v_down, v_mid, v_up) = (first_layer[0], first_layer[1], first_layer[2]);
        let slope_up = (v_up - v_mid) / (s_up - s_mid);
        let slope_down = (v_mid - v_down) / (s_mid - s_down);
        let dt = function.time_to_expiry() / function.number_of_steps() as f64;

        Ok(TreeResult {
            price,
            delta: (v_up - v_down) / (s_up - s_down),
            gamma: 2.0 * (slope_up - slope_down) / (s_up - s_down),
            theta: (v_mid - price) / dt,
        })
    }

    /// Runs the induction, showing each layer to `observe` before it is
    /// replaced.
    fn roll_back<F>(
        &self,
        function: &OptionFunction,
        spot: f64,
        volatility: f64,
        rate: f64,
        dividend: f64,
        mut observe: F,
    ) -> VolatilityResult<(f64, LatticeParameters)>
    where
        F: FnMut(usize, &[f64]),
    {
        let steps = function.number_of_steps();
        let expiry = function.time_to_expiry();
        if steps == 0 {
            return Err(VolatilityError::invalid_parameter("tree needs at least one step"));
        }
        if !(spot > 0.0 && volatility > 0.0 && expiry > 0.0) {
            return Err(VolatilityError::invalid_parameter(format!(
                "tree needs positive spot, volatility and expiry, got {spot}, {volatility}, \
                 {expiry}"
            )));
        }

        let dt = expiry / steps as f64;
        let discount = (-rate * dt).exp();
        let params = self.lattice.parameters(volatility, rate, dividend, dt);
        if !params.is_valid() {
            return Err(VolatilityError::invalid_parameter(format!(
                "lattice probabilities ({:.6}, {:.6}, {:.6}) outside (0, 1) for volatility \
                 {volatility} and {steps} steps",
                params.p_up, params.p_mid, params.p_down
            )));
        }
        debug!(
            steps,
            dt,
            p_up = params.p_up,
            p_mid = params.p_mid,
            p_down = params.p_down,
            "trinomial tree roll back"
        );

        let middle_over_down = params.middle_over_down();
        let mut values = function.payoff_at_expiry(spot, params.down_factor, middle_over_down);
        for step in (0..steps).rev() {
            observe(step + 1, &values);
            values = function.next_layer_values(
                discount,
                params.p_up,
                params.p_mid,
                params.p_down,
                &values,
                spot,
                params.down_factor,
                middle_over_down,
                step,
            );
        }
        Ok((values[0], params))
    }
}
