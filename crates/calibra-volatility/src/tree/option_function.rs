//! Payoffs and their backward step rules.

use serde::{Deserialize, Serialize};

use crate::types::{Barrier, PutCall};

/// The contract data shared by every option function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VanillaOptionFunction {
    /// Strike.
    pub strike: f64,
    /// Time to expiry in years.
    pub time_to_expiry: f64,
    /// Call or put.
    pub put_call: PutCall,
    /// Number of tree steps used to price it.
    pub number_of_steps: usize,
}

/// What a trinomial tree prices.
///
/// Every variant rolls back with [`default_next_layer`]; the path-dependent
/// ones then apply their own test at each node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OptionFunction {
    /// Exercise at expiry only.
    European(VanillaOptionFunction),
    /// Exercise at any node.
    American(VanillaOptionFunction),
    /// Dies when the barrier is touched, paying the rebate at that node.
    KnockOut {
        /// Underlying vanilla.
        option: VanillaOptionFunction,
        /// Constant barrier, monitored at every node.
        barrier: Barrier,
        /// Amount paid on knock-out.
        rebate: f64,
    },
}

impl OptionFunction {
    /// A European option.
    #[must_use]
    pub fn european(
        put_call: PutCall,
        strike: f64,
        time_to_expiry: f64,
        number_of_steps: usize,
    ) -> Self {
        OptionFunction::European(VanillaOptionFunction {
            strike,
            time_to_expiry,
            put_call,
            number_of_steps,
        })
    }

    /// An American option.
    #[must_use]
    pub fn american(
        put_call: PutCall,
        strike: f64,
        time_to_expiry: f64,
        number_of_steps: usize,
    ) -> Self {
        OptionFunction::American(VanillaOptionFunction {
            strike,
            time_to_expiry,
            put_call,
            number_of_steps,
        })
    }

    /// A knock-out option with a constant barrier.
    #[must_use]
    pub fn knock_out(
        put_call: PutCall,
        strike: f64,
        time_to_expiry: f64,
        number_of_steps: usize,
        barrier: Barrier,
        rebate: f64,
    ) -> Self {
        OptionFunction::KnockOut {
            option: VanillaOptionFunction {
                strike,
                time_to_expiry,
                put_call,
                number_of_steps,
            },
            barrier,
            rebate,
        }
    }

    fn vanilla(&self) -> &VanillaOptionFunction {
        match self {
            OptionFunction::European(option)
            | OptionFunction::American(option)
            | OptionFunction::KnockOut { option, .. } => option,
        }
    }

    /// Returns the strike.
    #[must_use]
    pub fn strike(&self) -> f64 {
        self.vanilla().strike
    }

    /// Returns the time to expiry.
    #[must_use]
    pub fn time_to_expiry(&self) -> f64 {
        self.vanilla().time_to_expiry
    }

    /// Returns call or put.
    #[must_use]
    pub fn put_call(&self) -> PutCall {
        self.vanilla().put_call
    }

    /// Returns the number of tree steps.
    #[must_use]
    pub fn number_of_steps(&self) -> usize {
        self.vanilla().number_of_steps
    }

    /// Values at the `2n + 1` terminal nodes.
    #[must_use]
    pub fn payoff_at_expiry(&self, spot: f64, down_factor: f64, middle_over_down: f64) -> Vec<f64> {
        let steps = self.number_of_steps();
        let option = self.vanilla();
        node_assets(spot, down_factor, middle_over_down, steps)
            .map(|asset| match self {
                OptionFunction::KnockOut { barrier, rebate, .. } if barrier.is_breached(asset) => {
                    *rebate
                }
                _ => option.put_call.intrinsic(asset, option.strike),
            })
            .collect()
    }

    /// Values at layer `step`, given the values at layer `step + 1`.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn next_layer_values(
        &self,
        discount: f64,
        p_up: f64,
        p_mid: f64,
        p_down: f64,
        values: &[f64],
        spot: f64,
        down_factor: f64,
        middle_over_down: f64,
        step: usize,
    ) -> Vec<f64> {
        let mut next = default_next_layer(discount, p_up, p_mid, p_down, values);
        match self {
            OptionFunction::European(_) => {}
            OptionFunction::American(option) => {
                let assets = node_assets(spot, down_factor, middle_over_down, step);
                for (value, asset) in next.iter_mut().zip(assets) {
                    *value = value.max(option.put_call.intrinsic(asset, option.strike));
                }
            }
            OptionFunction::KnockOut { barrier, rebate, .. } => {
                let assets = node_assets(spot, down_factor, middle_over_down, step);
                for (value, asset) in next.iter_mut().zip(assets) {
                    if barrier.is_breached(asset) {
                        *value = *rebate;
                    }
                }
            }
        }
        next
    }
}

/// Discounted expectation over the three successors of every node.
///
/// `values` holds a layer of `2i + 3` nodes; the result holds `2i + 1`.
#[must_use]
pub fn default_next_layer(
    discount: f64,
    p_up: f64,
    p_mid: f64,
    p_down: f64,
    values: &[f64],
) -> Vec<f64> {
    values
        .windows(3)
        .map(|w| discount * (p_up * w[2] + p_mid * w[1] + p_down * w[0]))
        .collect()
}

/// Assets of the `2 * step + 1` nodes of a layer, lowest first.
fn node_assets(
    spot: f64,
    down_factor: f64,
    middle_over_down: f64,
    step: usize,
) -> impl Iterator<Item = f64> {
    let start = (0..step).fold(spot, |asset, _| asset * down_factor);
    (0..=2 * step).scan(start, move |asset, _| {
        let current = *asset;
        *asset *= middle_over_down;
        Some(current)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BarrierDirection;
    use approx::assert_relative_eq;

    #[test]
    fn test_payoff_at_expiry() {
        let call = OptionFunction::european(PutCall::Call, 100.0, 1.0, 2);
        let d = 0.9;
        let payoff = call.payoff_at_expiry(100.0, d, 1.0 / d);
        assert_eq!(payoff.len(), 5);
        assert_relative_eq!(payoff[0], 0.0);
        assert_relative_eq!(payoff[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(payoff[3], 100.0 / 0.9 - 100.0, epsilon = 1e-12);
        assert_relative_eq!(payoff[4], 100.0 / 0.81 - 100.0, epsilon = 1e-12);

        let put = OptionFunction::european(PutCall::Put, 100.0, 1.0, 2);
        let payoff = put.payoff_at_expiry(100.0, d, 1.0 / d);
        assert_relative_eq!(payoff[0], 100.0 - 81.0, epsilon = 1e-12);
        assert_relative_eq!(payoff[4], 0.0);
    }

    #[test]
    fn test_default_next_layer() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let next = default_next_layer(0.5, 0.2, 0.5, 0.3, &values);
        assert_eq!(next.len(), 2);
        assert_relative_eq!(next[0], 0.5 * (0.2 * 3.0 + 0.5 * 2.0 + 0.3 * 1.0));
        assert_relative_eq!(next[1], 0.5 * (0.2 * 4.0 + 0.5 * 3.0 + 0.3 * 2.0));
    }

    #[test]
    fn test_american_applies_exercise() {
        let put = OptionFunction::american(PutCall::Put, 100.0, 1.0, 1);
        // layer 0 has the single node at spot 80
        let p = 1.0 / 3.0;
        let next = put.next_layer_values(1.0, p, p, p, &[0.0; 3], 80.0, 0.9, 1.0 / 0.9, 0);
        assert_eq!(next, vec![20.0]);
    }

    #[test]
    fn test_knock_out_pays_rebate() {
        let barrier = Barrier::new(BarrierDirection::Up, 105.0);
        let call = OptionFunction::knock_out(PutCall::Call, 100.0, 1.0, 1, barrier, 2.5);
        let d = 0.9;
        let payoff = call.payoff_at_expiry(100.0, d, 1.0 / d);
        assert_relative_eq!(payoff[2], 2.5);
        assert_relative_eq!(payoff[1], 0.0, epsilon = 1e-12);
        let next = call.next_layer_values(1.0, 0.3, 0.4, 0.3, &payoff, 110.0, d, 1.0 / d, 0);
        assert_eq!(next, vec![2.5]);
        assert_relative_eq!(call.strike(), 100.0);
        assert_eq!(call.number_of_steps(), 1);
    }

    #[test]
    fn test_node_assets_span_the_layer() {
        let d = 0.95;
        let assets: Vec<f64> = node_assets(100.0, d, 1.0 / d, 3).collect();
        assert_eq!(assets.len(), 7);
        assert_relative_eq!(assets[0], 100.0 * d * d * d, epsilon = 1e-12);
        assert_relative_eq!(assets[3], 100.0, epsilon = 1e-12);
        assert_relative_eq!(assets[6], 100.0 / (d * d * d), epsilon = 1e-12);

        // deep layers stay centred on spot
        let deep: Vec<f64> = node_assets(100.0, 0.999, 1.0 / 0.999, 5000).collect();
        assert_eq!(deep.len(), 10_001);
        assert_relative_eq!(deep[5000], 100.0, max_relative = 1e-9);
        assert_relative_eq!(deep[0], 100.0 * 0.999f64.powf(5000.0), max_relative = 1e-9);
    }
}
