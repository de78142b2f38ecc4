//! Implied trinomial tree calibration.
//!
//! Derman, Kani and Chriss (1996). The tree has a fixed uniform grid in log
//! space; its Arrow-Debreu prices are read off European option prices by
//! butterfly inversion, and the transition probabilities follow from the
//! Arrow-Debreu prices of consecutive layers and the forward of each node.
//! Each node's local variance comes from its transition probabilities.

use std::mem;

use calibra_core::market::ValueType;
use calibra_core::Validate;
use calibra_curves::CurveRef;
use tracing::{debug, warn};

use super::LocalVolatilityCalculator;
use crate::black_scholes;
use crate::config::ImpliedTreeConfig;
use crate::error::{VolatilityError, VolatilityResult};
use crate::surface::{InterpolatedNodalSurface, Surface, SurfaceMetadata, SurfaceRef};
use crate::tree::{LatticeSpecification, OptionFunction, TrinomialTree};
use crate::types::PutCall;

/// Local volatility from an implied trinomial tree.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use calibra_core::market::ValueType;
/// use calibra_curves::{ConstantCurve, CurveMetadata, CurveRef};
/// use calibra_volatility::local_vol::{
///     ImpliedTrinomialTreeLocalVolatilityCalculator, LocalVolatilityCalculator,
/// };
/// use calibra_volatility::surface::{ConstantSurface, Surface, SurfaceMetadata, SurfaceRef};
///
/// let implied: SurfaceRef = Arc::new(ConstantSurface::new(
///     SurfaceMetadata::new("Flat", ValueType::BlackVolatility),
///     0.25,
/// ));
/// let rate: CurveRef = Arc::new(ConstantCurve::new(CurveMetadata::zero_rates("r"), 0.03));
/// let dividend: CurveRef = Arc::new(ConstantCurve::new(CurveMetadata::zero_rates("q"), 0.0));
///
/// let calculator = ImpliedTrinomialTreeLocalVolatilityCalculator::default();
/// let local = calculator
///     .local_volatility_from_implied_volatility(&implied, 100.0, &rate, &dividend)
///     .unwrap();
/// assert!((local.z_value(1.0, 100.0).unwrap() - 0.25).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImpliedTrinomialTreeLocalVolatilityCalculator {
    config: ImpliedTreeConfig,
}

/// Transition probabilities out of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    p_up: f64,
    p_mid: f64,
    p_down: f64,
}

impl Transition {
    fn from_up_down(p_up: f64, p_down: f64) -> Self {
        Self {
            p_up,
            p_mid: 1.0 - p_up - p_down,
            p_down,
        }
    }

    fn is_valid(&self) -> bool {
        let valid = |p: f64| p > 0.0 && p < 1.0;
        valid(self.p_up) && valid(self.p_mid) && valid(self.p_down)
    }
}

/// The three successors of a node and its forward over the step.
#[derive(Debug, Clone, Copy)]
struct Successors {
    down: f64,
    middle: f64,
    up: f64,
    forward: f64,
}

/// Where option prices on the tree grid come from.
#[derive(Clone, Copy)]
enum OptionPrices<'a> {
    ImpliedVolatility(&'a dyn Surface),
    CallPrice(&'a dyn Surface),
}

/// Rates over the tree, read from zero-rate curves.
struct Rates<'a> {
    interest: &'a CurveRef,
    dividend: &'a CurveRef,
}

impl Rates<'_> {
    fn at(&self, time: f64) -> VolatilityResult<(f64, f64)> {
        Ok((self.interest.y_value(time)?, self.dividend.y_value(time)?))
    }

    /// Discount factor over `[t1, t2]` and forward growth of the asset.
    fn step(&self, t1: f64, t2: f64) -> VolatilityResult<(f64, f64)> {
        let (r1, q1) = self.at(t1)?;
        let (r2, q2) = self.at(t2)?;
        let rate_integral = r2 * t2 - r1 * t1;
        let dividend_integral = q2 * t2 - q1 * t1;
        Ok(((-rate_integral).exp(), (rate_integral - dividend_integral).exp()))
    }
}

/// The fixed log-space grid: node `j` of layer `i` is `spot · e^{(j - i) dx}`.
#[derive(Debug, Clone, Copy)]
struct Grid {
    spot: f64,
    dt: f64,
    dx: f64,
}

impl Grid {
    fn time(&self, layer: usize) -> f64 {
        layer as f64 * self.dt
    }

    fn assets(&self, layer: usize) -> Vec<f64> {
        (0..=2 * layer)
            .map(|j| self.spot * ((j as f64 - layer as f64) * self.dx).exp())
            .collect()
    }
}

impl ImpliedTrinomialTreeLocalVolatilityCalculator {
    /// Creates a calculator.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid.
    pub fn new(config: ImpliedTreeConfig) -> VolatilityResult<Self> {
        config.validate_or_error()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ImpliedTreeConfig {
        &self.config
    }

    fn calibrate(
        &self,
        prices: OptionPrices<'_>,
        spot: f64,
        rates: &Rates<'_>,
        name: String,
    ) -> VolatilityResult<InterpolatedNodalSurface> {
        let n = self.config.n_steps;
        let max_time = self.config.max_time;
        if !(spot.is_finite() && spot > 0.0) {
            return Err(VolatilityError::invalid_parameter(format!(
                "spot must be positive, got {spot}"
            )));
        }

        let grid_volatility = prices.grid_volatility(spot, max_time, rates)?;
        if !(grid_volatility.is_finite() && grid_volatility > 0.0) {
            return Err(VolatilityError::invalid_parameter(format!(
                "grid volatility must be positive, got {grid_volatility}"
            )));
        }
        let dt = max_time / n as f64;
        let grid = Grid {
            spot,
            dt,
            dx: grid_volatility * (2.0 * dt).sqrt(),
        };
        debug!(n_steps = n, max_time, grid_volatility, dx = grid.dx, "implied tree calibration");

        // Two layers of Arrow-Debreu prices, swapped after each step. Every
        // layer is written in full before it is read.
        let mut ad_next = vec![0.0; 2 * n + 1];
        let mut ad_current = vec![0.0; 2 * n + 1];
        arrow_debreu_layer(prices, &grid, n, rates, &mut ad_next[..=2 * n])?;

        let mut variance_next: Vec<f64> = Vec::new();
        let mut layers: Vec<Vec<(f64, f64, f64)>> = Vec::with_capacity(n);
        for i in (0..n).rev() {
            let width = 2 * i + 1;
            arrow_debreu_layer(prices, &grid, i, rates, &mut ad_current[..width])?;

            let time = grid.time(i);
            let (discount, growth) = rates.step(time, grid.time(i + 1))?;
            let assets = grid.assets(i);
            let successors: Vec<Successors> = assets
                .iter()
                .map(|&s| Successors {
                    down: s * (-grid.dx).exp(),
                    middle: s,
                    up: s * grid.dx.exp(),
                    forward: s * growth,
                })
                .collect();
            let transitions = transition_probabilities(
                time,
                &successors,
                &ad_current[..width],
                &ad_next[..width + 2],
                discount,
            )?;

            let mut variance = successors
                .iter()
                .zip(&transitions)
                .map(|(s, p)| local_variance(time, dt, s, p))
                .collect::<VolatilityResult<Vec<_>>>()?;
            variance = moving_average(&variance);
            if i + 1 < n {
                for (j, v) in variance.iter_mut().enumerate() {
                    *v = 0.5 * (*v + variance_next[j + 1]);
                }
            }

            let emitted = if i == 0 { 0..1 } else { 1..width - 1 };
            layers.push(
                emitted
                    .map(|j| (time, assets[j], variance[j].sqrt()))
                    .collect(),
            );
            variance_next = variance;
            mem::swap(&mut ad_current, &mut ad_next);
        }

        let points: Vec<(f64, f64, f64)> = layers.into_iter().rev().flatten().collect();
        debug!(nodes = points.len(), "implied tree calibration done");
        let metadata = SurfaceMetadata::new(name.as_str(), ValueType::LocalVolatility);
        InterpolatedNodalSurface::new(
            metadata,
            points.iter().map(|p| p.0).collect(),
            points.iter().map(|p| p.1).collect(),
            points.iter().map(|p| p.2).collect(),
            self.config.interpolator(),
        )
    }
}

impl LocalVolatilityCalculator for ImpliedTrinomialTreeLocalVolatilityCalculator {
    type Output = InterpolatedNodalSurface;

    fn local_volatility_from_implied_volatility(
        &self,
        implied_volatility: &SurfaceRef,
        spot: f64,
        interest_rate: &CurveRef,
        dividend_rate: &CurveRef,
    ) -> VolatilityResult<InterpolatedNodalSurface> {
        let rates = Rates {
            interest: interest_rate,
            dividend: dividend_rate,
        };
        self.calibrate(
            OptionPrices::ImpliedVolatility(implied_volatility.as_ref()),
            spot,
            &rates,
            format!("{}-LocalVol", implied_volatility.name()),
        )
    }

    fn local_volatility_from_price(
        &self,
        call_price: &SurfaceRef,
        spot: f64,
        interest_rate: &CurveRef,
        dividend_rate: &CurveRef,
    ) -> VolatilityResult<InterpolatedNodalSurface> {
        let rates = Rates {
            interest: interest_rate,
            dividend: dividend_rate,
        };
        self.calibrate(
            OptionPrices::CallPrice(call_price.as_ref()),
            spot,
            &rates,
            format!("{}-LocalVol", call_price.name()),
        )
    }
}

impl OptionPrices<'_> {
    /// Volatility setting the grid spacing: at-the-money at the last time.
    fn grid_volatility(
        &self,
        spot: f64,
        max_time: f64,
        rates: &Rates<'_>,
    ) -> VolatilityResult<f64> {
        match self {
            OptionPrices::ImpliedVolatility(surface) => surface.z_value(max_time, spot),
            OptionPrices::CallPrice(surface) => {
                let (r, q) = rates.at(max_time)?;
                let price = surface.z_value(max_time, spot)?;
                black_scholes::implied_volatility(price, PutCall::Call, spot, spot, max_time, r, q)
            }
        }
    }

    /// Price of a European option expiring at layer `layer`.
    fn price(
        &self,
        put_call: PutCall,
        strike: f64,
        layer: usize,
        time: f64,
        spot: f64,
        rate: f64,
        dividend: f64,
    ) -> VolatilityResult<f64> {
        match self {
            OptionPrices::ImpliedVolatility(surface) => {
                let volatility = surface.z_value(time, strike)?;
                let function = OptionFunction::european(put_call, strike, time, layer);
                // flat zero rate to expiry, unlike the forward steps of the transitions
                let tree = TrinomialTree::new(LatticeSpecification::CoxRossRubinstein);
                let price = tree.price(&function, spot, volatility, rate, dividend)?;
                if price > 0.0 {
                    Ok(price)
                } else {
                    Ok(black_scholes::price(
                        put_call,
                        spot,
                        strike,
                        time,
                        volatility,
                        rate,
                        dividend,
                    ))
                }
            }
            OptionPrices::CallPrice(surface) => {
                let call = surface.z_value(time, strike)?;
                Ok(match put_call {
                    PutCall::Call => call,
                    PutCall::Put => {
                        call - spot * (-dividend * time).exp() + strike * (-rate * time).exp()
                    }
                })
            }
        }
    }
}

/// Fills `ad` with the Arrow-Debreu prices of layer `layer`.
///
/// A call struck at node `j - 1` pays off on nodes `j` and above, so the
/// prices are solved from the top node down using calls, and from the
/// bottom node up using puts. The two passes meet at the middle node,
/// which belongs to the call pass.
fn arrow_debreu_layer(
    prices: OptionPrices<'_>,
    grid: &Grid,
    layer: usize,
    rates: &Rates<'_>,
    ad: &mut [f64],
) -> VolatilityResult<()> {
    if layer == 0 {
        ad[0] = 1.0;
        return Ok(());
    }
    let time = grid.time(layer);
    let (rate, dividend) = rates.at(time)?;
    let assets = grid.assets(layer);
    let spot = grid.spot;
    let top = 2 * layer;

    for j in (layer..=top).rev() {
        let strike = assets[j - 1];
        let call = prices.price(PutCall::Call, strike, layer, time, spot, rate, dividend)?;
        let higher: f64 = ((j + 1)..=top).map(|k| ad[k] * (assets[k] - strike)).sum();
        ad[j] = (call - higher) / (assets[j] - strike);
    }
    for j in 0..layer {
        let strike = assets[j + 1];
        let put = prices.price(PutCall::Put, strike, layer, time, spot, rate, dividend)?;
        let lower: f64 = (0..j).map(|k| ad[k] * (strike - assets[k])).sum();
        ad[j] = (put - lower) / (strike - assets[j]);
    }
    Ok(())
}

/// Transition probabilities from a layer to the next.
///
/// Node `j` of the layer reaches nodes `j`, `j + 1` and `j + 2` of the next
/// one. Above the middle, the Arrow-Debreu price of node `j + 2` of the next
/// layer fixes the up probability of node `j` once the nodes above `j` are
/// known; below the middle, node `j` of the next layer fixes the down
/// probability. The forward fixes the remaining probability.
fn transition_probabilities(
    time: f64,
    successors: &[Successors],
    ad: &[f64],
    ad_next: &[f64],
    discount: f64,
) -> VolatilityResult<Vec<Transition>> {
    let width = successors.len();
    let middle = width / 2;
    let mut transitions = vec![Transition::from_up_down(0.0, 0.0); width];

    for j in (middle..width).rev() {
        let s = &successors[j];
        let mut inflow = ad_next[j + 2] / discount;
        if j + 1 < width {
            inflow -= transitions[j + 1].p_mid * ad[j + 1];
        }
        if j + 2 < width {
            inflow -= transitions[j + 2].p_down * ad[j + 2];
        }
        let p_up = inflow / ad[j];
        let p_mid = (s.forward - s.down - p_up * (s.up - s.down)) / (s.middle - s.down);
        let raw = Transition {
            p_up,
            p_mid,
            p_down: 1.0 - p_up - p_mid,
        };
        transitions[j] = checked(time, s, raw)?;
    }
    for j in 0..middle {
        let s = &successors[j];
        let mut inflow = ad_next[j] / discount;
        if j >= 1 {
            inflow -= transitions[j - 1].p_mid * ad[j - 1];
        }
        if j >= 2 {
            inflow -= transitions[j - 2].p_up * ad[j - 2];
        }
        let p_down = inflow / ad[j];
        let p_mid = (s.up - s.forward - p_down * (s.up - s.down)) / (s.up - s.middle);
        let raw = Transition {
            p_up: 1.0 - p_down - p_mid,
            p_mid,
            p_down,
        };
        transitions[j] = checked(time, s, raw)?;
    }
    Ok(transitions)
}

/// Returns `raw` if valid, its correction otherwise.
fn checked(time: f64, s: &Successors, raw: Transition) -> VolatilityResult<Transition> {
    if raw.is_valid() {
        return Ok(raw);
    }
    warn!(
        time,
        strike = s.middle,
        p_up = raw.p_up,
        p_mid = raw.p_mid,
        p_down = raw.p_down,
        "implied tree probabilities out of range, correcting"
    );
    let corrected = correct_probability(s)?;
    if corrected.is_valid() {
        Ok(corrected)
    } else {
        Err(VolatilityError::invalid_parameter(format!(
            "corrected probabilities ({}, {}, {}) still invalid at time {time}, asset {}",
            corrected.p_up, corrected.p_mid, corrected.p_down, s.middle
        )))
    }
}

/// Probabilities matching the forward, built from the successors alone.
///
/// Half the mass sits on the two nodes bracketing the forward, half on
/// the outer nodes; both halves have the forward as their mean.
fn correct_probability(s: &Successors) -> VolatilityResult<Transition> {
    let Successors {
        down,
        middle,
        up,
        forward,
    } = *s;
    if forward >= middle && forward <= up {
        let p_up = 0.5 * ((forward - middle) / (up - middle) + (forward - down) / (up - down));
        let p_down = 0.5 * (up - forward) / (up - down);
        Ok(Transition::from_up_down(p_up, p_down))
    } else if forward >= down && forward < middle {
        let p_up = 0.5 * (forward - down) / (up - down);
        let p_down = 0.5 * ((middle - forward) / (middle - down) + (up - forward) / (up - down));
        Ok(Transition::from_up_down(p_up, p_down))
    } else {
        Err(VolatilityError::invalid_parameter(format!(
            "forward {forward} outside successor range [{down}, {up}]"
        )))
    }
}

/// Annualized local variance of a node.
///
/// The conditional variance of the next asset, relative to the squared
/// forward, is mapped back to the volatility of the Cox-Ross-Rubinstein
/// step with the same moments. A flat volatility surface is therefore
/// returned exactly.
fn local_variance(time: f64, dt: f64, s: &Successors, p: &Transition) -> VolatilityResult<f64> {
    let f = s.forward;
    let relative = (p.p_up * (s.up - f).powi(2)
        + p.p_mid * (s.middle - f).powi(2)
        + p.p_down * (s.down - f).powi(2))
        / (f * f);
    let raw = relative / dt;
    if raw.is_nan() || raw < 0.0 {
        return Err(VolatilityError::negative_variance(time, s.middle, raw));
    }
    let growth = f / s.middle;
    let half_growth = growth.sqrt();
    let cosh = (growth * (1.0 + relative).sqrt() + 1.0) / (2.0 * half_growth);
    let a = cosh.max(1.0).acosh();
    Ok(2.0 * a * a / dt)
}

/// Five-point moving average, shrinking to the available points at the ends.
fn moving_average(values: &[f64]) -> Vec<f64> {
    let last = values.len().saturating_sub(1);
    (0..values.len())
        .map(|j| {
            let window = &values[j.saturating_sub(2)..=(j + 2).min(last)];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use calibra_curves::{ConstantCurve, CurveMetadata};
    use std::sync::Arc;

    fn successors(s: f64, dx: f64, growth: f64) -> Successors {
        Successors {
            down: s * (-dx).exp(),
            middle: s,
            up: s * dx.exp(),
            forward: s * growth,
        }
    }

    fn flat_rates(r: f64) -> (CurveRef, CurveRef) {
        (
            Arc::new(ConstantCurve::new(CurveMetadata::zero_rates("r"), r)),
            Arc::new(ConstantCurve::new(CurveMetadata::zero_rates("q"), 0.0)),
        )
    }

    #[test]
    fn test_moving_average() {
        let smoothed = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_relative_eq!(smoothed[0], 2.0);
        assert_relative_eq!(smoothed[1], 2.5);
        assert_relative_eq!(smoothed[2], 3.0);
        assert_relative_eq!(smoothed[5], 5.0);
        assert_eq!(moving_average(&[0.3]), vec![0.3]);
    }

    #[test]
    fn test_local_variance_inverts_crr() {
        let (vol, r, dt) = (0.3, 0.04, 0.1);
        let lattice = LatticeSpecification::CoxRossRubinstein.parameters(vol, r, 0.0, dt);
        let dx = lattice.up_factor.ln();
        let s = successors(100.0, dx, (r * dt).exp());
        let p = Transition {
            p_up: lattice.p_up,
            p_mid: lattice.p_mid,
            p_down: lattice.p_down,
        };
        let variance = local_variance(0.5, dt, &s, &p).unwrap();
        assert_relative_eq!(variance.sqrt(), vol, epsilon = 1e-12);
    }

    #[test]
    fn test_correction_matches_forward() {
        for growth in [0.99, 1.0, 1.01] {
            let s = successors(100.0, 0.05, growth);
            let p = correct_probability(&s).unwrap();
            assert!(p.is_valid());
            assert_relative_eq!(p.p_up + p.p_mid + p.p_down, 1.0, epsilon = 1e-15);
            let mean = p.p_up * s.up + p.p_mid * s.middle + p.p_down * s.down;
            assert_relative_eq!(mean, s.forward, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_correction_outside_range() {
        let s = successors(100.0, 0.05, 1.2);
        assert!(matches!(
            correct_probability(&s),
            Err(VolatilityError::InvalidParameter { .. })
        ));
        // forward on the up node leaves no mass below
        let edge = Successors {
            forward: 100.0 * 0.05f64.exp(),
            ..successors(100.0, 0.05, 1.0)
        };
        assert!(checked(1.0, &edge, Transition::from_up_down(2.0, 0.0)).is_err());
    }

    #[test]
    fn test_probabilities_from_crr_arrow_debreu() {
        // Arrow-Debreu prices of a CRR lattice give back its probabilities
        let (vol, r, dt) = (0.2, 0.05, 0.25);
        let lattice = LatticeSpecification::CoxRossRubinstein.parameters(vol, r, 0.0, dt);
        let dx = lattice.up_factor.ln();
        let discount = (-r * dt).exp();
        let growth = (r * dt).exp();

        let mut layer = vec![1.0];
        for _ in 0..3 {
            let mut next = vec![0.0; layer.len() + 2];
            for (j, ad) in layer.iter().enumerate() {
                next[j] += discount * lattice.p_down * ad;
                next[j + 1] += discount * lattice.p_mid * ad;
                next[j + 2] += discount * lattice.p_up * ad;
            }
            layer = next;
        }
        let mut next = vec![0.0; layer.len() + 2];
        for (j, ad) in layer.iter().enumerate() {
            next[j] += discount * lattice.p_down * ad;
            next[j + 1] += discount * lattice.p_mid * ad;
            next[j + 2] += discount * lattice.p_up * ad;
        }

        let spot = 100.0;
        let i = 3;
        let successors: Vec<Successors> = (0..=2 * i)
            .map(|j| successors(spot * ((j as f64 - i as f64) * dx).exp(), dx, growth))
            .collect();
        let transitions =
            transition_probabilities(0.75, &successors, &layer, &next, discount).unwrap();
        for p in transitions {
            assert_relative_eq!(p.p_up, lattice.p_up, epsilon = 1e-10);
            assert_relative_eq!(p.p_mid, lattice.p_mid, epsilon = 1e-10);
            assert_relative_eq!(p.p_down, lattice.p_down, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_inconsistent_arrow_debreu_is_corrected() {
        let dx: f64 = 0.1;
        let growth = 1.01;
        let successors: Vec<Successors> = [100.0 * (-dx).exp(), 100.0, 100.0 * dx.exp()]
            .iter()
            .map(|&s| successors(s, dx, growth))
            .collect();
        // far too much mass on the top node of the next layer
        let ad = [0.3, 0.4, 0.3];
        let ad_next = [0.01, 0.1, 0.2, 0.3, 0.9];
        let transitions = transition_probabilities(1.0, &successors, &ad, &ad_next, 0.99).unwrap();
        for p in transitions {
            assert!(p.is_valid());
            assert_relative_eq!(p.p_up + p.p_mid + p.p_down, 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_arrow_debreu_prices_sum_to_discount_factor() {
        let flat: SurfaceRef = Arc::new(crate::surface::ConstantSurface::new(
            SurfaceMetadata::new("Flat", ValueType::BlackVolatility),
            0.25,
        ));
        let (rate, dividend) = flat_rates(0.03);
        let rates = Rates {
            interest: &rate,
            dividend: &dividend,
        };
        let grid = Grid {
            spot: 100.0,
            dt: 0.15,
            dx: 0.25 * 0.3f64.sqrt(),
        };
        let mut ad = vec![0.0; 11];
        let prices = OptionPrices::ImpliedVolatility(flat.as_ref());
        arrow_debreu_layer(prices, &grid, 5, &rates, &mut ad).unwrap();
        let total: f64 = ad.iter().sum();
        assert_relative_eq!(total, (-0.03f64 * 0.75).exp(), epsilon = 1e-10);
        assert!(ad.iter().all(|&p| p > 0.0));
    }

    #[test]
    fn test_invalid_inputs() {
        let flat: SurfaceRef = Arc::new(crate::surface::ConstantSurface::new(
            SurfaceMetadata::new("Flat", ValueType::BlackVolatility),
            0.25,
        ));
        let (rate, dividend) = flat_rates(0.03);
        let calculator = ImpliedTrinomialTreeLocalVolatilityCalculator::default();
        assert!(calculator
            .local_volatility_from_implied_volatility(&flat, -5.0, &rate, &dividend)
            .is_err());

        let zero: SurfaceRef = Arc::new(crate::surface::ConstantSurface::new(
            SurfaceMetadata::new("Zero", ValueType::BlackVolatility),
            0.0,
        ));
        assert!(matches!(
            calculator.local_volatility_from_implied_volatility(&zero, 100.0, &rate, &dividend),
            Err(VolatilityError::InvalidParameter { .. })
        ));

        let config = ImpliedTreeConfig {
            n_steps: 1,
            ..ImpliedTreeConfig::default()
        };
        assert!(ImpliedTrinomialTreeLocalVolatilityCalculator::new(config).is_err());
    }
}
