//! Lattice parameterizations.

use serde::{Deserialize, Serialize};

/// Node spacing and transition probabilities of one time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeParameters {
    /// Ratio of the up successor to the current asset.
    pub up_factor: f64,
    /// Ratio of the middle successor to the current asset.
    pub middle_factor: f64,
    /// Ratio of the down successor to the current asset.
    pub down_factor: f64,
    /// Probability of moving up.
    pub p_up: f64,
    /// Probability of staying in the middle.
    pub p_mid: f64,
    /// Probability of moving down.
    pub p_down: f64,
}

impl LatticeParameters {
    /// Middle factor over down factor: the ratio between adjacent nodes.
    #[must_use]
    pub fn middle_over_down(&self) -> f64 {
        self.middle_factor / self.down_factor
    }

    /// Returns true if every probability is in (0, 1).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let valid = |p: f64| p > 0.0 && p < 1.0;
        valid(self.p_up) && valid(self.p_mid) && valid(self.p_down)
    }
}

/// A trinomial lattice parameterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LatticeSpecification {
    /// Two Cox-Ross-Rubinstein binomial half steps merged into one
    /// trinomial step; `dx = σ√(2dt)`.
    #[default]
    CoxRossRubinstein,
    /// Trigeorgis log-space lattice matching mean and variance of the log
    /// return; `dx = σ√(3dt)`.
    Trigeorgis,
}

impl LatticeSpecification {
    /// Parameters of one step of length `dt`.
    #[must_use]
    pub fn parameters(
        &self,
        volatility: f64,
        rate: f64,
        dividend: f64,
        dt: f64,
    ) -> LatticeParameters {
        match self {
            LatticeSpecification::CoxRossRubinstein => {
                let nu = rate - dividend;
                let dx = volatility * (2.0 * dt).sqrt();
                let up_half = (0.5 * dx).exp();
                let down_half = (-0.5 * dx).exp();
                let drift_half = (0.5 * nu * dt).exp();
                let width = up_half - down_half;
                let p_up = ((drift_half - down_half) / width).powi(2);
                let p_down = ((up_half - drift_half) / width).powi(2);
                LatticeParameters {
                    up_factor: dx.exp(),
                    middle_factor: 1.0,
                    down_factor: (-dx).exp(),
                    p_up,
                    p_mid: 1.0 - p_up - p_down,
                    p_down,
                }
            }
            LatticeSpecification::Trigeorgis => {
                let nu = rate - dividend - 0.5 * volatility * volatility;
                let dx = volatility * (3.0 * dt).sqrt();
                let second = (volatility * volatility * dt + nu * nu * dt * dt) / (dx * dx);
                let first = nu * dt / dx;
                LatticeParameters {
                    up_factor: dx.exp(),
                    middle_factor: 1.0,
                    down_factor: (-dx).exp(),
                    p_up: 0.5 * (second + first),
                    p_mid: 1.0 - second,
                    p_down: 0.5 * (second - first),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn first_two_moments(p: &LatticeParameters) -> (f64, f64) {
        let mean = p.p_up * p.up_factor + p.p_mid * p.middle_factor + p.p_down * p.down_factor;
        let second = p.p_up * p.up_factor.powi(2)
            + p.p_mid * p.middle_factor.powi(2)
            + p.p_down * p.down_factor.powi(2);
        (mean, second)
    }

    #[test]
    fn test_crr_matches_forward() {
        let dt = 0.01;
        let p = LatticeSpecification::CoxRossRubinstein.parameters(0.2, 0.05, 0.01, dt);
        assert!(p.is_valid());
        assert_relative_eq!(p.p_up + p.p_mid + p.p_down, 1.0, epsilon = 1e-15);
        let (mean, _) = first_two_moments(&p);
        assert_relative_eq!(mean, (0.04f64 * dt).exp(), epsilon = 1e-14);
        assert_relative_eq!(p.up_factor * p.down_factor, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_trigeorgis_matches_log_moments() {
        let (vol, r, q, dt) = (0.3, 0.05, 0.0, 0.02);
        let p = LatticeSpecification::Trigeorgis.parameters(vol, r, q, dt);
        assert!(p.is_valid());
        let dx = p.up_factor.ln();
        let nu = r - q - 0.5 * vol * vol;
        let mean = (p.p_up - p.p_down) * dx;
        let second = (p.p_up + p.p_down) * dx * dx;
        assert_relative_eq!(mean, nu * dt, epsilon = 1e-15);
        assert_relative_eq!(second, vol * vol * dt + nu * nu * dt * dt, epsilon = 1e-15);
    }

    #[test]
    fn test_invalid_when_drift_dominates() {
        // huge drift over a long step with tiny volatility
        let p = LatticeSpecification::CoxRossRubinstein.parameters(0.01, 0.5, 0.0, 1.0);
        assert!(!p.is_valid());
    }

    proptest! {
        #[test]
        fn prop_probabilities_valid_for_moderate_inputs(
            vol in 0.1f64..0.6,
            rate in 0.0f64..0.1,
            dividend in 0.0f64..0.05,
            dt in 0.001f64..0.05,
        ) {
            let lattices = [
                LatticeSpecification::CoxRossRubinstein,
                LatticeSpecification::Trigeorgis,
            ];
            for lattice in lattices {
                let p = lattice.parameters(vol, rate, dividend, dt);
                prop_assert!(p.is_valid());
                prop_assert!((p.p_up + p.p_mid + p.p_down - 1.0).abs() < 1e-14);
            }
        }
    }
}
