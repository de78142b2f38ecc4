//! Integration test: local volatility from equity implied volatility and
//! price surfaces.
//!
//! Spot 100, rate 3%, no dividend. Set `RUST_LOG=calibra_volatility=debug`
//! to follow the calibration.

use std::sync::Arc;

use approx::assert_relative_eq;
use calibra_core::market::ValueType;
use calibra_curves::{ConstantCurve, CurveMetadata, CurveRef};
use calibra_math::interpolation::GridInterpolator;
use calibra_volatility::black_scholes;
use calibra_volatility::prelude::*;
use tracing_subscriber::EnvFilter;

const SPOT: f64 = 100.0;
const RATE: f64 = 0.03;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn rates() -> (CurveRef, CurveRef) {
    (
        Arc::new(ConstantCurve::new(CurveMetadata::zero_rates("USD-Disc"), RATE)),
        Arc::new(ConstantCurve::new(CurveMetadata::zero_rates("EQ-Div"), 0.0)),
    )
}

fn flat_surface(volatility: f64) -> SurfaceRef {
    Arc::new(ConstantSurface::new(
        SurfaceMetadata::new("EQ-Flat", ValueType::BlackVolatility),
        volatility,
    ))
}

/// Implied volatility falling by 10 points per 100 of strike.
fn skewed_surface() -> SurfaceRef {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut zs = Vec::new();
    for &t in &[0.25, 0.5, 1.0, 2.0, 3.0] {
        for &k in &[50.0, 75.0, 100.0, 125.0, 150.0, 200.0] {
            xs.push(t);
            ys.push(k);
            zs.push(0.25 - 0.1 * (k - SPOT) / 100.0);
        }
    }
    Arc::new(
        InterpolatedNodalSurface::new(
            SurfaceMetadata::new("EQ-Skew", ValueType::BlackVolatility),
            xs,
            ys,
            zs,
            GridInterpolator::default(),
        )
        .unwrap(),
    )
}

/// Black-Scholes call prices at a single volatility.
#[derive(Debug)]
struct CallPrices {
    metadata: SurfaceMetadata,
    volatility: f64,
}

impl Surface for CallPrices {
    fn metadata(&self) -> &SurfaceMetadata {
        &self.metadata
    }

    fn parameter_count(&self) -> usize {
        1
    }

    fn parameter(&self, _index: usize) -> VolatilityResult<f64> {
        Ok(self.volatility)
    }

    fn with_parameter(&self, _index: usize, value: f64) -> VolatilityResult<SurfaceRef> {
        Ok(Arc::new(CallPrices {
            metadata: self.metadata.clone(),
            volatility: value,
        }))
    }

    fn z_value(&self, x: f64, y: f64) -> VolatilityResult<f64> {
        Ok(black_scholes::price(PutCall::Call, SPOT, y, x, self.volatility, RATE, 0.0))
    }

    fn z_value_parameter_sensitivity(&self, x: f64, y: f64) -> VolatilityResult<Vec<f64>> {
        Ok(vec![black_scholes::vega(SPOT, y, x, self.volatility, RATE, 0.0)])
    }
}

#[test]
fn test_implied_tree_recovers_flat_volatility() {
    init_tracing();
    let (rate, dividend) = rates();
    let calculator = ImpliedTrinomialTreeLocalVolatilityCalculator::default();
    let local = calculator
        .local_volatility_from_implied_volatility(&flat_surface(0.25), SPOT, &rate, &dividend)
        .unwrap();

    // layer 0 plus the 2i - 1 interior nodes of layers 1 to 19
    assert_eq!(local.parameter_count(), 19 * 19 + 1);
    for &vol in local.z_values() {
        assert_relative_eq!(vol, 0.25, epsilon = 1e-6);
    }
    assert_relative_eq!(local.z_value(1.0, SPOT).unwrap(), 0.25, epsilon = 1e-4);
    assert_eq!(local.metadata().z_value_type, ValueType::LocalVolatility);
    assert_eq!(local.name().as_str(), "EQ-Flat-LocalVol");

    // nodes come out in time order, starting at spot today
    assert_eq!(local.x_values()[0], 0.0);
    assert_eq!(local.y_values()[0], SPOT);
    assert!(local.x_values().windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_implied_tree_from_toml_settings() {
    let config = ImpliedTreeConfig::from_toml_str("n_steps = 10\nmax_time = 2.0").unwrap();
    let calculator = ImpliedTrinomialTreeLocalVolatilityCalculator::new(config).unwrap();
    let (rate, dividend) = rates();
    let local = calculator
        .local_volatility_from_implied_volatility(&flat_surface(0.3), SPOT, &rate, &dividend)
        .unwrap();

    assert_eq!(local.parameter_count(), 9 * 9 + 1);
    let last = local.x_values().iter().copied().fold(0.0, f64::max);
    assert_relative_eq!(last, 1.8, epsilon = 1e-12);
    assert_relative_eq!(local.z_value(0.5, 90.0).unwrap(), 0.3, epsilon = 1e-6);
}

#[test]
fn test_implied_tree_keeps_skew() {
    init_tracing();
    let (rate, dividend) = rates();
    let local = ImpliedTrinomialTreeLocalVolatilityCalculator::default()
        .local_volatility_from_implied_volatility(&skewed_surface(), SPOT, &rate, &dividend)
        .unwrap();

    assert!(local.z_values().iter().all(|v| v.is_finite() && *v > 0.0));
    let low = local.z_value(1.0, 80.0).unwrap();
    let high = local.z_value(1.0, 120.0).unwrap();
    assert!(
        low > high,
        "local vol {low} at 80 should exceed {high} at 120"
    );
}

#[test]
fn test_implied_tree_from_call_prices() {
    let (rate, dividend) = rates();
    let prices: SurfaceRef = Arc::new(CallPrices {
        metadata: SurfaceMetadata::new("EQ-Price", ValueType::Price),
        volatility: 0.25,
    });
    let local = ImpliedTrinomialTreeLocalVolatilityCalculator::default()
        .local_volatility_from_price(&prices, SPOT, &rate, &dividend)
        .unwrap();

    let at_the_money = local.z_value(1.0, SPOT).unwrap();
    assert!(
        (0.2..0.3).contains(&at_the_money),
        "local vol {at_the_money} far from 0.25"
    );
}

#[test]
fn test_dupire_on_flat_and_price_surfaces() {
    let (rate, dividend) = rates();
    let calculator = DupireLocalVolatilityCalculator::default();
    let prices: SurfaceRef = Arc::new(CallPrices {
        metadata: SurfaceMetadata::new("EQ-Price", ValueType::Price),
        volatility: 0.25,
    });

    let from_vol = calculator
        .local_volatility_from_implied_volatility(&flat_surface(0.25), SPOT, &rate, &dividend)
        .unwrap();
    let from_price = calculator
        .local_volatility_from_price(&prices, SPOT, &rate, &dividend)
        .unwrap();

    for (t, k) in [(0.5, 90.0), (1.0, 100.0), (2.0, 110.0)] {
        assert_relative_eq!(from_vol.z_value(t, k).unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(from_price.z_value(t, k).unwrap(), 0.25, epsilon = 1e-4);
    }
}

#[test]
fn test_dupire_on_skewed_surface() {
    let (rate, dividend) = rates();
    let surface = skewed_surface();
    let dupire = DupireLocalVolatilityCalculator::default()
        .local_volatility_from_implied_volatility(&surface, SPOT, &rate, &dividend)
        .unwrap();

    // sensitivities cover every node of the implied surface
    let result = dupire.evaluate(1.5, 90.0).unwrap();
    assert_eq!(result.derivatives.len(), surface.parameter_count());
    assert!(result.value > 0.25);
    assert!(dupire.z_value(1.5, 90.0).unwrap() > dupire.z_value(1.5, 110.0).unwrap());
}
