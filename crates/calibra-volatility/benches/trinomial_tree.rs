//! Benchmarks for trinomial tree pricing and implied tree calibration.
//!
//! Run with: cargo bench -p calibra-volatility

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use calibra_core::market::ValueType;
use calibra_curves::{ConstantCurve, CurveMetadata, CurveRef};
use calibra_math::interpolation::GridInterpolator;
use calibra_volatility::prelude::*;

fn skewed_surface() -> SurfaceRef {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut zs = Vec::new();
    for &t in &[0.25, 0.5, 1.0, 2.0, 3.0] {
        for &k in &[60.0, 80.0, 100.0, 120.0, 140.0] {
            xs.push(t);
            ys.push(k);
            zs.push(0.2 + 0.1 * (100.0 - k) / 100.0);
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
        .expect("valid surface"),
    )
}

fn bench_tree_pricing(c: &mut Criterion) {
    let mut group = c.benchmark_group("trinomial_tree");
    for steps in [50usize, 200, 800] {
        let european = OptionFunction::european(PutCall::Call, 100.0, 1.0, steps);
        let american = OptionFunction::american(PutCall::Put, 100.0, 1.0, steps);
        let tree = TrinomialTree::new(LatticeSpecification::CoxRossRubinstein);
        group.throughput(Throughput::Elements((steps * steps) as u64));
        group.bench_with_input(BenchmarkId::new("european", steps), &european, |b, f| {
            b.iter(|| tree.price(black_box(f), 100.0, 0.2, 0.05, 0.01));
        });
        group.bench_with_input(BenchmarkId::new("american", steps), &american, |b, f| {
            b.iter(|| tree.price_with_greeks(black_box(f), 100.0, 0.2, 0.05, 0.01));
        });
    }
    group.finish();
}

fn bench_implied_tree(c: &mut Criterion) {
    let surface = skewed_surface();
    let rate: CurveRef = Arc::new(ConstantCurve::new(CurveMetadata::zero_rates("r"), 0.03));
    let dividend: CurveRef = Arc::new(ConstantCurve::new(CurveMetadata::zero_rates("q"), 0.01));

    let mut group = c.benchmark_group("implied_tree");
    group.sample_size(20);
    for n_steps in [10usize, 20, 40] {
        let config = ImpliedTreeConfig {
            n_steps,
            ..ImpliedTreeConfig::default()
        };
        let calculator =
            ImpliedTrinomialTreeLocalVolatilityCalculator::new(config).expect("valid config");
        group.bench_function(BenchmarkId::from_parameter(n_steps), |b| {
            b.iter(|| {
                calculator.local_volatility_from_implied_volatility(
                    black_box(&surface),
                    100.0,
                    &rate,
                    &dividend,
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tree_pricing, bench_implied_tree);
criterion_main!(benches);
