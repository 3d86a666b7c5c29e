//! Scaling-curve benchmarks.
//!
//! Measures a full `NB(lB)` sweep, and the classification fits on top of
//! it, for fractal and small-world networks.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use fractanet_benches::{error::BenchSetupError, params::CurveBenchParams, source::SyntheticGraph};
use fractanet_core::{ClassifierConfig, CurveConfig, classify, scaling_curve};

const NETWORKS: &[SyntheticGraph] = &[
    SyntheticGraph::Flower { generation: 4 },
    SyntheticGraph::Lattice { side: 20 },
    SyntheticGraph::PreferentialAttachment {
        vertex_count: 300,
        edges_per_vertex: 2,
        seed: 42,
    },
];

fn scaling_curve_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("scaling_curve");
    group.sample_size(10);
    let config = CurveConfig::default();

    for network in NETWORKS {
        let graph = network.generate()?;
        let bench_params = CurveBenchParams {
            family: network.family(),
            vertex_count: graph.vertex_count(),
        };

        group.bench_with_input(
            BenchmarkId::from_parameter(&bench_params),
            &graph,
            |b, graph| {
                b.iter(|| scaling_curve(graph, &config));
            },
        );
    }

    group.finish();
    Ok(())
}

fn classification_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("classify");
    let classifier = ClassifierConfig::default();

    for network in NETWORKS {
        let graph = network.generate()?;
        let curve = scaling_curve(&graph, &CurveConfig::default())?;
        let bench_params = CurveBenchParams {
            family: network.family(),
            vertex_count: graph.vertex_count(),
        };

        group.bench_with_input(
            BenchmarkId::from_parameter(&bench_params),
            &curve,
            |b, curve| {
                b.iter(|| classify(curve, &classifier));
            },
        );
    }

    group.finish();
    Ok(())
}

fn scaling_benches(c: &mut Criterion) {
    if let Err(err) = scaling_curve_impl(c) {
        panic!("scaling_curve benchmark setup failed: {err}");
    }
    if let Err(err) = classification_impl(c) {
        panic!("classify benchmark setup failed: {err}");
    }
}

criterion_group!(benches, scaling_benches);
criterion_main!(benches);
