//! Box-covering benchmarks.
//!
//! Compares the MEMB tiers and random sequential selection on fractal and
//! small-world networks at a fixed box diameter.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use fractanet_benches::{
    error::BenchSetupError, params::CoveringBenchParams, source::SyntheticGraph,
};
use fractanet_core::{BoxCovering, BoxDiameter, CoveringAlgorithm, TieBreak};

const SEED: u64 = 42;

const BOX_DIAMETER: usize = 3;

const NETWORKS: &[SyntheticGraph] = &[
    SyntheticGraph::Flower { generation: 4 },
    SyntheticGraph::Flower { generation: 5 },
    SyntheticGraph::PreferentialAttachment {
        vertex_count: 500,
        edges_per_vertex: 2,
        seed: SEED,
    },
];

const ALGORITHMS: &[CoveringAlgorithm] = &[
    CoveringAlgorithm::Naive(TieBreak::Lowest),
    CoveringAlgorithm::Cached(TieBreak::Lowest),
    CoveringAlgorithm::Accelerated,
    CoveringAlgorithm::Matrix(TieBreak::Lowest),
    CoveringAlgorithm::RandomSequential { seed: SEED },
];

fn memb_cover_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let diameter = BoxDiameter::new(BOX_DIAMETER)?;

    for algorithm in ALGORITHMS {
        let mut group = c.benchmark_group(format!("cover_{}", algorithm.name()));
        group.sample_size(20);

        for network in NETWORKS {
            let graph = network.generate()?;
            let bench_params = CoveringBenchParams {
                family: network.family(),
                vertex_count: graph.vertex_count(),
                lb: BOX_DIAMETER,
            };

            group.bench_with_input(
                BenchmarkId::from_parameter(&bench_params),
                &graph,
                |b, graph| {
                    b.iter(|| algorithm.cover(graph, diameter));
                },
            );
        }

        group.finish();
    }
    Ok(())
}

fn memb_cover(c: &mut Criterion) {
    if let Err(err) = memb_cover_impl(c) {
        panic!("memb_cover benchmark setup failed: {err}");
    }
}

criterion_group!(benches, memb_cover);
criterion_main!(benches);
