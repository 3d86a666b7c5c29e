//! Renormalisation flow benchmarks.
//!
//! Runs the full flow down to a single vertex at several box diameters.
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
use fractanet_core::Renormaliser;

const SEED: u64 = 42;

const BOX_DIAMETERS: &[usize] = &[3, 5];

const NETWORK: SyntheticGraph = SyntheticGraph::Flower { generation: 5 };

fn renormalise_flow_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("renormalise_flow");
    group.sample_size(10);
    let graph = NETWORK.generate()?;

    for &lb in BOX_DIAMETERS {
        let renormaliser = Renormaliser::new(lb)?.with_rng_seed(SEED);
        let bench_params = CoveringBenchParams {
            family: NETWORK.family(),
            vertex_count: graph.vertex_count(),
            lb,
        };

        group.bench_with_input(
            BenchmarkId::from_parameter(&bench_params),
            &renormaliser,
            |b, renormaliser| {
                b.iter(|| renormaliser.run(&graph));
            },
        );
    }

    group.finish();
    Ok(())
}

fn renormalise_flow(c: &mut Criterion) {
    if let Err(err) = renormalise_flow_impl(c) {
        panic!("renormalise_flow benchmark setup failed: {err}");
    }
}

criterion_group!(benches, renormalise_flow);
criterion_main!(benches);
