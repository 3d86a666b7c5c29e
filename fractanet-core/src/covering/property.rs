//! Property-based tests for the MEMB engines.
//!
//! Random graphs are drawn from a handful of topologies; every engine must
//! produce a valid covering, the deterministic tiers must agree exactly, and
//! excluded masses must never grow during a pass.

use fractanet_test_support::graphs::{GraphFixture, balanced_tree, cycle, erdos_renyi, path};
use proptest::prelude::*;
use test_strategy::Arbitrary;

use crate::{graph::Graph, test_utils::suite_proptest_config};

use super::{
    AcceleratedMemb, BoxCovering, BoxDiameter, CachedMemb, Coverage, MatrixMemb, NaiveMemb,
    RandomSequential, TieBreak,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
enum Topology {
    #[weight(1)]
    Path,
    #[weight(1)]
    Cycle,
    #[weight(1)]
    Tree,
    #[weight(3)]
    Sparse,
    #[weight(2)]
    Dense,
    #[weight(1)]
    Split,
}

fn build(topology: Topology, size: usize, seed: u64) -> GraphFixture {
    match topology {
        Topology::Path => path(size),
        Topology::Cycle => cycle(size),
        Topology::Tree => balanced_tree(2, size.ilog2() as usize),
        Topology::Sparse => erdos_renyi(size, 2.5 / size as f64, seed),
        Topology::Dense => erdos_renyi(size, 0.35, seed),
        Topology::Split => erdos_renyi(size / 2, 0.3, seed)
            .disjoint_union(&erdos_renyi(size - size / 2, 0.3, seed.wrapping_add(1))),
    }
}

fn graph_strategy() -> impl Strategy<Value = Graph> {
    (any::<Topology>(), 1_usize..40, any::<u64>()).prop_map(|(topology, size, seed)| {
        let fixture = build(topology, size, seed);
        Graph::from_edges(fixture.vertex_count, fixture.edges)
            .expect("fixture edges are in range")
    })
}

fn uncovered_after(graph: &Graph, centres: &[usize], radius: usize) -> Coverage {
    let mut coverage = Coverage::new(graph.vertex_count());
    for &centre in centres {
        for vertex in graph.neighbourhood(centre, radius).expect("centre exists") {
            coverage.cover(vertex);
        }
    }
    coverage
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn deterministic_tiers_agree(graph in graph_strategy(), lb in 1_usize..8) {
        let diameter = BoxDiameter::new(lb).expect("lb is positive");
        let reference = NaiveMemb::new(TieBreak::Lowest).cover(&graph, diameter)?;
        let cached = CachedMemb::new(TieBreak::Lowest).cover(&graph, diameter)?;
        let accelerated = AcceleratedMemb.cover(&graph, diameter)?;
        let matrix = MatrixMemb::new(TieBreak::Lowest).cover(&graph, diameter)?;
        prop_assert_eq!(&cached, &reference);
        prop_assert_eq!(&accelerated, &reference);
        prop_assert_eq!(&matrix, &reference);
    }

    #[test]
    fn every_engine_covers_every_vertex(
        graph in graph_strategy(),
        lb in 1_usize..8,
        seed in any::<u64>(),
    ) {
        let diameter = BoxDiameter::new(lb).expect("lb is positive");
        let engines: [Box<dyn BoxCovering>; 3] = [
            Box::new(NaiveMemb::new(TieBreak::Random { seed })),
            Box::new(MatrixMemb::new(TieBreak::Random { seed })),
            Box::new(RandomSequential::new(seed)),
        ];
        for engine in engines {
            let centres = engine.cover(&graph, diameter)?;
            let coverage = uncovered_after(&graph, centres.as_slice(), diameter.radius());
            prop_assert!(coverage.is_complete(), "{} left vertices uncovered", engine.name());
            prop_assert!(centres.box_count() <= graph.vertex_count());
        }
    }

    #[test]
    fn excluded_mass_never_increases(graph in graph_strategy(), lb in 3_usize..8) {
        let diameter = BoxDiameter::new(lb).expect("lb is positive");
        let radius = diameter.radius();
        let centres = NaiveMemb::new(TieBreak::Lowest).cover(&graph, diameter)?;
        let balls: Vec<Vec<usize>> = (0..graph.vertex_count())
            .map(|vertex| graph.neighbourhood(vertex, radius).expect("vertex exists"))
            .collect();

        let mut previous: Vec<usize> = balls.iter().map(Vec::len).collect();
        for prefix in 1..=centres.box_count() {
            let coverage = uncovered_after(&graph, &centres.as_slice()[..prefix], radius);
            let masses: Vec<usize> = balls.iter().map(|ball| coverage.excluded_mass(ball)).collect();
            for (vertex, (&now, &before)) in masses.iter().zip(&previous).enumerate() {
                prop_assert!(now <= before, "mass of {} rose from {} to {}", vertex, before, now);
            }
            previous = masses;
        }
    }

    #[test]
    fn every_centre_excludes_new_mass(graph in graph_strategy(), lb in 3_usize..8) {
        let diameter = BoxDiameter::new(lb).expect("lb is positive");
        let radius = diameter.radius();
        let centres = AcceleratedMemb.cover(&graph, diameter)?;
        let mut coverage = Coverage::new(graph.vertex_count());
        for centre in centres.iter() {
            let before = coverage.uncovered_count();
            for vertex in graph.neighbourhood(centre, radius).expect("centre exists") {
                coverage.cover(vertex);
            }
            prop_assert!(coverage.uncovered_count() < before);
        }
        prop_assert!(coverage.is_complete());
    }
}
