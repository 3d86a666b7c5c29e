//! Unit tests for the box covering engines.

use fractanet_test_support::graphs::{balanced_tree, complete, cycle, erdos_renyi, path, uv_flower};
use rstest::rstest;

use crate::{error::FractalError, graph::Graph, test_utils::graph_of};

use super::{
    AUTO_MATRIX_MAX_VERTICES, AcceleratedMemb, BoxCovering, BoxDiameter, CachedMemb, CentreSet,
    Coverage, CoveringAlgorithm, MatrixMemb, NaiveMemb, RandomSequential, TieBreak,
};

fn diameter(lb: usize) -> BoxDiameter {
    BoxDiameter::new(lb).expect("diameter is positive")
}

fn lowest_tier_engines() -> Vec<Box<dyn BoxCovering>> {
    vec![
        Box::new(NaiveMemb::new(TieBreak::Lowest)),
        Box::new(CachedMemb::new(TieBreak::Lowest)),
        Box::new(AcceleratedMemb),
        Box::new(MatrixMemb::new(TieBreak::Lowest)),
    ]
}

/// Asserts that the radius-`rB` balls around `centres` reach every vertex
/// and that no centre repeats.
fn assert_is_covering(graph: &Graph, centres: &CentreSet, lb: BoxDiameter) {
    let mut seen = centres.as_slice().to_vec();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), centres.box_count(), "centres must be distinct");

    let mut coverage = Coverage::new(graph.vertex_count());
    for centre in centres.iter() {
        for vertex in graph.neighbourhood(centre, lb.radius()).expect("centre exists") {
            coverage.cover(vertex);
        }
    }
    assert!(
        coverage.is_complete(),
        "vertex {:?} left uncovered",
        coverage.first_uncovered()
    );
}

#[test]
fn zero_diameter_is_rejected() {
    assert_eq!(
        BoxDiameter::new(0),
        Err(FractalError::InvalidBoxDiameter { got: 0, minimum: 1 })
    );
    assert!(BoxDiameter::try_from(0).is_err());
}

#[rstest]
#[case::one(1, 0)]
#[case::two(2, 0)]
#[case::three(3, 1)]
#[case::four(4, 1)]
#[case::seven(7, 3)]
fn radius_is_half_of_diameter_minus_one(#[case] lb: usize, #[case] radius: usize) {
    assert_eq!(diameter(lb).radius(), radius);
    assert_eq!(diameter(lb).get(), lb);
}

#[rstest]
#[case::lb_one(1)]
#[case::lb_two(2)]
fn trivial_diameters_yield_the_identity_covering(#[case] lb: usize) {
    let graph = graph_of(cycle(5));
    for engine in lowest_tier_engines() {
        let centres = engine.cover(&graph, diameter(lb)).expect("covering succeeds");
        assert_eq!(centres, CentreSet::identity(5), "engine {}", engine.name());
    }
    let sequential = RandomSequential::new(3)
        .cover(&graph, diameter(lb))
        .expect("covering succeeds");
    assert_eq!(sequential, CentreSet::identity(5));
}

#[rstest]
#[case::two_vertex_path(graph_of(path(2)), vec![0])]
#[case::six_cycle(graph_of(cycle(6)), vec![0, 3])]
#[case::five_path(graph_of(path(5)), vec![1, 3])]
#[case::triangle(graph_of(complete(3)), vec![0])]
fn engines_select_expected_centres(#[case] graph: Graph, #[case] expected: Vec<usize>) {
    for engine in lowest_tier_engines() {
        let centres = engine.cover(&graph, diameter(3)).expect("covering succeeds");
        assert_eq!(centres.as_slice(), expected.as_slice(), "engine {}", engine.name());
    }
}

#[rstest]
#[case::flower(graph_of(uv_flower(2, 2, 3)))]
#[case::tree(graph_of(balanced_tree(3, 3)))]
#[case::sparse_random(graph_of(erdos_renyi(40, 0.08, 11)))]
#[case::dense_random(graph_of(erdos_renyi(30, 0.4, 5)))]
fn engines_agree_on_fixtures(#[case] graph: Graph) {
    for lb in [3, 4, 5, 7] {
        let reference = NaiveMemb::default()
            .cover(&graph, diameter(lb))
            .expect("covering succeeds");
        assert_is_covering(&graph, &reference, diameter(lb));
        for engine in lowest_tier_engines() {
            let centres = engine.cover(&graph, diameter(lb)).expect("covering succeeds");
            assert_eq!(centres, reference, "engine {} at lB = {lb}", engine.name());
        }
    }
}

#[test]
fn disconnected_graphs_are_fully_covered() {
    let graph = graph_of(path(2).disjoint_union(&path(2)).disjoint_union(&path(1)));
    for engine in lowest_tier_engines() {
        let centres = engine.cover(&graph, diameter(3)).expect("covering succeeds");
        assert_eq!(centres.as_slice(), &[0, 2, 4], "engine {}", engine.name());
    }
}

#[test]
fn empty_graph_needs_no_boxes() {
    let graph = Graph::new(0);
    for engine in lowest_tier_engines() {
        let centres = engine.cover(&graph, diameter(3)).expect("covering succeeds");
        assert!(centres.is_empty(), "engine {}", engine.name());
    }
}

#[rstest]
#[case::naive(CoveringAlgorithm::Naive(TieBreak::Random { seed: 17 }))]
#[case::cached(CoveringAlgorithm::Cached(TieBreak::Random { seed: 17 }))]
#[case::matrix(CoveringAlgorithm::Matrix(TieBreak::Random { seed: 17 }))]
fn random_tie_break_is_reproducible(#[case] algorithm: CoveringAlgorithm) {
    let graph = graph_of(cycle(12));
    let first = algorithm.cover(&graph, diameter(3)).expect("covering succeeds");
    let second = algorithm.cover(&graph, diameter(3)).expect("covering succeeds");
    assert_eq!(first, second);
    assert_is_covering(&graph, &first, diameter(3));
}

#[test]
fn random_sequential_covers_with_at_least_the_optimal_count() {
    let graph = graph_of(path(5));
    for seed in 0..16 {
        let centres = RandomSequential::new(seed)
            .cover(&graph, diameter(3))
            .expect("covering succeeds");
        assert_is_covering(&graph, &centres, diameter(3));
        assert!((2..=5).contains(&centres.box_count()));
    }
}

#[test]
fn random_sequential_is_seeded() {
    let graph = graph_of(erdos_renyi(50, 0.05, 2));
    let engine = RandomSequential::new(99);
    assert_eq!(
        engine.cover(&graph, diameter(3)).expect("covering succeeds"),
        engine.cover(&graph, diameter(3)).expect("covering succeeds")
    );
}

#[test]
fn matrix_tier_enforces_vertex_limit() {
    let graph = graph_of(path(6));
    let engine = MatrixMemb::new(TieBreak::Lowest).with_max_vertices(5);
    assert_eq!(engine.max_vertices(), 5);
    assert_eq!(
        engine.cover(&graph, diameter(3)),
        Err(FractalError::GraphTooLarge {
            vertices: 6,
            limit: 5
        })
    );
}

#[test]
fn matrix_box_counts_share_one_distance_matrix() {
    let graph = graph_of(path(5));
    let curve = MatrixMemb::default()
        .box_counts(&graph, 3)
        .expect("box counts succeed");
    assert_eq!(curve.points(), &[(3, 2), (5, 1)]);
}

#[test]
fn matrix_box_counts_reject_empty_graph() {
    assert_eq!(
        MatrixMemb::default().box_counts(&Graph::new(0), 1),
        Err(FractalError::EmptyGraph)
    );
}

#[test]
fn auto_prefers_matrix_for_small_dense_graphs() {
    let dense = graph_of(complete(8));
    assert_eq!(
        CoveringAlgorithm::Auto.resolve(&dense),
        CoveringAlgorithm::Matrix(TieBreak::Lowest)
    );

    let sparse = graph_of(path(AUTO_MATRIX_MAX_VERTICES + 1));
    assert_eq!(
        CoveringAlgorithm::Auto.resolve(&sparse),
        CoveringAlgorithm::Accelerated
    );
    assert_eq!(
        CoveringAlgorithm::Naive(TieBreak::Lowest).resolve(&sparse),
        CoveringAlgorithm::Naive(TieBreak::Lowest)
    );
}

#[test]
fn coverage_never_reverts() {
    let mut coverage = Coverage::new(4);
    assert!(coverage.cover(2));
    assert!(!coverage.cover(2));
    assert!(!coverage.cover(10));
    assert_eq!(coverage.uncovered_count(), 3);
    assert_eq!(coverage.excluded_mass(&[1, 2, 3]), 2);
    for vertex in 0..4 {
        coverage.cover(vertex);
    }
    assert!(coverage.is_complete());
    assert_eq!(coverage.flags(), &[true; 4]);
}
