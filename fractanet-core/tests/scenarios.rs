//! End-to-end scenarios across covering, colouring, renormalisation and
//! classification.

use fractanet_core::{
    BoxCovering, BoxDiameter, CentreSet, ClassifierConfig, CoveringAlgorithm, Graph,
    Renormaliser, ScalingCurve, TieBreak, VertexOrder, classify, cover_by_colouring,
};
use rstest::{fixture, rstest};

fn path(vertex_count: usize) -> Graph {
    Graph::from_edges(vertex_count, (1..vertex_count).map(|v| (v - 1, v)))
        .expect("path edges are in range")
}

fn cycle(vertex_count: usize) -> Graph {
    Graph::from_edges(vertex_count, (0..vertex_count).map(|v| (v, (v + 1) % vertex_count)))
        .expect("cycle edges are in range")
}

fn diameter(lb: usize) -> BoxDiameter {
    BoxDiameter::new(lb).expect("diameter is positive")
}

#[fixture]
fn engines() -> Vec<CoveringAlgorithm> {
    vec![
        CoveringAlgorithm::Naive(TieBreak::Lowest),
        CoveringAlgorithm::Cached(TieBreak::Lowest),
        CoveringAlgorithm::Accelerated,
        CoveringAlgorithm::Matrix(TieBreak::Lowest),
        CoveringAlgorithm::Auto,
    ]
}

#[rstest]
fn single_edge_needs_one_box(engines: Vec<CoveringAlgorithm>) {
    let graph = path(2);
    for engine in engines {
        let centres = engine.cover(&graph, diameter(3)).expect("cover succeeds");
        assert_eq!(centres.as_slice(), &[0], "{}", engine.name());
    }
}

#[rstest]
#[case::unit(1)]
#[case::pair(2)]
fn trivial_diameters_give_the_identity(engines: Vec<CoveringAlgorithm>, #[case] lb: usize) {
    let graph = path(2);
    for engine in engines {
        let centres = engine.cover(&graph, diameter(lb)).expect("cover succeeds");
        assert_eq!(centres, CentreSet::identity(2), "{}", engine.name());
    }
}

#[rstest]
fn six_cycle_needs_two_opposite_boxes(engines: Vec<CoveringAlgorithm>) {
    let graph = cycle(6);
    for engine in engines {
        let centres = engine.cover(&graph, diameter(3)).expect("cover succeeds");
        assert_eq!(centres.as_slice(), &[0, 3], "{}", engine.name());
    }
}

#[rstest]
fn five_path_memb_and_colouring_agree(engines: Vec<CoveringAlgorithm>) {
    let graph = path(5);
    for engine in engines {
        let centres = engine.cover(&graph, diameter(3)).expect("cover succeeds");
        assert_eq!(centres.box_count(), 2, "{}", engine.name());
    }
    let colouring =
        cover_by_colouring(&graph, diameter(3), &VertexOrder::Index).expect("colouring succeeds");
    assert_eq!(colouring.box_count(), 2);
}

#[test]
fn power_law_curve_is_fractal() {
    let curve = ScalingCurve::from_points(vec![(3, 100), (5, 36), (7, 18), (9, 11)]);
    let report = classify(&curve, &ClassifierConfig::default()).expect("curve classifies");
    assert!(report.is_fractal);
    assert!(report.dimension.is_some());
}

#[test]
fn halving_curve_is_exponential() {
    let curve = ScalingCurve::from_points(vec![(3, 100), (5, 50), (7, 25), (9, 12)]);
    let report = classify(&curve, &ClassifierConfig::default()).expect("curve classifies");
    assert!(!report.is_fractal);
}

#[test]
fn exponential_decay_is_not_fractal() {
    let curve = ScalingCurve::from_points(vec![(1, 100), (2, 61), (3, 37), (4, 22)]);
    let report = classify(&curve, &ClassifierConfig::default()).expect("curve classifies");
    assert!(!report.is_fractal);
    assert!(report.dimension.is_none());
}

#[rstest]
#[case::path(path(27), 3)]
#[case::cycle(cycle(40), 5)]
fn renormalisation_terminates_at_one_vertex(#[case] graph: Graph, #[case] lb: usize) {
    let flow = Renormaliser::new(lb)
        .expect("diameter is large enough")
        .with_rng_seed(11)
        .run(&graph)
        .expect("flow completes");
    let counts = flow.vertex_counts();
    assert_eq!(counts.first(), Some(&graph.vertex_count()));
    assert_eq!(counts.last(), Some(&1));
    assert!(counts.windows(2).all(|pair| pair[1] < pair[0]));
}
