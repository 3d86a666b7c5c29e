//! Unit tests for box assignment and renormalisation.

use fractanet_test_support::graphs::{balanced_tree, cycle, erdos_renyi, path, uv_flower};
use rand::{SeedableRng, rngs::SmallRng};
use rstest::rstest;

use crate::{
    covering::{BoxCovering, BoxDiameter, CentreSet, CoveringAlgorithm, TieBreak},
    error::FractalError,
    graph::Graph,
    test_utils::graph_of,
};

use super::{Renormaliser, assign_boxes, central_distances, renormalise};

fn rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

#[test]
fn central_distances_use_the_nearest_centre() {
    let graph = graph_of(cycle(6));
    let centres = CentreSet::from_vec(vec![0, 3]);
    assert_eq!(
        central_distances(&graph, &centres).expect("all reachable"),
        vec![0, 1, 1, 0, 1, 1]
    );
}

#[test]
fn central_distances_reject_unreachable_vertices() {
    let graph = graph_of(path(2).disjoint_union(&path(2)));
    let centres = CentreSet::from_vec(vec![0]);
    assert_eq!(
        central_distances(&graph, &centres),
        Err(FractalError::NoPathToCentre { vertex: 2 })
    );
}

#[test]
fn central_distances_reject_unknown_centres() {
    let graph = graph_of(path(2));
    assert!(matches!(
        central_distances(&graph, &CentreSet::from_vec(vec![4])),
        Err(FractalError::InvalidVertex { vertex: 4, .. })
    ));
}

#[test]
fn centres_open_boxes_in_selection_order() {
    let graph = graph_of(path(5));
    let centres = CentreSet::from_vec(vec![3, 1]);
    let central = central_distances(&graph, &centres).expect("all reachable");
    let assignment = assign_boxes(&graph, &centres, &central, &mut rng(0)).expect("assignment");
    assert_eq!(assignment.box_of(3), Some(0));
    assert_eq!(assignment.box_of(1), Some(1));
    assert_eq!(assignment.box_of(0), Some(1));
    assert_eq!(assignment.box_of(4), Some(0));
    assert!(matches!(assignment.box_of(2), Some(0 | 1)));
    assert_eq!(assignment.box_count(), 2);
}

#[test]
fn tied_vertices_pick_each_candidate_box_for_some_seed() {
    let graph = graph_of(path(5));
    let centres = CentreSet::from_vec(vec![1, 3]);
    let central = central_distances(&graph, &centres).expect("all reachable");
    let seen: Vec<usize> = (0..64)
        .map(|seed| {
            assign_boxes(&graph, &centres, &central, &mut rng(seed))
                .expect("assignment")
                .as_slice()[2]
        })
        .collect();
    assert!(seen.contains(&0));
    assert!(seen.contains(&1));
}

#[test]
fn assignment_rejects_repeated_centres() {
    let graph = graph_of(path(3));
    let centres = CentreSet::from_vec(vec![1, 1]);
    let central = vec![1, 0, 1];
    assert_eq!(
        assign_boxes(&graph, &centres, &central, &mut rng(0)),
        Err(FractalError::InvariantViolation {
            invariant: "centres are distinct",
            vertex: 1
        })
    );
}

#[test]
fn assignment_rejects_vertices_without_closer_neighbours() {
    let graph = graph_of(path(3));
    let centres = CentreSet::from_vec(vec![0]);
    let inconsistent = vec![0, 2, 2];
    assert!(matches!(
        assign_boxes(&graph, &centres, &inconsistent, &mut rng(0)),
        Err(FractalError::InvariantViolation { vertex: 2, .. })
    ));
}

#[test]
fn assignment_table_lists_every_vertex() {
    let graph = graph_of(path(3));
    let centres = CentreSet::from_vec(vec![1]);
    let central = central_distances(&graph, &centres).expect("all reachable");
    let assignment = assign_boxes(&graph, &centres, &central, &mut rng(0)).expect("assignment");
    let mut table = Vec::new();
    assignment.write_table(&mut table).expect("write to vec");
    assert_eq!(
        String::from_utf8(table).expect("utf8"),
        "vertex,box\n0,0\n1,0\n2,0\n"
    );
    assert_eq!(assignment.boxes(), vec![vec![0, 1, 2]]);
}

#[test]
fn six_cycle_collapses_to_an_edge() {
    let graph = graph_of(cycle(6));
    let centres = CentreSet::from_vec(vec![0, 3]);
    let result = renormalise(&graph, &centres, &mut rng(5)).expect("renormalise");
    assert_eq!(result.graph().vertex_count(), 2);
    assert_eq!(result.graph().edges().collect::<Vec<_>>(), vec![(0, 1)]);
    let boxes = result.assignment().boxes();
    assert_eq!(boxes.iter().map(Vec::len).sum::<usize>(), 6);
    assert!(boxes[0].contains(&0) && boxes[1].contains(&3));
}

#[rstest]
#[case::flower(graph_of(uv_flower(2, 2, 3)))]
#[case::tree(graph_of(balanced_tree(3, 3)))]
#[case::random(graph_of(erdos_renyi(40, 0.1, 9).disjoint_union(&path(1))))]
fn supernodes_are_adjacent_exactly_when_boxes_touch(#[case] graph: Graph) {
    let centres = CoveringAlgorithm::Accelerated
        .cover(&graph, BoxDiameter::new(3).expect("positive"))
        .expect("covering");
    let result = renormalise(&graph, &centres, &mut rng(2)).expect("renormalise");
    let assignment = result.assignment();
    for left in 0..assignment.box_count() {
        for right in left + 1..assignment.box_count() {
            let touching = graph.edges().any(|(u, v)| {
                let pair = (assignment.as_slice()[u], assignment.as_slice()[v]);
                pair == (left, right) || pair == (right, left)
            });
            assert_eq!(result.graph().is_adjacent(left, right), touching);
        }
    }
}

#[rstest]
#[case::lb_one(1)]
#[case::lb_two(2)]
fn flow_rejects_small_diameters(#[case] lb: usize) {
    assert_eq!(
        Renormaliser::new(lb),
        Err(FractalError::InvalidBoxDiameter { got: lb, minimum: 3 })
    );
}

#[test]
fn flow_rejects_disconnected_and_empty_graphs() {
    let renormaliser = Renormaliser::new(3).expect("valid diameter");
    assert_eq!(renormaliser.run(&Graph::new(0)), Err(FractalError::EmptyGraph));
    let split = graph_of(path(3).disjoint_union(&path(3)));
    assert_eq!(
        renormaliser.run(&split),
        Err(FractalError::Disconnected { components: 2 })
    );
}

#[test]
fn single_vertex_needs_no_steps() {
    let flow = Renormaliser::new(3)
        .expect("valid diameter")
        .run(&Graph::new(1))
        .expect("flow succeeds");
    assert!(flow.is_empty());
    assert_eq!(flow.vertex_counts(), vec![1]);
    assert!(flow.final_graph().is_none());
}

#[rstest]
#[case::accelerated(CoveringAlgorithm::Accelerated)]
#[case::matrix(CoveringAlgorithm::Matrix(TieBreak::Lowest))]
#[case::sequential(CoveringAlgorithm::RandomSequential { seed: 4 })]
#[case::auto(CoveringAlgorithm::Auto)]
fn flow_terminates_at_one_vertex(#[case] algorithm: CoveringAlgorithm) {
    let graph = graph_of(uv_flower(2, 2, 4));
    for lb in [3, 4, 5] {
        let flow = Renormaliser::new(lb)
            .expect("valid diameter")
            .with_algorithm(algorithm)
            .with_rng_seed(11)
            .run(&graph)
            .expect("flow succeeds");
        let counts = flow.vertex_counts();
        assert_eq!(counts.first(), Some(&graph.vertex_count()));
        assert_eq!(counts.last(), Some(&1));
        assert!(counts.windows(2).all(|pair| pair[1] < pair[0]), "{counts:?}");
        assert!(flow.steps().iter().all(|step| step.graph().is_connected()));
    }
}

#[test]
fn flow_is_reproducible_for_a_seed() {
    let connected = graph_of(erdos_renyi(60, 0.06, 13))
        .largest_component()
        .expect("graph is non-empty");
    let renormaliser = Renormaliser::new(3).expect("valid diameter").with_rng_seed(3);
    assert_eq!(renormaliser.run(&connected), renormaliser.run(&connected));
    assert_eq!(renormaliser.rng_seed(), 3);
    assert_eq!(renormaliser.diameter().get(), 3);
}
