//! Lazy-greedy MEMB backed by a max-heap of stale masses.
//!
//! Covering only ever removes vertices from the uncovered set, so a mass
//! computed earlier in the pass is an upper bound on the current one. The
//! heap is keyed by `(stale mass, Reverse(vertex))`. A popped candidate is
//! refreshed and accepted when its fresh key still dominates the top of the
//! heap; otherwise it is pushed back with the fresh mass. The accepted vertex
//! therefore has the maximum current mass and, among equals, the lowest id.

use std::{cmp::Reverse, collections::BinaryHeap};

use tracing::{debug, instrument};

use super::{BoxCovering, BoxDiameter, CentreSet, Coverage, stalled};
use crate::{
    error::Result,
    graph::{Bfs, Graph},
    telemetry,
};

/// Deterministic MEMB engine with lazy mass updates.
///
/// Ties always resolve to the lowest vertex id, matching the other tiers
/// under [`super::TieBreak::Lowest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceleratedMemb;

type HeapKey = (usize, Reverse<usize>);

impl BoxCovering for AcceleratedMemb {
    fn name(&self) -> &'static str {
        "accelerated"
    }

    #[instrument(
        name = "covering.memb",
        err,
        skip(self, graph),
        fields(tier = "accelerated", vertices = graph.vertex_count(), diameter = diameter.get()),
    )]
    fn cover(&self, graph: &Graph, diameter: BoxDiameter) -> Result<CentreSet> {
        let vertex_count = graph.vertex_count();
        if diameter.is_trivial() {
            return Ok(CentreSet::identity(vertex_count));
        }
        let radius = diameter.radius();

        let mut coverage = Coverage::new(vertex_count);
        let mut bfs = Bfs::new(vertex_count);
        let mut evaluations = 0_u64;

        let mut heap: BinaryHeap<HeapKey> = (0..vertex_count)
            .map(|vertex| {
                let mass = excluded_mass(&mut bfs, graph, &coverage, vertex, radius);
                (mass, Reverse(vertex))
            })
            .collect();
        evaluations += vertex_count as u64;

        let mut centres = CentreSet::default();
        while !coverage.is_complete() {
            let centre = loop {
                let Some((_, Reverse(candidate))) = heap.pop() else {
                    return Err(stalled(&coverage));
                };
                let fresh = excluded_mass(&mut bfs, graph, &coverage, candidate, radius);
                evaluations += 1;
                if fresh == 0 {
                    continue;
                }
                let key = (fresh, Reverse(candidate));
                match heap.peek() {
                    Some(&top) if key < top => heap.push(key),
                    _ => break candidate,
                }
            };

            centres.push(centre);
            bfs.explore(graph, &[centre], Some(radius), |vertex, _| {
                coverage.cover(vertex);
            });
        }

        telemetry::increment(telemetry::MEMB_MASS_EVALUATIONS, evaluations);
        debug!(boxes = centres.box_count(), evaluations, "accelerated covering complete");
        Ok(centres)
    }
}

fn excluded_mass(
    bfs: &mut Bfs,
    graph: &Graph,
    coverage: &Coverage,
    vertex: usize,
    radius: usize,
) -> usize {
    let mut mass = 0;
    bfs.explore(graph, &[vertex], Some(radius), |member, _| {
        if !coverage.is_covered(member) {
            mass += 1;
        }
    });
    mass
}
