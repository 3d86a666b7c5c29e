//! Reference MEMB: every round recomputes every excluded mass from scratch.

use tracing::{debug, instrument};

use super::{BoxCovering, BoxDiameter, CentreSet, Coverage, MassSelector, TieBreak, stalled};
use crate::{
    error::Result,
    graph::{Bfs, Graph},
    telemetry,
};

/// Baseline MEMB engine.
///
/// Each round runs one bounded breadth-first search per non-centre vertex,
/// so a pass costs `O(NB · N · ball)`. Use it as an oracle for the faster
/// tiers rather than on large graphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaiveMemb {
    tie_break: TieBreak,
}

impl NaiveMemb {
    /// Creates the engine with the given tie-break policy.
    #[must_use]
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }
}

impl BoxCovering for NaiveMemb {
    fn name(&self) -> &'static str {
        "naive"
    }

    #[instrument(
        name = "covering.memb",
        err,
        skip(self, graph),
        fields(tier = "naive", vertices = graph.vertex_count(), diameter = diameter.get()),
    )]
    fn cover(&self, graph: &Graph, diameter: BoxDiameter) -> Result<CentreSet> {
        let vertex_count = graph.vertex_count();
        if diameter.is_trivial() {
            return Ok(CentreSet::identity(vertex_count));
        }
        let radius = diameter.radius();

        let mut coverage = Coverage::new(vertex_count);
        let mut is_centre = vec![false; vertex_count];
        let mut centres = CentreSet::default();
        let mut bfs = Bfs::new(vertex_count);
        let mut breaker = self.tie_break.breaker();
        let mut evaluations = 0_u64;

        while !coverage.is_complete() {
            let mut selector = MassSelector::default();
            for candidate in (0..vertex_count).filter(|&v| !is_centre[v]) {
                let mut mass = 0;
                bfs.explore(graph, &[candidate], Some(radius), |vertex, _| {
                    if !coverage.is_covered(vertex) {
                        mass += 1;
                    }
                });
                evaluations += 1;
                selector.offer(candidate, mass);
            }

            let centre = selector
                .choose(&mut breaker)
                .ok_or_else(|| stalled(&coverage))?;
            is_centre[centre] = true;
            centres.push(centre);
            bfs.explore(graph, &[centre], Some(radius), |vertex, _| {
                coverage.cover(vertex);
            });
        }

        telemetry::increment(telemetry::MEMB_MASS_EVALUATIONS, evaluations);
        debug!(boxes = centres.box_count(), evaluations, "naive covering complete");
        Ok(centres)
    }
}
