//! MEMB over precomputed neighbourhoods.

use rayon::prelude::*;
use tracing::{debug, instrument};

use super::{BoxCovering, BoxDiameter, CentreSet, Coverage, MassSelector, TieBreak, stalled};
use crate::{
    error::Result,
    graph::{Bfs, Graph},
    telemetry,
};

/// MEMB engine that computes each radius-`rB` ball once per pass.
///
/// Balls are built in parallel before the first round. Memory grows with the
/// summed ball sizes, which approaches `N²` once `rB` nears the diameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachedMemb {
    tie_break: TieBreak,
}

impl CachedMemb {
    /// Creates the engine with the given tie-break policy.
    #[must_use]
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }
}

/// Radius-bounded ball around every vertex, each listed in discovery order.
pub(crate) fn neighbourhoods(graph: &Graph, radius: usize) -> Vec<Vec<usize>> {
    let vertex_count = graph.vertex_count();
    (0..vertex_count)
        .into_par_iter()
        .map_init(
            || Bfs::new(vertex_count),
            |bfs, source| {
                let mut ball = Vec::new();
                bfs.explore(graph, &[source], Some(radius), |vertex, _| ball.push(vertex));
                ball
            },
        )
        .collect()
}

impl BoxCovering for CachedMemb {
    fn name(&self) -> &'static str {
        "cached"
    }

    #[instrument(
        name = "covering.memb",
        err,
        skip(self, graph),
        fields(tier = "cached", vertices = graph.vertex_count(), diameter = diameter.get()),
    )]
    fn cover(&self, graph: &Graph, diameter: BoxDiameter) -> Result<CentreSet> {
        let vertex_count = graph.vertex_count();
        if diameter.is_trivial() {
            return Ok(CentreSet::identity(vertex_count));
        }

        let balls = neighbourhoods(graph, diameter.radius());
        let mut coverage = Coverage::new(vertex_count);
        let mut is_centre = vec![false; vertex_count];
        let mut centres = CentreSet::default();
        let mut breaker = self.tie_break.breaker();
        let mut evaluations = 0_u64;

        while !coverage.is_complete() {
            let mut selector = MassSelector::default();
            for (candidate, ball) in balls.iter().enumerate() {
                if is_centre[candidate] {
                    continue;
                }
                evaluations += 1;
                selector.offer(candidate, coverage.excluded_mass(ball));
            }

            let centre = selector
                .choose(&mut breaker)
                .ok_or_else(|| stalled(&coverage))?;
            is_centre[centre] = true;
            centres.push(centre);
            for &vertex in &balls[centre] {
                coverage.cover(vertex);
            }
        }

        telemetry::increment(telemetry::MEMB_MASS_EVALUATIONS, evaluations);
        debug!(boxes = centres.box_count(), evaluations, "cached covering complete");
        Ok(centres)
    }
}
