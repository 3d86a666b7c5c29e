//! Random sequential box covering.

use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};
use tracing::{debug, instrument};

use super::{BoxCovering, BoxDiameter, CentreSet, Coverage};
use crate::{
    error::Result,
    graph::{Bfs, Graph},
};

/// Visits vertices in a seeded random order and keeps a visited vertex as a
/// centre only when its radius-`rB` ball covers something new.
///
/// Cheaper than MEMB but typically needs more boxes. The same seed always
/// yields the same centres for a given graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomSequential {
    seed: u64,
}

impl RandomSequential {
    /// Creates the engine with the seed for its visiting order.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoxCovering for RandomSequential {
    fn name(&self) -> &'static str {
        "random_sequential"
    }

    #[instrument(
        name = "covering.random_sequential",
        err,
        skip(self, graph),
        fields(vertices = graph.vertex_count(), diameter = diameter.get(), seed = self.seed),
    )]
    fn cover(&self, graph: &Graph, diameter: BoxDiameter) -> Result<CentreSet> {
        let vertex_count = graph.vertex_count();
        if diameter.is_trivial() {
            return Ok(CentreSet::identity(vertex_count));
        }
        let radius = diameter.radius();

        let mut order: Vec<usize> = (0..vertex_count).collect();
        order.shuffle(&mut SmallRng::seed_from_u64(self.seed));

        let mut coverage = Coverage::new(vertex_count);
        let mut bfs = Bfs::new(vertex_count);
        let mut centres = CentreSet::default();
        for candidate in order {
            if coverage.is_complete() {
                break;
            }
            let mut newly_covered = 0_usize;
            bfs.explore(graph, &[candidate], Some(radius), |vertex, _| {
                if coverage.cover(vertex) {
                    newly_covered += 1;
                }
            });
            if newly_covered > 0 {
                centres.push(candidate);
            }
        }

        debug!(boxes = centres.box_count(), "random sequential covering complete");
        Ok(centres)
    }
}
