//! Synthetic networks for benchmarks.
//!
//! Three families cover the regimes of interest: the (2,2)-flower is
//! fractal with dimension 2, the square lattice is fractal with dimension 2
//! in the Euclidean sense, and preferential attachment produces a
//! small-world network whose box counts decay exponentially.

use fractanet_core::Graph;
use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::error::BenchSetupError;

/// Errors raised while generating a synthetic network.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// A size parameter was zero.
    #[error("{context} must be positive")]
    ZeroSize {
        /// Name of the offending parameter.
        context: &'static str,
    },
    /// Preferential attachment needs more vertices than edges per vertex.
    #[error("need more than {edges_per_vertex} vertices (got {vertex_count})")]
    TooFewVertices {
        /// Requested vertex count.
        vertex_count: usize,
        /// Requested edges per new vertex.
        edges_per_vertex: usize,
    },
}

/// Synthetic network families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntheticGraph {
    /// Deterministic (2,2)-flower after `generation` rewrites.
    Flower {
        /// Number of rewrites of the initial edge.
        generation: usize,
    },
    /// `side × side` square lattice.
    Lattice {
        /// Number of vertices per row and column.
        side: usize,
    },
    /// Preferential attachment seeded from a small clique.
    PreferentialAttachment {
        /// Total number of vertices.
        vertex_count: usize,
        /// Edges added with every new vertex.
        edges_per_vertex: usize,
        /// Seed for target selection.
        seed: u64,
    },
}

impl SyntheticGraph {
    /// Short family name used in benchmark ids.
    #[must_use]
    pub const fn family(&self) -> &'static str {
        match self {
            Self::Flower { .. } => "flower",
            Self::Lattice { .. } => "lattice",
            Self::PreferentialAttachment { .. } => "attachment",
        }
    }

    /// Builds the network.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::Synthetic`] for unusable parameters.
    pub fn generate(&self) -> Result<Graph, BenchSetupError> {
        let (vertex_count, edges) = match *self {
            Self::Flower { generation } => flower(generation),
            Self::Lattice { side } => lattice(side)?,
            Self::PreferentialAttachment {
                vertex_count,
                edges_per_vertex,
                seed,
            } => preferential_attachment(vertex_count, edges_per_vertex, seed)?,
        };
        Ok(Graph::from_edges(vertex_count, edges)?)
    }
}

fn flower(generation: usize) -> (usize, Vec<(usize, usize)>) {
    let mut vertex_count = 2;
    let mut edges = vec![(0, 1)];
    for _ in 0..generation {
        let mut next = Vec::with_capacity(edges.len().saturating_mul(4));
        for (left, right) in edges {
            let (upper, lower) = (vertex_count, vertex_count + 1);
            vertex_count += 2;
            next.extend([(left, upper), (upper, right), (left, lower), (lower, right)]);
        }
        edges = next;
    }
    (vertex_count, edges)
}

fn lattice(side: usize) -> Result<(usize, Vec<(usize, usize)>), SyntheticError> {
    if side == 0 {
        return Err(SyntheticError::ZeroSize { context: "lattice side" });
    }
    let mut edges = Vec::new();
    for row in 0..side {
        for column in 0..side {
            let vertex = row * side + column;
            if column + 1 < side {
                edges.push((vertex, vertex + 1));
            }
            if row + 1 < side {
                edges.push((vertex, vertex + side));
            }
        }
    }
    Ok((side * side, edges))
}

fn preferential_attachment(
    vertex_count: usize,
    edges_per_vertex: usize,
    seed: u64,
) -> Result<(usize, Vec<(usize, usize)>), SyntheticError> {
    if edges_per_vertex == 0 {
        return Err(SyntheticError::ZeroSize {
            context: "edges per vertex",
        });
    }
    if vertex_count <= edges_per_vertex {
        return Err(SyntheticError::TooFewVertices {
            vertex_count,
            edges_per_vertex,
        });
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    let mut endpoints = Vec::new();
    for left in 0..=edges_per_vertex {
        for right in left + 1..=edges_per_vertex {
            edges.push((left, right));
            endpoints.extend([left, right]);
        }
    }

    let mut targets = Vec::with_capacity(edges_per_vertex);
    for vertex in edges_per_vertex + 1..vertex_count {
        targets.clear();
        while targets.len() < edges_per_vertex {
            if let Some(&target) = endpoints.choose(&mut rng) {
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }
        for &target in &targets {
            edges.push((vertex, target));
            endpoints.extend([vertex, target]);
        }
    }
    Ok((vertex_count, edges))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::seed(0, 2, 1)]
    #[case::first(1, 4, 4)]
    #[case::third(3, 44, 64)]
    fn flowers_grow_by_rewriting_edges(
        #[case] generation: usize,
        #[case] vertices: usize,
        #[case] edges: usize,
    ) {
        let graph = SyntheticGraph::Flower { generation }
            .generate()
            .expect("flowers are always valid");
        assert_eq!(graph.vertex_count(), vertices);
        assert_eq!(graph.edge_count(), edges);
    }

    #[test]
    fn lattice_has_expected_shape() {
        let graph = SyntheticGraph::Lattice { side: 4 }
            .generate()
            .expect("lattice is valid");
        assert_eq!(graph.vertex_count(), 16);
        assert_eq!(graph.edge_count(), 24);
        assert_eq!(graph.diameter().expect("lattice is connected"), 6);
    }

    #[test]
    fn preferential_attachment_is_connected_and_seeded() {
        let network = SyntheticGraph::PreferentialAttachment {
            vertex_count: 200,
            edges_per_vertex: 2,
            seed: 7,
        };
        let first = network.generate().expect("parameters are valid");
        let second = network.generate().expect("parameters are valid");
        assert_eq!(first, second);
        assert!(first.is_connected());
        assert_eq!(first.edge_count(), 1 + 2 * (200 - 3) + 2);
    }

    #[rstest]
    #[case::zero_side(SyntheticGraph::Lattice { side: 0 })]
    #[case::zero_edges(SyntheticGraph::PreferentialAttachment {
        vertex_count: 10,
        edges_per_vertex: 0,
        seed: 1,
    })]
    #[case::too_small(SyntheticGraph::PreferentialAttachment {
        vertex_count: 3,
        edges_per_vertex: 3,
        seed: 1,
    })]
    fn unusable_parameters_are_rejected(#[case] network: SyntheticGraph) {
        assert!(matches!(network.generate(), Err(BenchSetupError::Synthetic(_))));
    }
}
