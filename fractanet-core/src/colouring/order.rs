//! Vertex orders for greedy colouring.

use crate::{
    error::{FractalError, Result},
    graph::Graph,
};

/// Order in which greedy colouring visits the vertices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VertexOrder {
    /// Ascending vertex id.
    #[default]
    Index,
    /// Smallest-last order (Matula and Beck) of the graph being covered.
    SmallestLast,
    /// Caller-supplied permutation of `0..N`.
    Custom(Vec<usize>),
}

impl VertexOrder {
    /// Materialises the order for `graph`.
    ///
    /// # Errors
    /// Returns [`FractalError::InvalidVertexOrder`] when a custom order has
    /// the wrong length, repeats a vertex or names an unknown one.
    pub fn sequence(&self, graph: &Graph) -> Result<Vec<usize>> {
        let vertex_count = graph.vertex_count();
        match self {
            Self::Index => Ok((0..vertex_count).collect()),
            Self::SmallestLast => Ok(smallest_last(graph)),
            Self::Custom(order) => {
                let invalid = FractalError::InvalidVertexOrder {
                    expected: vertex_count,
                    got: order.len(),
                };
                if order.len() != vertex_count {
                    return Err(invalid);
                }
                let mut seen = vec![false; vertex_count];
                for &vertex in order {
                    match seen.get_mut(vertex) {
                        Some(flag) if !*flag => *flag = true,
                        _ => return Err(invalid),
                    }
                }
                Ok(order.clone())
            }
        }
    }
}

/// Smallest-last ordering: repeatedly remove a vertex of minimum remaining
/// degree (lowest id on ties) and place it before every vertex removed so
/// far.
///
/// # Examples
/// ```
/// use fractanet_core::{Graph, smallest_last};
///
/// let star = Graph::from_edges(4, [(0, 1), (0, 2), (0, 3)])?;
/// assert_eq!(smallest_last(&star), vec![3, 0, 2, 1]);
/// # Ok::<(), fractanet_core::FractalError>(())
/// ```
#[must_use]
pub fn smallest_last(graph: &Graph) -> Vec<usize> {
    let vertex_count = graph.vertex_count();
    let mut degree: Vec<usize> = (0..vertex_count).map(|v| graph.degree(v)).collect();
    let mut removed = vec![false; vertex_count];
    let mut order = Vec::with_capacity(vertex_count);

    for _ in 0..vertex_count {
        let Some(vertex) = (0..vertex_count)
            .filter(|&v| !removed[v])
            .min_by_key(|&v| degree[v])
        else {
            break;
        };
        removed[vertex] = true;
        order.push(vertex);
        for &neighbour in graph.neighbours(vertex) {
            if !removed[neighbour] {
                degree[neighbour] -= 1;
            }
        }
    }

    order.reverse();
    order
}
