//! Graph access layer used by the covering and renormalisation engines.
//!
//! [`Graph`] is a simple undirected graph over vertices `0..N` stored as
//! sorted adjacency lists. Self-loops are dropped and parallel edges collapse
//! on insertion, so every query sees a simple graph. All distances are hop
//! counts computed by breadth-first search.

mod bfs;
mod distance;

use std::io::{self, Write};

use rayon::prelude::*;

use crate::error::{FractalError, Result};

pub(crate) use self::bfs::Bfs;
pub use self::distance::{DEFAULT_MATRIX_VERTEX_LIMIT, DistanceMatrix};

/// Undirected simple graph with dense integer vertex ids.
///
/// # Examples
/// ```
/// use fractanet_core::Graph;
///
/// let graph = Graph::from_edges(4, [(0, 1), (1, 2), (2, 3), (3, 3), (1, 0)])?;
/// assert_eq!(graph.vertex_count(), 4);
/// assert_eq!(graph.edge_count(), 3);
/// assert_eq!(graph.neighbourhood(0, 2)?, vec![0, 1, 2]);
/// assert_eq!(graph.diameter()?, 3);
/// # Ok::<(), fractanet_core::FractalError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl Graph {
    /// Creates a graph with `vertex_count` isolated vertices.
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
            edge_count: 0,
        }
    }

    /// Builds a graph from an undirected edge list.
    ///
    /// Self-loops are ignored and repeated edges are stored once.
    ///
    /// # Errors
    /// Returns [`FractalError::InvalidVertex`] when an endpoint is not below
    /// `vertex_count`.
    pub fn from_edges<I>(vertex_count: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut adjacency = vec![Vec::new(); vertex_count];
        for (left, right) in edges {
            for vertex in [left, right] {
                if vertex >= vertex_count {
                    return Err(FractalError::InvalidVertex {
                        vertex,
                        vertex_count,
                    });
                }
            }
            if left == right {
                continue;
            }
            adjacency[left].push(right);
            adjacency[right].push(left);
        }

        let mut edge_count = 0;
        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
            neighbours.dedup();
            edge_count += neighbours.len();
        }

        Ok(Self {
            adjacency,
            edge_count: edge_count / 2,
        })
    }

    /// Returns the number of vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex_count(&self) -> usize { self.adjacency.len() }

    /// Returns the number of undirected edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.edge_count }

    /// Returns `true` when the graph has no vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.adjacency.is_empty() }

    /// Iterates over every edge once as `(smaller, larger)` endpoint pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(vertex, neighbours)| {
                neighbours
                    .iter()
                    .filter(move |&&next| vertex < next)
                    .map(move |&next| (vertex, next))
            })
    }

    /// Returns the sorted neighbours of `vertex`, or an empty slice when the
    /// vertex does not exist.
    #[must_use]
    pub fn neighbours(&self, vertex: usize) -> &[usize] {
        self.adjacency.get(vertex).map_or(&[], Vec::as_slice)
    }

    /// Returns the degree of `vertex`, or zero when it does not exist.
    #[must_use]
    pub fn degree(&self, vertex: usize) -> usize {
        self.neighbours(vertex).len()
    }

    /// Returns `true` when `left` and `right` share an edge.
    #[must_use]
    pub fn is_adjacent(&self, left: usize, right: usize) -> bool {
        self.neighbours(left).binary_search(&right).is_ok()
    }

    /// Returns the fraction of possible edges that are present.
    #[must_use]
    pub fn density(&self) -> f64 {
        let n = self.vertex_count();
        if n < 2 {
            return 0.0;
        }
        let possible = n as f64 * (n - 1) as f64 / 2.0;
        self.edge_count as f64 / possible
    }

    /// Returns every vertex within `radius` hops of `vertex`, including
    /// `vertex` itself, in ascending id order.
    ///
    /// # Errors
    /// Returns [`FractalError::InvalidVertex`] for an unknown vertex.
    pub fn neighbourhood(&self, vertex: usize, radius: usize) -> Result<Vec<usize>> {
        self.check_vertex(vertex)?;
        let mut found = Vec::new();
        Bfs::new(self.vertex_count()).explore(self, &[vertex], Some(radius), |next, _| {
            found.push(next);
        });
        found.sort_unstable();
        Ok(found)
    }

    /// Returns the number of vertices within `radius` hops of `vertex`.
    ///
    /// # Errors
    /// Returns [`FractalError::InvalidVertex`] for an unknown vertex.
    pub fn neighbourhood_size(&self, vertex: usize, radius: usize) -> Result<usize> {
        self.check_vertex(vertex)?;
        let mut size = 0;
        Bfs::new(self.vertex_count()).explore(self, &[vertex], Some(radius), |_, _| size += 1);
        Ok(size)
    }

    /// Returns hop distances from `source` to every vertex; `None` marks
    /// unreachable vertices.
    ///
    /// # Errors
    /// Returns [`FractalError::InvalidVertex`] for an unknown source.
    pub fn distances_from(&self, source: usize) -> Result<Vec<Option<usize>>> {
        self.check_vertex(source)?;
        let mut distances = vec![None; self.vertex_count()];
        Bfs::new(self.vertex_count()).explore(self, &[source], None, |vertex, depth| {
            distances[vertex] = Some(depth);
        });
        Ok(distances)
    }

    /// Returns the hop distance between two vertices, or `None` when no path
    /// exists.
    ///
    /// # Errors
    /// Returns [`FractalError::InvalidVertex`] for an unknown endpoint.
    pub fn distance(&self, from: usize, to: usize) -> Result<Option<usize>> {
        self.check_vertex(to)?;
        Ok(self.distances_from(from)?[to])
    }

    /// Adds an undirected edge. Returns `false` for self-loops and edges that
    /// already exist.
    ///
    /// # Errors
    /// Returns [`FractalError::InvalidVertex`] for an unknown endpoint.
    pub fn add_edge(&mut self, left: usize, right: usize) -> Result<bool> {
        self.check_vertex(left)?;
        self.check_vertex(right)?;
        if left == right {
            return Ok(false);
        }
        let Err(slot) = self.adjacency[left].binary_search(&right) else {
            return Ok(false);
        };
        self.adjacency[left].insert(slot, right);
        if let Err(slot) = self.adjacency[right].binary_search(&left) {
            self.adjacency[right].insert(slot, left);
        }
        self.edge_count += 1;
        Ok(true)
    }

    /// Removes an undirected edge. Returns `false` when it was absent.
    ///
    /// # Errors
    /// Returns [`FractalError::InvalidVertex`] for an unknown endpoint.
    pub fn remove_edge(&mut self, left: usize, right: usize) -> Result<bool> {
        self.check_vertex(left)?;
        self.check_vertex(right)?;
        let Ok(slot) = self.adjacency[left].binary_search(&right) else {
            return Ok(false);
        };
        self.adjacency[left].remove(slot);
        if let Ok(slot) = self.adjacency[right].binary_search(&left) {
            self.adjacency[right].remove(slot);
        }
        self.edge_count -= 1;
        Ok(true)
    }

    /// Extracts the subgraph induced by `vertices`.
    ///
    /// The kept vertices are relabelled `0..k` in ascending order of their
    /// original ids; duplicates in `vertices` are ignored.
    ///
    /// # Errors
    /// Returns [`FractalError::InvalidVertex`] for an unknown vertex.
    pub fn induced_subgraph(&self, vertices: &[usize]) -> Result<Self> {
        let mut kept = vertices.to_vec();
        kept.sort_unstable();
        kept.dedup();
        let mut relabel = vec![None; self.vertex_count()];
        for (new_id, &vertex) in kept.iter().enumerate() {
            self.check_vertex(vertex)?;
            relabel[vertex] = Some(new_id);
        }

        let edges = self.edges().filter_map(|(left, right)| {
            Some((relabel[left]?, relabel[right]?))
        });
        Self::from_edges(kept.len(), edges)
    }

    /// Removes `vertex` and its incident edges, shifting higher ids down by one.
    ///
    /// # Errors
    /// Returns [`FractalError::InvalidVertex`] for an unknown vertex.
    pub fn remove_vertex(&self, vertex: usize) -> Result<Self> {
        self.check_vertex(vertex)?;
        let kept: Vec<usize> = (0..self.vertex_count())
            .filter(|&other| other != vertex)
            .collect();
        self.induced_subgraph(&kept)
    }

    /// Returns the connected components, largest first. Components of equal
    /// size are ordered by their smallest vertex; members are sorted.
    #[must_use]
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let n = self.vertex_count();
        let mut seen = vec![false; n];
        let mut bfs = Bfs::new(n);
        let mut components = Vec::new();
        for start in 0..n {
            if seen[start] {
                continue;
            }
            let mut members = Vec::new();
            bfs.explore(self, &[start], None, |vertex, _| {
                seen[vertex] = true;
                members.push(vertex);
            });
            members.sort_unstable();
            components.push(members);
        }
        // Stable sort keeps discovery order (smallest vertex first) among ties.
        components.sort_by(|left, right| right.len().cmp(&left.len()));
        components
    }

    /// Returns `true` when the graph is non-empty and has a single component.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        let mut reached = 0;
        Bfs::new(self.vertex_count()).explore(self, &[0], None, |_, _| reached += 1);
        reached == self.vertex_count()
    }

    /// Returns the subgraph induced by the largest connected component.
    ///
    /// # Errors
    /// Returns [`FractalError::EmptyGraph`] when the graph has no vertices.
    pub fn largest_component(&self) -> Result<Self> {
        let components = self.connected_components();
        let largest = components.first().ok_or(FractalError::EmptyGraph)?;
        self.induced_subgraph(largest)
    }

    /// Returns the diameter (largest eccentricity) of a connected graph.
    ///
    /// Eccentricities are computed with one search per vertex in parallel.
    ///
    /// # Errors
    /// Returns [`FractalError::EmptyGraph`] for an empty graph and
    /// [`FractalError::Disconnected`] when some pair has no path.
    pub fn diameter(&self) -> Result<usize> {
        if self.is_empty() {
            return Err(FractalError::EmptyGraph);
        }
        if !self.is_connected() {
            return Err(FractalError::Disconnected {
                components: self.connected_components().len(),
            });
        }
        let diameter = (0..self.vertex_count())
            .into_par_iter()
            .map_init(
                || Bfs::new(self.vertex_count()),
                |bfs, source| {
                    let mut eccentricity = 0;
                    bfs.explore(self, &[source], None, |_, depth| {
                        eccentricity = eccentricity.max(depth);
                    });
                    eccentricity
                },
            )
            .max()
            .unwrap_or(0);
        Ok(diameter)
    }

    /// Writes the edge list as whitespace-separated `left right` lines.
    ///
    /// # Errors
    /// Returns any error raised by `writer`.
    pub fn write_edge_list(&self, mut writer: impl Write) -> io::Result<()> {
        for (left, right) in self.edges() {
            writeln!(writer, "{left} {right}")?;
        }
        Ok(())
    }

    pub(crate) fn check_vertex(&self, vertex: usize) -> Result<()> {
        if vertex < self.vertex_count() {
            Ok(())
        } else {
            Err(FractalError::InvalidVertex {
                vertex,
                vertex_count: self.vertex_count(),
            })
        }
    }
}
