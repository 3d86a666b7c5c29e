//! All-pairs shortest-path distances.
//!
//! The matrix costs `N²` entries, so construction is gated by an explicit
//! vertex limit. Rows are independent breadth-first searches and are
//! computed in parallel.

use rayon::prelude::*;

use crate::error::{FractalError, Result};

use super::{Bfs, Graph};

/// Default vertex limit for [`DistanceMatrix::compute`] (64 MiB of `u32`
/// entries).
pub const DEFAULT_MATRIX_VERTEX_LIMIT: usize = 4_096;

const UNREACHABLE: u32 = u32::MAX;

/// Dense matrix of hop distances between every pair of vertices.
///
/// # Examples
/// ```
/// use fractanet_core::{DistanceMatrix, Graph};
///
/// let graph = Graph::from_edges(3, [(0, 1), (1, 2)])?;
/// let matrix = DistanceMatrix::compute(&graph, 16)?;
/// assert_eq!(matrix.get(0, 2), Some(2));
/// assert!(matrix.within(2, 1, 1));
/// # Ok::<(), fractanet_core::FractalError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    size: usize,
    entries: Vec<u32>,
}

impl DistanceMatrix {
    /// Computes the matrix for `graph`.
    ///
    /// # Errors
    /// Returns [`FractalError::GraphTooLarge`] when the graph has more than
    /// `max_vertices` vertices.
    pub fn compute(graph: &Graph, max_vertices: usize) -> Result<Self> {
        let size = graph.vertex_count();
        if size > max_vertices {
            return Err(FractalError::GraphTooLarge {
                vertices: size,
                limit: max_vertices,
            });
        }

        let rows: Vec<Vec<u32>> = (0..size)
            .into_par_iter()
            .map_init(
                || Bfs::new(size),
                |bfs, source| {
                    let mut row = vec![UNREACHABLE; size];
                    bfs.explore(graph, &[source], None, |vertex, depth| {
                        row[vertex] = u32::try_from(depth).unwrap_or(UNREACHABLE);
                    });
                    row
                },
            )
            .collect();

        Ok(Self {
            size,
            entries: rows.concat(),
        })
    }

    /// Returns the number of vertices covered by the matrix.
    #[must_use]
    #[rustfmt::skip]
    pub fn size(&self) -> usize { self.size }

    /// Returns the distance between `from` and `to`, or `None` when no path
    /// exists or either id is out of range.
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Option<usize> {
        if from >= self.size || to >= self.size {
            return None;
        }
        match self.entries[from * self.size + to] {
            UNREACHABLE => None,
            value => usize::try_from(value).ok(),
        }
    }

    /// Returns `true` when `to` lies within `radius` hops of `from`.
    #[must_use]
    pub fn within(&self, from: usize, to: usize, radius: usize) -> bool {
        self.get(from, to).is_some_and(|distance| distance <= radius)
    }

    /// Returns `true` when the pair is at least `diameter` hops apart or
    /// disconnected.
    #[must_use]
    pub fn at_least(&self, from: usize, to: usize, diameter: usize) -> bool {
        self.get(from, to).is_none_or(|distance| distance >= diameter)
    }

    /// Returns the largest finite distance in the matrix.
    #[must_use]
    pub fn max_finite(&self) -> usize {
        self.entries
            .iter()
            .filter(|&&value| value != UNREACHABLE)
            .max()
            .and_then(|&value| usize::try_from(value).ok())
            .unwrap_or(0)
    }

    /// Builds the boolean "within radius" matrix used by the matrix covering
    /// tier, one row per vertex. The diagonal is always set.
    pub(crate) fn within_radius_rows(&self, radius: usize) -> Vec<Vec<bool>> {
        (0..self.size)
            .into_par_iter()
            .map(|from| {
                (0..self.size)
                    .map(|to| from == to || self.within(from, to, radius))
                    .collect()
            })
            .collect()
    }
}
