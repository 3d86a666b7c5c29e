//! Renormalisation of a graph under a box covering.
//!
//! Given box centres, every vertex joins a box: centres open boxes in
//! selection order, and the remaining vertices are processed by increasing
//! distance to the nearest centre, each joining the box of a random
//! neighbour that lies strictly closer to a centre. Collapsing every box to
//! a supernode yields the renormalised graph.

mod flow;

use std::io::{self, Write};

use rand::{Rng, seq::SliceRandom};

use crate::{
    covering::CentreSet,
    error::{FractalError, Result},
    graph::{Bfs, Graph},
};

pub use self::flow::{MIN_FLOW_DIAMETER, RenormalisationFlow, RenormalisationStep, Renormaliser};

/// Box id of every vertex.
///
/// Box ids follow the order of the centres that opened them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxAssignment {
    boxes: Vec<usize>,
    box_count: usize,
}

impl BoxAssignment {
    /// Box id of `vertex`, or `None` for an unknown id.
    #[must_use]
    pub fn box_of(&self, vertex: usize) -> Option<usize> {
        self.boxes.get(vertex).copied()
    }

    /// Box ids indexed by vertex.
    #[must_use]
    #[rustfmt::skip]
    pub fn as_slice(&self) -> &[usize] { &self.boxes }

    /// Number of boxes.
    #[must_use]
    #[rustfmt::skip]
    pub fn box_count(&self) -> usize { self.box_count }

    /// Members of every box, each in ascending vertex order.
    #[must_use]
    pub fn boxes(&self) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); self.box_count];
        for (vertex, &id) in self.boxes.iter().enumerate() {
            members[id].push(vertex);
        }
        members
    }

    /// Writes a `vertex,box` table with a header row.
    ///
    /// # Errors
    /// Returns any error raised by `writer`.
    pub fn write_table(&self, mut writer: impl Write) -> io::Result<()> {
        writeln!(writer, "vertex,box")?;
        for (vertex, id) in self.boxes.iter().enumerate() {
            writeln!(writer, "{vertex},{id}")?;
        }
        Ok(())
    }
}

/// Result of renormalising one graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renormalisation {
    graph: Graph,
    assignment: BoxAssignment,
}

impl Renormalisation {
    /// The quotient graph with one vertex per box.
    #[must_use]
    #[rustfmt::skip]
    pub fn graph(&self) -> &Graph { &self.graph }

    /// The vertex-to-box assignment that produced the quotient.
    #[must_use]
    #[rustfmt::skip]
    pub fn assignment(&self) -> &BoxAssignment { &self.assignment }

    /// Splits the result into its graph and assignment.
    #[must_use]
    pub fn into_parts(self) -> (Graph, BoxAssignment) {
        (self.graph, self.assignment)
    }
}

/// Hop distance from every vertex to its nearest centre.
///
/// # Errors
/// Returns [`FractalError::InvalidVertex`] for an unknown centre and
/// [`FractalError::NoPathToCentre`] for a vertex no centre can reach.
///
/// # Examples
/// ```
/// use fractanet_core::{CentreSet, Graph, central_distances};
///
/// let path = Graph::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 4)])?;
/// let centres = CentreSet::from_vec(vec![1, 3]);
/// assert_eq!(central_distances(&path, &centres)?, vec![1, 0, 1, 0, 1]);
/// # Ok::<(), fractanet_core::FractalError>(())
/// ```
pub fn central_distances(graph: &Graph, centres: &CentreSet) -> Result<Vec<usize>> {
    for centre in centres.iter() {
        graph.check_vertex(centre)?;
    }
    let mut distances: Vec<Option<usize>> = vec![None; graph.vertex_count()];
    Bfs::new(graph.vertex_count()).explore(graph, centres.as_slice(), None, |vertex, depth| {
        distances[vertex] = Some(depth);
    });
    distances
        .into_iter()
        .enumerate()
        .map(|(vertex, distance)| distance.ok_or(FractalError::NoPathToCentre { vertex }))
        .collect()
}

/// Assigns every vertex to a box.
///
/// Centres receive box ids in order. Every other vertex, taken in
/// non-decreasing central distance (ties by id), picks uniformly among the
/// distinct boxes of its neighbours with strictly smaller central distance.
///
/// # Errors
/// Returns [`FractalError::InvalidVertex`] for an unknown centre and
/// [`FractalError::InvariantViolation`] when `central` does not describe
/// `graph`, a centre repeats, or a vertex has no closer neighbour.
pub fn assign_boxes<R>(
    graph: &Graph,
    centres: &CentreSet,
    central: &[usize],
    rng: &mut R,
) -> Result<BoxAssignment>
where
    R: Rng + ?Sized,
{
    let vertex_count = graph.vertex_count();
    if central.len() != vertex_count {
        return Err(FractalError::InvariantViolation {
            invariant: "central distances cover every vertex",
            vertex: central.len().min(vertex_count),
        });
    }

    let mut boxes: Vec<Option<usize>> = vec![None; vertex_count];
    for (id, centre) in centres.iter().enumerate() {
        graph.check_vertex(centre)?;
        if boxes[centre].replace(id).is_some() {
            return Err(FractalError::InvariantViolation {
                invariant: "centres are distinct",
                vertex: centre,
            });
        }
    }

    let mut pending: Vec<usize> = (0..vertex_count).filter(|&v| boxes[v].is_none()).collect();
    pending.sort_by_key(|&vertex| central[vertex]);

    let mut candidates = Vec::new();
    for vertex in pending {
        candidates.clear();
        candidates.extend(
            graph
                .neighbours(vertex)
                .iter()
                .filter(|&&neighbour| central[neighbour] < central[vertex])
                .filter_map(|&neighbour| boxes[neighbour]),
        );
        candidates.sort_unstable();
        candidates.dedup();
        let chosen = candidates
            .choose(rng)
            .copied()
            .ok_or(FractalError::InvariantViolation {
                invariant: "every non-centre has a neighbour closer to a centre",
                vertex,
            })?;
        boxes[vertex] = Some(chosen);
    }

    Ok(BoxAssignment {
        boxes: boxes.into_iter().flatten().collect(),
        box_count: centres.box_count(),
    })
}

/// Collapses every box of the covering described by `centres` into a
/// supernode.
///
/// Two supernodes are adjacent when an edge of `graph` joins their boxes;
/// edges inside a box vanish.
///
/// # Errors
/// Propagates the failures of [`central_distances`] and [`assign_boxes`].
///
/// # Examples
/// ```
/// use fractanet_core::{CentreSet, Graph, renormalise};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let cycle = Graph::from_edges(6, (0..6).map(|v| (v, (v + 1) % 6)))?;
/// let centres = CentreSet::from_vec(vec![0, 3]);
/// let result = renormalise(&cycle, &centres, &mut SmallRng::seed_from_u64(1))?;
/// assert_eq!(result.graph().vertex_count(), 2);
/// assert_eq!(result.graph().edge_count(), 1);
/// # Ok::<(), fractanet_core::FractalError>(())
/// ```
pub fn renormalise<R>(graph: &Graph, centres: &CentreSet, rng: &mut R) -> Result<Renormalisation>
where
    R: Rng + ?Sized,
{
    let central = central_distances(graph, centres)?;
    let assignment = assign_boxes(graph, centres, &central, rng)?;
    let edges = graph
        .edges()
        .map(|(left, right)| (assignment.boxes[left], assignment.boxes[right]))
        .filter(|(left, right)| left != right);
    let quotient = Graph::from_edges(assignment.box_count, edges)?;
    Ok(Renormalisation {
        graph: quotient,
        assignment,
    })
}

#[cfg(test)]
mod tests;
