//! Box covering by greedy colouring of the dual graph.
//!
//! Two vertices are joined in the dual graph when they lie at least `lB`
//! hops apart, or in different components. A proper colouring of the dual
//! graph is then a covering of the original by boxes of diameter below
//! `lB`: every colour class is a box. [`cover_by_colouring`] colours the
//! dual graph without materialising it, so it needs `O(N)` memory beyond the
//! graph itself.

mod order;

use tracing::{debug, instrument};

use crate::{
    covering::BoxDiameter,
    error::Result,
    graph::{Bfs, Graph},
};

pub use self::order::{VertexOrder, smallest_last};

/// Colour per vertex produced by a greedy pass.
///
/// # Examples
/// ```
/// use fractanet_core::{BoxDiameter, Graph, VertexOrder, cover_by_colouring};
///
/// let path = Graph::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 4)])?;
/// let colouring = cover_by_colouring(&path, BoxDiameter::new(3)?, &VertexOrder::Index)?;
/// assert_eq!(colouring.colours(), &[0, 0, 0, 1, 1]);
/// assert_eq!(colouring.box_count(), 2);
/// assert_eq!(colouring.boxes(), vec![vec![0, 1, 2], vec![3, 4]]);
/// # Ok::<(), fractanet_core::FractalError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Colouring {
    colours: Vec<usize>,
    box_count: usize,
}

impl Colouring {
    fn from_colours(colours: Vec<usize>) -> Self {
        let box_count = colours.iter().max().map_or(0, |&max| max + 1);
        Self { colours, box_count }
    }

    /// Colour of every vertex, indexed by vertex id.
    #[must_use]
    #[rustfmt::skip]
    pub fn colours(&self) -> &[usize] { &self.colours }

    /// Colour of `vertex`, or `None` for an unknown id.
    #[must_use]
    pub fn colour_of(&self, vertex: usize) -> Option<usize> {
        self.colours.get(vertex).copied()
    }

    /// Number of boxes: the largest colour plus one, or zero for an empty
    /// graph.
    #[must_use]
    #[rustfmt::skip]
    pub fn box_count(&self) -> usize { self.box_count }

    /// Vertices grouped by colour, each group in ascending id order.
    #[must_use]
    pub fn boxes(&self) -> Vec<Vec<usize>> {
        let mut boxes = vec![Vec::new(); self.box_count];
        for (vertex, &colour) in self.colours.iter().enumerate() {
            boxes[colour].push(vertex);
        }
        boxes
    }
}

/// Builds the dual graph of `graph` for box diameter `diameter`.
///
/// The dual graph can hold up to `N²/2` edges; prefer
/// [`cover_by_colouring`] unless the dual graph itself is needed.
///
/// # Examples
/// ```
/// use fractanet_core::{BoxDiameter, Graph, dual_graph};
///
/// let path = Graph::from_edges(3, [(0, 1), (1, 2)])?;
/// let dual = dual_graph(&path, BoxDiameter::new(2)?)?;
/// assert_eq!(dual.edges().collect::<Vec<_>>(), vec![(0, 2)]);
/// # Ok::<(), fractanet_core::FractalError>(())
/// ```
///
/// # Errors
/// Propagates [`Graph::from_edges`] failures, which cannot occur for ids
/// drawn from `graph`.
pub fn dual_graph(graph: &Graph, diameter: BoxDiameter) -> Result<Graph> {
    let vertex_count = graph.vertex_count();
    let near = diameter.get() - 1;
    let mut bfs = Bfs::new(vertex_count);
    let mut within = vec![false; vertex_count];
    let mut edges = Vec::new();
    for source in 0..vertex_count {
        let mut reached = Vec::new();
        bfs.explore(graph, &[source], Some(near), |vertex, _| reached.push(vertex));
        for &vertex in &reached {
            within[vertex] = true;
        }
        edges.extend(
            (source + 1..vertex_count)
                .filter(|&target| !within[target])
                .map(|target| (source, target)),
        );
        for vertex in reached {
            within[vertex] = false;
        }
    }
    Graph::from_edges(vertex_count, edges)
}

/// Greedily colours `graph` in the given order, giving each vertex the
/// smallest colour absent from its already coloured neighbours.
///
/// # Errors
/// Returns [`crate::FractalError::InvalidVertexOrder`] when a custom order
/// is not a permutation of the vertices.
pub fn greedy_colouring(graph: &Graph, order: &VertexOrder) -> Result<Colouring> {
    let sequence = order.sequence(graph)?;
    let mut colours: Vec<Option<usize>> = vec![None; graph.vertex_count()];
    let mut forbidden = Vec::new();
    for vertex in sequence {
        forbidden.clear();
        forbidden.extend(graph.neighbours(vertex).iter().filter_map(|&n| colours[n]));
        forbidden.sort_unstable();
        forbidden.dedup();
        let colour = forbidden
            .iter()
            .enumerate()
            .find(|&(candidate, &taken)| candidate != taken)
            .map_or(forbidden.len(), |(candidate, _)| candidate);
        colours[vertex] = Some(colour);
    }
    Ok(Colouring::from_colours(colours.into_iter().flatten().collect()))
}

/// Covers `graph` with boxes of diameter below `diameter` by greedily
/// colouring its implicit dual graph.
///
/// A colour is available to a vertex when every vertex already holding it
/// lies within `lB - 1` hops, which is exactly the greedy rule applied to
/// [`dual_graph`].
///
/// # Errors
/// Returns [`crate::FractalError::InvalidVertexOrder`] when a custom order
/// is not a permutation of the vertices.
#[instrument(
    name = "colouring.cover",
    err,
    skip(graph, order),
    fields(vertices = graph.vertex_count(), diameter = diameter.get()),
)]
pub fn cover_by_colouring(
    graph: &Graph,
    diameter: BoxDiameter,
    order: &VertexOrder,
) -> Result<Colouring> {
    let sequence = order.sequence(graph)?;
    let vertex_count = graph.vertex_count();
    let near = diameter.get() - 1;

    let mut colours: Vec<Option<usize>> = vec![None; vertex_count];
    let mut class_sizes: Vec<usize> = Vec::new();
    let mut nearby: Vec<usize> = Vec::new();
    let mut touched: Vec<usize> = Vec::new();
    let mut bfs = Bfs::new(vertex_count);

    for vertex in sequence {
        bfs.explore(graph, &[vertex], Some(near), |other, _| {
            if let Some(colour) = colours[other] {
                nearby[colour] += 1;
                touched.push(colour);
            }
        });
        let colour = (0..class_sizes.len())
            .find(|&colour| nearby[colour] == class_sizes[colour])
            .unwrap_or(class_sizes.len());
        for used in touched.drain(..) {
            nearby[used] = 0;
        }
        if colour == class_sizes.len() {
            class_sizes.push(0);
            nearby.push(0);
        }
        class_sizes[colour] += 1;
        colours[vertex] = Some(colour);
    }

    let colouring = Colouring::from_colours(colours.into_iter().flatten().collect());
    debug!(boxes = colouring.box_count(), "colouring covering complete");
    Ok(colouring)
}
