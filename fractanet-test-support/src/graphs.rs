//! Deterministic graph fixtures expressed as plain edge lists.
//!
//! Fixtures stay independent of any graph type so every crate in the
//! workspace can build its own representation from them.

use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Vertex count plus undirected edges over `0..vertex_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphFixture {
    /// Number of vertices.
    pub vertex_count: usize,
    /// Undirected edges; endpoints are always below `vertex_count`.
    pub edges: Vec<(usize, usize)>,
}

impl GraphFixture {
    /// Places `other` beside `self`, shifting its ids past this fixture's.
    #[must_use]
    pub fn disjoint_union(mut self, other: &Self) -> Self {
        let offset = self.vertex_count;
        self.edges
            .extend(other.edges.iter().map(|&(u, v)| (u + offset, v + offset)));
        self.vertex_count += other.vertex_count;
        self
    }
}

/// Path `0 - 1 - ... - (n - 1)`.
///
/// # Examples
/// ```
/// use fractanet_test_support::graphs::path;
///
/// assert_eq!(path(3).edges, vec![(0, 1), (1, 2)]);
/// ```
#[must_use]
pub fn path(vertex_count: usize) -> GraphFixture {
    GraphFixture {
        vertex_count,
        edges: (1..vertex_count).map(|v| (v - 1, v)).collect(),
    }
}

/// Cycle on `n >= 3` vertices. Smaller counts fall back to a path.
#[must_use]
pub fn cycle(vertex_count: usize) -> GraphFixture {
    let mut fixture = path(vertex_count);
    if vertex_count >= 3 {
        fixture.edges.push((vertex_count - 1, 0));
    }
    fixture
}

/// Star with vertex 0 as hub and `leaves` spokes.
#[must_use]
pub fn star(leaves: usize) -> GraphFixture {
    GraphFixture {
        vertex_count: leaves + 1,
        edges: (1..=leaves).map(|leaf| (0, leaf)).collect(),
    }
}

/// Complete graph on `n` vertices.
#[must_use]
pub fn complete(vertex_count: usize) -> GraphFixture {
    let edges = (0..vertex_count)
        .flat_map(|u| (u + 1..vertex_count).map(move |v| (u, v)))
        .collect();
    GraphFixture {
        vertex_count,
        edges,
    }
}

/// Rectangular lattice with `width * height` vertices in row-major order.
#[must_use]
pub fn grid(width: usize, height: usize) -> GraphFixture {
    let mut edges = Vec::new();
    for row in 0..height {
        for column in 0..width {
            let vertex = row * width + column;
            if column + 1 < width {
                edges.push((vertex, vertex + 1));
            }
            if row + 1 < height {
                edges.push((vertex, vertex + width));
            }
        }
    }
    GraphFixture {
        vertex_count: width * height,
        edges,
    }
}

/// Complete `branching`-ary tree of the given depth in breadth-first order.
///
/// # Examples
/// ```
/// use fractanet_test_support::graphs::balanced_tree;
///
/// let tree = balanced_tree(2, 2);
/// assert_eq!(tree.vertex_count, 7);
/// assert_eq!(tree.edges.len(), 6);
/// ```
#[must_use]
pub fn balanced_tree(branching: usize, depth: usize) -> GraphFixture {
    let mut vertex_count = 1;
    let mut edges = Vec::new();
    let mut frontier = vec![0];
    for _ in 0..depth {
        let mut next = Vec::with_capacity(frontier.len() * branching);
        for parent in frontier {
            for _ in 0..branching {
                edges.push((parent, vertex_count));
                next.push(vertex_count);
                vertex_count += 1;
            }
        }
        frontier = next;
    }
    GraphFixture {
        vertex_count,
        edges,
    }
}

/// `generation`-th (u,v)-flower.
///
/// Generation 1 is a cycle of `u + v` vertices; each later generation
/// replaces every edge by two parallel paths of lengths `u` and `v`. With
/// `u = 1` the short path is the original edge, which produces the classic
/// non-fractal flower. `u, v >= 2` flowers are fractal.
///
/// # Examples
/// ```
/// use fractanet_test_support::graphs::uv_flower;
///
/// let flower = uv_flower(2, 2, 3);
/// assert_eq!(flower.edges.len(), 64);
/// assert_eq!(flower.vertex_count, 44);
/// ```
#[must_use]
pub fn uv_flower(u: usize, v: usize, generation: usize) -> GraphFixture {
    let mut fixture = cycle(u + v);
    for _ in 1..generation {
        let mut next_vertex = fixture.vertex_count;
        let mut edges = Vec::with_capacity(fixture.edges.len() * (u + v));
        for &(start, end) in &fixture.edges {
            for length in [u, v] {
                let mut previous = start;
                for _ in 1..length {
                    edges.push((previous, next_vertex));
                    previous = next_vertex;
                    next_vertex += 1;
                }
                edges.push((previous, end));
            }
        }
        fixture = GraphFixture {
            vertex_count: next_vertex,
            edges,
        };
    }
    fixture
}

/// `G(n, p)` random graph drawn from a generator seeded with `seed`.
#[must_use]
pub fn erdos_renyi(vertex_count: usize, probability: f64, seed: u64) -> GraphFixture {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for u in 0..vertex_count {
        for v in u + 1..vertex_count {
            if rng.gen_bool(probability.clamp(0.0, 1.0)) {
                edges.push((u, v));
            }
        }
    }
    GraphFixture {
        vertex_count,
        edges,
    }
}
