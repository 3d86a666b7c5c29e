//! Reusable breadth-first search scratch space.
//!
//! Box covering issues thousands of bounded searches over the same graph, so
//! the visited markers and queue are kept between calls and only the entries
//! touched by the previous search are reset.

use std::collections::VecDeque;

use super::Graph;

const UNVISITED: usize = usize::MAX;

#[derive(Debug, Clone)]
pub(crate) struct Bfs {
    depth: Vec<usize>,
    queue: VecDeque<usize>,
    touched: Vec<usize>,
}

impl Bfs {
    pub(crate) fn new(vertex_count: usize) -> Self {
        Self {
            depth: vec![UNVISITED; vertex_count],
            queue: VecDeque::new(),
            touched: Vec::new(),
        }
    }

    /// Visits every vertex within `radius` hops of any source, calling
    /// `visit(vertex, depth)` once per vertex in non-decreasing depth order.
    ///
    /// `radius == None` explores the whole reachable component. Sources must
    /// be valid vertex ids; callers validate them beforehand.
    pub(crate) fn explore<F>(
        &mut self,
        graph: &Graph,
        sources: &[usize],
        radius: Option<usize>,
        mut visit: F,
    ) where
        F: FnMut(usize, usize),
    {
        self.reset();
        for &source in sources {
            if self.depth[source] == UNVISITED {
                self.mark(source, 0);
                self.queue.push_back(source);
            }
        }

        while let Some(vertex) = self.queue.pop_front() {
            let depth = self.depth[vertex];
            visit(vertex, depth);
            if radius.is_some_and(|limit| depth >= limit) {
                continue;
            }
            for &next in graph.neighbours(vertex) {
                if self.depth[next] == UNVISITED {
                    self.mark(next, depth + 1);
                    self.queue.push_back(next);
                }
            }
        }
    }

    fn mark(&mut self, vertex: usize, depth: usize) {
        self.depth[vertex] = depth;
        self.touched.push(vertex);
    }

    fn reset(&mut self) {
        for vertex in self.touched.drain(..) {
            self.depth[vertex] = UNVISITED;
        }
        self.queue.clear();
    }
}
