//! Covered/uncovered bookkeeping for a single covering pass.

/// Covered flags for every vertex plus a running count of uncovered ones.
///
/// Masses only ever fall during a pass because vertices move from uncovered
/// to covered and never back.
///
/// # Examples
/// ```
/// use fractanet_core::Coverage;
///
/// let mut coverage = Coverage::new(3);
/// assert!(coverage.cover(1));
/// assert!(!coverage.cover(1));
/// assert_eq!(coverage.uncovered_count(), 2);
/// assert_eq!(coverage.first_uncovered(), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coverage {
    covered: Vec<bool>,
    uncovered: usize,
}

impl Coverage {
    /// Starts a pass with every one of `vertex_count` vertices uncovered.
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            covered: vec![false; vertex_count],
            uncovered: vertex_count,
        }
    }

    /// Marks `vertex` covered, returning `true` if it was previously uncovered.
    ///
    /// Out-of-range ids are ignored.
    pub fn cover(&mut self, vertex: usize) -> bool {
        match self.covered.get_mut(vertex) {
            Some(flag) if !*flag => {
                *flag = true;
                self.uncovered -= 1;
                true
            }
            _ => false,
        }
    }

    /// Returns `true` when `vertex` is covered. Out-of-range ids count as
    /// covered so they never contribute mass.
    #[must_use]
    pub fn is_covered(&self, vertex: usize) -> bool {
        self.covered.get(vertex).copied().unwrap_or(true)
    }

    /// Number of vertices still uncovered.
    #[must_use]
    #[rustfmt::skip]
    pub fn uncovered_count(&self) -> usize { self.uncovered }

    /// Returns `true` once every vertex is covered.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_complete(&self) -> bool { self.uncovered == 0 }

    /// Lowest uncovered vertex, if any.
    #[must_use]
    pub fn first_uncovered(&self) -> Option<usize> {
        self.covered.iter().position(|covered| !covered)
    }

    /// Counts the uncovered vertices among `vertices`.
    #[must_use]
    pub fn excluded_mass(&self, vertices: &[usize]) -> usize {
        vertices
            .iter()
            .filter(|&&vertex| !self.is_covered(vertex))
            .count()
    }

    /// Covered flags indexed by vertex id.
    #[must_use]
    #[rustfmt::skip]
    pub fn flags(&self) -> &[bool] { &self.covered }
}
