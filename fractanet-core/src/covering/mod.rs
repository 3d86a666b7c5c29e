//! Box covering by Maximum Excluded Mass Burning (MEMB) and random sequential
//! selection.
//!
//! Every engine implements [`BoxCovering`]: given a graph and a box diameter
//! `lB` it returns the ordered [`CentreSet`] whose radius-`rB` balls cover
//! every vertex, where `rB = floor((lB - 1) / 2)`. The MEMB tiers differ only
//! in cost:
//!
//! - [`NaiveMemb`] recomputes every excluded mass with fresh bounded searches
//!   on each round.
//! - [`CachedMemb`] precomputes each radius-`rB` neighbourhood once.
//! - [`AcceleratedMemb`] keeps stale masses in a max-heap and only refreshes
//!   candidates that could still beat the current best, relying on masses
//!   never increasing during a pass.
//! - [`MatrixMemb`] thresholds an all-pairs distance matrix and computes all
//!   masses per round as one matrix-vector product.
//!
//! Under [`TieBreak::Lowest`] all four tiers select identical centre
//! sequences. Diameters 1 and 2 have radius zero and yield the identity
//! covering without further work.

mod accelerated;
mod cached;
mod coverage;
mod matrix;
mod naive;
mod sequential;

use std::{fmt, num::NonZeroUsize};

use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};
use tracing::debug;

use crate::{
    error::{FractalError, Result},
    graph::Graph,
};

pub use self::{
    accelerated::AcceleratedMemb,
    cached::CachedMemb,
    coverage::Coverage,
    matrix::MatrixMemb,
    naive::NaiveMemb,
    sequential::RandomSequential,
};

/// Largest graph the [`CoveringAlgorithm::Auto`] policy routes to the matrix
/// tier.
pub const AUTO_MATRIX_MAX_VERTICES: usize = 512;

/// Minimum edge density for [`CoveringAlgorithm::Auto`] to prefer the matrix
/// tier.
pub const AUTO_MATRIX_MIN_DENSITY: f64 = 0.05;

/// Box diameter `lB`, the largest distance allowed inside one box.
///
/// # Examples
/// ```
/// use fractanet_core::BoxDiameter;
///
/// let diameter = BoxDiameter::new(5)?;
/// assert_eq!(diameter.radius(), 2);
/// assert_eq!(BoxDiameter::new(6)?.radius(), 2);
/// assert!(BoxDiameter::new(2)?.is_trivial());
/// assert!(BoxDiameter::new(0).is_err());
/// # Ok::<(), fractanet_core::FractalError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxDiameter(NonZeroUsize);

impl BoxDiameter {
    /// Validates a box diameter.
    ///
    /// # Errors
    /// Returns [`FractalError::InvalidBoxDiameter`] when `lb == 0`.
    pub fn new(lb: usize) -> Result<Self> {
        NonZeroUsize::new(lb)
            .map(Self)
            .ok_or(FractalError::InvalidBoxDiameter {
                got: lb,
                minimum: 1,
            })
    }

    /// Returns the diameter as an integer.
    #[must_use]
    #[rustfmt::skip]
    pub fn get(self) -> usize { self.0.get() }

    /// Returns the box radius `floor((lB - 1) / 2)`.
    #[must_use]
    pub fn radius(self) -> usize {
        (self.get() - 1) / 2
    }

    /// Returns `true` when the radius is zero, so every vertex is its own box.
    #[must_use]
    pub fn is_trivial(self) -> bool {
        self.radius() == 0
    }
}

impl TryFrom<usize> for BoxDiameter {
    type Error = FractalError;

    fn try_from(value: usize) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for BoxDiameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// How an engine chooses among candidates with equal excluded mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TieBreak {
    /// Choose the lowest vertex id. Fully deterministic.
    #[default]
    Lowest,
    /// Choose uniformly among the tied candidates with a generator seeded
    /// from `seed` at the start of every covering pass.
    Random {
        /// Seed for the pass-local generator.
        seed: u64,
    },
}

impl TieBreak {
    pub(crate) fn breaker(self) -> TieBreaker {
        match self {
            Self::Lowest => TieBreaker(None),
            Self::Random { seed } => TieBreaker(Some(SmallRng::seed_from_u64(seed))),
        }
    }
}

/// Pass-local state behind a [`TieBreak`] policy.
pub(crate) struct TieBreaker(Option<SmallRng>);

impl TieBreaker {
    fn pick(&mut self, ties: &[usize]) -> Option<usize> {
        match &mut self.0 {
            None => ties.first().copied(),
            Some(rng) => ties.choose(rng).copied(),
        }
    }
}

/// Tracks the maximum excluded mass seen in a round and the candidates that
/// reach it. Candidates must be offered in ascending id order.
#[derive(Debug, Default)]
pub(crate) struct MassSelector {
    best: usize,
    ties: Vec<usize>,
}

impl MassSelector {
    pub(crate) fn offer(&mut self, vertex: usize, mass: usize) {
        if mass == 0 {
            return;
        }
        if mass > self.best {
            self.best = mass;
            self.ties.clear();
            self.ties.push(vertex);
        } else if mass == self.best {
            self.ties.push(vertex);
        }
    }

    pub(crate) fn choose(&self, breaker: &mut TieBreaker) -> Option<usize> {
        breaker.pick(&self.ties)
    }
}

/// Ordered box centres produced by a covering pass; the box count `NB` is
/// the number of centres.
///
/// # Examples
/// ```
/// use fractanet_core::CentreSet;
///
/// let identity = CentreSet::identity(3);
/// assert_eq!(identity.as_slice(), &[0, 1, 2]);
/// assert_eq!(identity.box_count(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CentreSet {
    centres: Vec<usize>,
}

impl CentreSet {
    /// Every vertex of an `n`-vertex graph as its own centre.
    #[must_use]
    pub fn identity(vertex_count: usize) -> Self {
        Self {
            centres: (0..vertex_count).collect(),
        }
    }

    /// Wraps an explicit centre sequence, e.g. one loaded from disk.
    ///
    /// Renormalisation validates the ids against the graph it is applied to.
    #[must_use]
    pub fn from_vec(centres: Vec<usize>) -> Self {
        Self { centres }
    }

    /// Returns the centres in selection order.
    #[must_use]
    #[rustfmt::skip]
    pub fn as_slice(&self) -> &[usize] { &self.centres }

    /// Returns the number of boxes, `NB`.
    #[must_use]
    #[rustfmt::skip]
    pub fn box_count(&self) -> usize { self.centres.len() }

    /// Returns `true` when no centres were selected.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.centres.is_empty() }

    /// Returns `true` when `vertex` is a centre.
    #[must_use]
    pub fn contains(&self, vertex: usize) -> bool {
        self.centres.contains(&vertex)
    }

    /// Iterates over the centres in selection order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.centres.iter().copied()
    }

    /// Consumes the set, returning the centres in selection order.
    #[must_use]
    #[rustfmt::skip]
    pub fn into_vec(self) -> Vec<usize> { self.centres }

    pub(crate) fn push(&mut self, centre: usize) {
        self.centres.push(centre);
    }
}

/// A strategy that covers a graph with boxes of a given diameter.
pub trait BoxCovering {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Selects box centres for `graph` at `diameter`.
    ///
    /// # Errors
    /// Implementations return [`FractalError`] when a precondition fails,
    /// such as the matrix tier exceeding its vertex limit.
    fn cover(&self, graph: &Graph, diameter: BoxDiameter) -> Result<CentreSet>;
}

/// Selects one of the built-in covering engines.
///
/// # Examples
/// ```
/// use fractanet_core::{BoxCovering, BoxDiameter, CoveringAlgorithm, Graph, TieBreak};
///
/// let cycle = Graph::from_edges(6, (0..6).map(|v| (v, (v + 1) % 6)))?;
/// let diameter = BoxDiameter::new(3)?;
/// for algorithm in [
///     CoveringAlgorithm::Naive(TieBreak::Lowest),
///     CoveringAlgorithm::Cached(TieBreak::Lowest),
///     CoveringAlgorithm::Accelerated,
///     CoveringAlgorithm::Matrix(TieBreak::Lowest),
/// ] {
///     assert_eq!(algorithm.cover(&cycle, diameter)?.as_slice(), &[0, 3]);
/// }
/// # Ok::<(), fractanet_core::FractalError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoveringAlgorithm {
    /// [`NaiveMemb`] with the given tie-break.
    Naive(TieBreak),
    /// [`CachedMemb`] with the given tie-break.
    Cached(TieBreak),
    /// [`AcceleratedMemb`].
    Accelerated,
    /// [`MatrixMemb`] with the given tie-break and the default vertex limit.
    Matrix(TieBreak),
    /// [`RandomSequential`] seeded with `seed`.
    RandomSequential {
        /// Seed for the selection order.
        seed: u64,
    },
    /// Matrix tier for small dense graphs, accelerated tier otherwise.
    #[default]
    Auto,
}

impl CoveringAlgorithm {
    /// Resolves [`Self::Auto`] for `graph`; other variants are returned as-is.
    #[must_use]
    pub fn resolve(self, graph: &Graph) -> Self {
        match self {
            Self::Auto
                if graph.vertex_count() <= AUTO_MATRIX_MAX_VERTICES
                    && graph.density() >= AUTO_MATRIX_MIN_DENSITY =>
            {
                Self::Matrix(TieBreak::Lowest)
            }
            Self::Auto => Self::Accelerated,
            other => other,
        }
    }
}

impl BoxCovering for CoveringAlgorithm {
    fn name(&self) -> &'static str {
        match self {
            Self::Naive(_) => "naive",
            Self::Cached(_) => "cached",
            Self::Accelerated => "accelerated",
            Self::Matrix(_) => "matrix",
            Self::RandomSequential { .. } => "random_sequential",
            Self::Auto => "auto",
        }
    }

    fn cover(&self, graph: &Graph, diameter: BoxDiameter) -> Result<CentreSet> {
        let resolved = self.resolve(graph);
        if matches!(self, Self::Auto) {
            debug!(selected = resolved.name(), "auto covering resolved");
        }
        match resolved {
            Self::Naive(tie_break) => NaiveMemb::new(tie_break).cover(graph, diameter),
            Self::Cached(tie_break) => CachedMemb::new(tie_break).cover(graph, diameter),
            Self::Accelerated | Self::Auto => AcceleratedMemb.cover(graph, diameter),
            Self::Matrix(tie_break) => MatrixMemb::new(tie_break).cover(graph, diameter),
            Self::RandomSequential { seed } => RandomSequential::new(seed).cover(graph, diameter),
        }
    }
}

/// Error for a pass that still has uncovered vertices but no candidate with
/// positive excluded mass.
fn stalled(coverage: &Coverage) -> FractalError {
    FractalError::InvariantViolation {
        invariant: "uncovered vertices imply a candidate with positive excluded mass",
        vertex: coverage.first_uncovered().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests;

#[cfg(test)]
mod property;
