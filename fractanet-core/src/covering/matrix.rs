//! MEMB over a thresholded all-pairs distance matrix.
//!
//! Thresholding the matrix at `rB` gives a symmetric boolean matrix `W` with
//! a set diagonal. Each round computes every excluded mass at once as
//! `W · u`, where `u` flags the uncovered vertices, then covers the row of
//! the arg-max. Centres drop to zero mass after their first round, so they
//! are never reselected.

use rayon::prelude::*;
use tracing::{debug, instrument};

use super::{BoxCovering, BoxDiameter, CentreSet, MassSelector, TieBreak};
use crate::{
    error::{FractalError, Result},
    graph::{DEFAULT_MATRIX_VERTEX_LIMIT, DistanceMatrix, Graph},
    scaling::ScalingCurve,
    telemetry,
};

/// Matrix MEMB engine for small, dense graphs.
///
/// # Examples
/// ```
/// use fractanet_core::{BoxCovering, BoxDiameter, Graph, MatrixMemb, TieBreak};
///
/// let path = Graph::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 4)])?;
/// let centres = MatrixMemb::new(TieBreak::Lowest).cover(&path, BoxDiameter::new(3)?)?;
/// assert_eq!(centres.as_slice(), &[1, 3]);
/// # Ok::<(), fractanet_core::FractalError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixMemb {
    tie_break: TieBreak,
    max_vertices: usize,
}

impl Default for MatrixMemb {
    fn default() -> Self {
        Self::new(TieBreak::Lowest)
    }
}

impl MatrixMemb {
    /// Creates the engine with the default vertex limit.
    #[must_use]
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            tie_break,
            max_vertices: DEFAULT_MATRIX_VERTEX_LIMIT,
        }
    }

    /// Overrides the largest graph the engine accepts.
    #[must_use]
    pub fn with_max_vertices(mut self, max_vertices: usize) -> Self {
        self.max_vertices = max_vertices;
        self
    }

    /// Returns the configured vertex limit.
    #[must_use]
    #[rustfmt::skip]
    pub fn max_vertices(&self) -> usize { self.max_vertices }

    /// Box counts for `lb_min, lb_min + 2, ...` up to the smallest odd number
    /// at or above the graph diameter, sharing one distance matrix between
    /// all of them.
    ///
    /// # Errors
    /// Returns [`FractalError::InvalidBoxDiameter`] for `lb_min == 0`,
    /// [`FractalError::EmptyGraph`] for a graph without vertices and
    /// [`FractalError::GraphTooLarge`] beyond the vertex limit.
    #[instrument(
        name = "covering.matrix_all",
        err,
        skip(self, graph),
        fields(vertices = graph.vertex_count()),
    )]
    pub fn box_counts(&self, graph: &Graph, lb_min: usize) -> Result<ScalingCurve> {
        let first = BoxDiameter::new(lb_min)?;
        if graph.is_empty() {
            return Err(FractalError::EmptyGraph);
        }
        let matrix = DistanceMatrix::compute(graph, self.max_vertices)?;
        let diameter = matrix.max_finite();
        let nearest_odd = diameter / 2 * 2 + 1;

        let mut points = Vec::new();
        for lb in (first.get()..nearest_odd + 2).step_by(2) {
            let rows = matrix.within_radius_rows(BoxDiameter::new(lb)?.radius());
            let centres = cover_rows(&rows, self.tie_break)?;
            points.push((lb, centres.box_count()));
        }
        debug!(diameter, points = points.len(), "matrix box counts complete");
        Ok(ScalingCurve::from_points(points))
    }
}

impl BoxCovering for MatrixMemb {
    fn name(&self) -> &'static str {
        "matrix"
    }

    #[instrument(
        name = "covering.memb",
        err,
        skip(self, graph),
        fields(tier = "matrix", vertices = graph.vertex_count(), diameter = diameter.get()),
    )]
    fn cover(&self, graph: &Graph, diameter: BoxDiameter) -> Result<CentreSet> {
        if diameter.is_trivial() {
            return Ok(CentreSet::identity(graph.vertex_count()));
        }
        let matrix = DistanceMatrix::compute(graph, self.max_vertices)?;
        let rows = matrix.within_radius_rows(diameter.radius());
        let centres = cover_rows(&rows, self.tie_break)?;
        debug!(boxes = centres.box_count(), "matrix covering complete");
        Ok(centres)
    }
}

fn cover_rows(rows: &[Vec<bool>], tie_break: TieBreak) -> Result<CentreSet> {
    let mut uncovered = vec![true; rows.len()];
    let mut remaining = rows.len();
    let mut centres = CentreSet::default();
    let mut breaker = tie_break.breaker();
    let mut rounds = 0_u64;

    while remaining > 0 {
        let masses: Vec<usize> = rows
            .par_iter()
            .map(|row| {
                row.iter()
                    .zip(&uncovered)
                    .filter(|&(&within, &open)| within && open)
                    .count()
            })
            .collect();
        rounds += 1;

        let mut selector = MassSelector::default();
        for (vertex, &mass) in masses.iter().enumerate() {
            selector.offer(vertex, mass);
        }
        let centre = selector
            .choose(&mut breaker)
            .ok_or(FractalError::InvariantViolation {
                invariant: "uncovered vertices imply a candidate with positive excluded mass",
                vertex: uncovered.iter().position(|&open| open).unwrap_or_default(),
            })?;

        centres.push(centre);
        for (open, &within) in uncovered.iter_mut().zip(&rows[centre]) {
            if within && *open {
                *open = false;
                remaining -= 1;
            }
        }
    }

    telemetry::increment(
        telemetry::MEMB_MASS_EVALUATIONS,
        rounds * rows.len() as u64,
    );
    Ok(centres)
}
