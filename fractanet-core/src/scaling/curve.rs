//! Box-count scaling curves `NB(lB)`.

use std::io::{self, BufRead, Write};

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::{
    colouring::{VertexOrder, cover_by_colouring},
    covering::{AcceleratedMemb, BoxCovering, BoxDiameter},
    error::{FractalError, Result},
    graph::Graph,
};

const TABLE_HEADER: &str = "lb,nb";

/// Ordered `(lB, NB)` points.
///
/// # Examples
/// ```
/// use fractanet_core::ScalingCurve;
///
/// let curve = ScalingCurve::from_points(vec![(2, 8), (3, 4), (4, 2)]);
/// assert_eq!(curve.lb_values(), vec![2.0, 3.0, 4.0]);
/// assert_eq!(curve.normalised(8), vec![(2, 1.0), (3, 0.5), (4, 0.25)]);
///
/// let mut table = Vec::new();
/// curve.write_table(&mut table)?;
/// assert_eq!(ScalingCurve::read_table(table.as_slice())?, curve);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalingCurve {
    points: Vec<(usize, usize)>,
}

impl ScalingCurve {
    /// Wraps precomputed points.
    #[must_use]
    pub fn from_points(points: Vec<(usize, usize)>) -> Self {
        Self { points }
    }

    /// Returns the `(lB, NB)` points in order.
    #[must_use]
    #[rustfmt::skip]
    pub fn points(&self) -> &[(usize, usize)] { &self.points }

    /// Number of points.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.points.len() }

    /// Returns `true` when the curve has no points.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    /// Box diameters as floats.
    #[must_use]
    pub fn lb_values(&self) -> Vec<f64> {
        self.points.iter().map(|&(lb, _)| lb as f64).collect()
    }

    /// Box counts as floats.
    #[must_use]
    pub fn nb_values(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, nb)| nb as f64).collect()
    }

    /// Box counts divided by `vertex_count`. A zero vertex count leaves the
    /// counts unscaled.
    #[must_use]
    pub fn normalised(&self, vertex_count: usize) -> Vec<(usize, f64)> {
        let scale = vertex_count.max(1) as f64;
        self.points
            .iter()
            .map(|&(lb, nb)| (lb, nb as f64 / scale))
            .collect()
    }

    /// Writes the curve as `lb,nb` rows beneath a header.
    ///
    /// # Errors
    /// Returns any error raised by `writer`.
    pub fn write_table(&self, mut writer: impl Write) -> io::Result<()> {
        writeln!(writer, "{TABLE_HEADER}")?;
        for (lb, nb) in &self.points {
            writeln!(writer, "{lb},{nb}")?;
        }
        Ok(())
    }

    /// Reads a table written by [`Self::write_table`]. The header is
    /// optional and blank lines are skipped.
    ///
    /// # Errors
    /// Returns [`io::ErrorKind::InvalidData`] for a malformed row and any
    /// error raised by `reader`.
    pub fn read_table(reader: impl BufRead) -> io::Result<Self> {
        let mut points = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let row = line.trim();
            if row.is_empty() || (index == 0 && row == TABLE_HEADER) {
                continue;
            }
            points.push(parse_row(row).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line {}: expected `lb,nb`, found `{row}`", index + 1),
                )
            })?);
        }
        Ok(Self { points })
    }
}

fn parse_row(row: &str) -> Option<(usize, usize)> {
    let (lb, nb) = row.split_once(',')?;
    Some((lb.trim().parse().ok()?, nb.trim().parse().ok()?))
}

/// Settings for [`scaling_curve`].
///
/// # Examples
/// ```
/// use fractanet_core::{CurveConfig, VertexOrder};
///
/// let config = CurveConfig::new()
///     .with_lb_min(3)?
///     .with_lb_max(9)?
///     .with_order(VertexOrder::SmallestLast);
/// assert_eq!(config.lb_min(), 3);
/// assert_eq!(config.lb_max(), Some(9));
/// assert!(CurveConfig::new().with_lb_min(0).is_err());
/// # Ok::<(), fractanet_core::FractalError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveConfig {
    lb_min: usize,
    lb_max: Option<usize>,
    order: VertexOrder,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            lb_min: 2,
            lb_max: None,
            order: VertexOrder::Index,
        }
    }
}

impl CurveConfig {
    /// Starts from `lb_min = 2`, `lb_max = diameter + 1` and index order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the smallest box diameter.
    ///
    /// # Errors
    /// Returns [`FractalError::InvalidBoxDiameter`] for zero or for a value
    /// above an explicit `lb_max`.
    pub fn with_lb_min(mut self, lb_min: usize) -> Result<Self> {
        BoxDiameter::new(lb_min)?;
        if let Some(lb_max) = self.lb_max.filter(|&max| max < lb_min) {
            return Err(FractalError::InvalidBoxDiameter {
                got: lb_max,
                minimum: lb_min,
            });
        }
        self.lb_min = lb_min;
        Ok(self)
    }

    /// Sets the largest box diameter instead of `diameter + 1`.
    ///
    /// # Errors
    /// Returns [`FractalError::InvalidBoxDiameter`] when `lb_max` is below
    /// `lb_min`.
    pub fn with_lb_max(mut self, lb_max: usize) -> Result<Self> {
        if lb_max < self.lb_min {
            return Err(FractalError::InvalidBoxDiameter {
                got: lb_max,
                minimum: self.lb_min,
            });
        }
        self.lb_max = Some(lb_max);
        Ok(self)
    }

    /// Sets the vertex order used by the colouring covering for even `lB`.
    #[must_use]
    pub fn with_order(mut self, order: VertexOrder) -> Self {
        self.order = order;
        self
    }

    /// Smallest box diameter.
    #[must_use]
    #[rustfmt::skip]
    pub fn lb_min(&self) -> usize { self.lb_min }

    /// Explicit largest box diameter, if any.
    #[must_use]
    #[rustfmt::skip]
    pub fn lb_max(&self) -> Option<usize> { self.lb_max }

    /// Vertex order for the colouring covering.
    #[must_use]
    #[rustfmt::skip]
    pub fn order(&self) -> &VertexOrder { &self.order }
}

/// Measures `NB` for every `lB` in `[lb_min, lb_max]`.
///
/// Odd diameters use [`AcceleratedMemb`]; even diameters use
/// [`cover_by_colouring`] and are clipped to the previous point, since the
/// true optimum never grows with `lB`. Raw counts are computed in parallel
/// and clipped in order afterwards.
///
/// # Errors
/// Returns [`FractalError::EmptyGraph`] or [`FractalError::Disconnected`]
/// for unsuitable input and [`FractalError::InvalidVertexOrder`] for a bad
/// custom order.
///
/// # Examples
/// ```
/// use fractanet_core::{CurveConfig, Graph, scaling_curve};
///
/// let path = Graph::from_edges(5, [(0, 1), (1, 2), (2, 3), (3, 4)])?;
/// let curve = scaling_curve(&path, &CurveConfig::default())?;
/// assert_eq!(curve.points(), &[(2, 3), (3, 2), (4, 2), (5, 1)]);
/// # Ok::<(), fractanet_core::FractalError>(())
/// ```
#[instrument(
    name = "scaling.curve",
    err,
    skip(graph, config),
    fields(vertices = graph.vertex_count(), lb_min = config.lb_min()),
)]
pub fn scaling_curve(graph: &Graph, config: &CurveConfig) -> Result<ScalingCurve> {
    let diameter = graph.diameter()?;
    let lb_max = config.lb_max().unwrap_or(diameter + 1);
    let order = VertexOrder::Custom(config.order().sequence(graph)?);

    let raw: Vec<(usize, usize)> = (config.lb_min()..=lb_max)
        .into_par_iter()
        .map(|lb| {
            let box_diameter = BoxDiameter::new(lb)?;
            let count = if lb % 2 == 0 {
                cover_by_colouring(graph, box_diameter, &order)?.box_count()
            } else {
                AcceleratedMemb.cover(graph, box_diameter)?.box_count()
            };
            Ok((lb, count))
        })
        .collect::<Result<_>>()?;

    let mut points: Vec<(usize, usize)> = Vec::with_capacity(raw.len());
    for (lb, count) in raw {
        let clipped = match points.last() {
            Some(&(_, previous)) if lb % 2 == 0 && count > previous => {
                debug!(lb, count, previous, "clipped even box count");
                previous
            }
            _ => count,
        };
        points.push((lb, clipped));
    }

    info!(diameter, points = points.len(), "scaling curve complete");
    Ok(ScalingCurve::from_points(points))
}
