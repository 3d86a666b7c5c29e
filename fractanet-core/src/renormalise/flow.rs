//! Iterated covering and renormalisation down to a single vertex.

use rand::{SeedableRng, rngs::SmallRng};
use tracing::{debug, info, instrument};

use super::{BoxAssignment, renormalise};
use crate::{
    covering::{BoxCovering, BoxDiameter, CentreSet, CoveringAlgorithm},
    error::{FractalError, Result},
    graph::Graph,
    telemetry,
};

/// Smallest box diameter that guarantees each step shrinks a connected graph.
pub const MIN_FLOW_DIAMETER: usize = 3;

/// Repeatedly covers and renormalises a connected graph until one vertex is
/// left.
///
/// # Examples
/// ```
/// use fractanet_core::{CoveringAlgorithm, Graph, Renormaliser};
///
/// let path = Graph::from_edges(9, (0..8).map(|v| (v, v + 1)))?;
/// let flow = Renormaliser::new(3)?
///     .with_algorithm(CoveringAlgorithm::Accelerated)
///     .with_rng_seed(7)
///     .run(&path)?;
/// assert_eq!(flow.vertex_counts(), vec![9, 3, 1]);
/// # Ok::<(), fractanet_core::FractalError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renormaliser {
    diameter: BoxDiameter,
    algorithm: CoveringAlgorithm,
    seed: u64,
}

impl Renormaliser {
    /// Creates a renormaliser for box diameter `lb`, using
    /// [`CoveringAlgorithm::Auto`] and seed zero.
    ///
    /// # Errors
    /// Returns [`FractalError::InvalidBoxDiameter`] when `lb` is below
    /// [`MIN_FLOW_DIAMETER`].
    pub fn new(lb: usize) -> Result<Self> {
        if lb < MIN_FLOW_DIAMETER {
            return Err(FractalError::InvalidBoxDiameter {
                got: lb,
                minimum: MIN_FLOW_DIAMETER,
            });
        }
        Ok(Self {
            diameter: BoxDiameter::new(lb)?,
            algorithm: CoveringAlgorithm::default(),
            seed: 0,
        })
    }

    /// Selects the covering engine used at every step.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: CoveringAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Seeds the generator used for box assignment.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Box diameter used at every step.
    #[must_use]
    #[rustfmt::skip]
    pub fn diameter(&self) -> BoxDiameter { self.diameter }

    /// Covering engine used at every step.
    #[must_use]
    #[rustfmt::skip]
    pub fn algorithm(&self) -> CoveringAlgorithm { self.algorithm }

    /// Seed for box assignment.
    #[must_use]
    #[rustfmt::skip]
    pub fn rng_seed(&self) -> u64 { self.seed }

    /// Runs the flow on `graph`.
    ///
    /// A single-vertex graph returns immediately with no steps.
    ///
    /// # Errors
    /// Returns [`FractalError::EmptyGraph`] or [`FractalError::Disconnected`]
    /// for unsuitable input, [`FractalError::RenormalisationStalled`] if a
    /// step fails to shrink the graph, and any covering or assignment error.
    #[instrument(
        name = "renormalise.run",
        err,
        skip(self, graph),
        fields(
            vertices = graph.vertex_count(),
            diameter = self.diameter.get(),
            algorithm = self.algorithm.name(),
            steps = tracing::field::Empty,
        ),
    )]
    pub fn run(&self, graph: &Graph) -> Result<RenormalisationFlow> {
        if graph.is_empty() {
            return Err(FractalError::EmptyGraph);
        }
        if !graph.is_connected() {
            return Err(FractalError::Disconnected {
                components: graph.connected_components().len(),
            });
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut steps = Vec::new();
        let mut current = graph.clone();
        while current.vertex_count() > 1 {
            let centres = self.algorithm.cover(&current, self.diameter)?;
            let (next, assignment) = renormalise(&current, &centres, &mut rng)?.into_parts();
            if next.vertex_count() >= current.vertex_count() {
                return Err(FractalError::RenormalisationStalled {
                    vertices: current.vertex_count(),
                });
            }
            debug!(
                step = steps.len() + 1,
                from = current.vertex_count(),
                to = next.vertex_count(),
                "renormalisation step complete"
            );
            telemetry::increment(telemetry::RENORMALISATION_STEPS, 1);
            current = next.clone();
            steps.push(RenormalisationStep {
                centres,
                assignment,
                graph: next,
            });
        }

        tracing::Span::current().record("steps", steps.len());
        info!(steps = steps.len(), "renormalisation flow complete");
        Ok(RenormalisationFlow {
            initial_vertices: graph.vertex_count(),
            steps,
        })
    }
}

/// One covering and collapse within a [`RenormalisationFlow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenormalisationStep {
    centres: CentreSet,
    assignment: BoxAssignment,
    graph: Graph,
}

impl RenormalisationStep {
    /// Centres selected on the graph entering this step.
    #[must_use]
    #[rustfmt::skip]
    pub fn centres(&self) -> &CentreSet { &self.centres }

    /// Box of every vertex of the graph entering this step.
    #[must_use]
    #[rustfmt::skip]
    pub fn assignment(&self) -> &BoxAssignment { &self.assignment }

    /// Renormalised graph leaving this step.
    #[must_use]
    #[rustfmt::skip]
    pub fn graph(&self) -> &Graph { &self.graph }
}

/// Every step of a renormalisation run, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenormalisationFlow {
    initial_vertices: usize,
    steps: Vec<RenormalisationStep>,
}

impl RenormalisationFlow {
    /// Steps in execution order.
    #[must_use]
    #[rustfmt::skip]
    pub fn steps(&self) -> &[RenormalisationStep] { &self.steps }

    /// Number of steps taken.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.steps.len() }

    /// Returns `true` when the input already had a single vertex.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.steps.is_empty() }

    /// Vertex count before the first step followed by the count after each
    /// step; strictly decreasing and ending at one.
    #[must_use]
    pub fn vertex_counts(&self) -> Vec<usize> {
        std::iter::once(self.initial_vertices)
            .chain(self.steps.iter().map(|step| step.graph.vertex_count()))
            .collect()
    }

    /// Graph produced by the last step.
    #[must_use]
    pub fn final_graph(&self) -> Option<&Graph> {
        self.steps.last().map(|step| &step.graph)
    }

    /// Consumes the flow, returning its steps.
    #[must_use]
    #[rustfmt::skip]
    pub fn into_steps(self) -> Vec<RenormalisationStep> { self.steps }
}
