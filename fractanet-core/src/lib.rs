//! Fractanet core library.
//!
//! Box-covering analysis of complex networks: MEMB and colouring coverings,
//! renormalisation to quotient graphs, and classification of the resulting
//! box-count scaling curve as fractal or non-fractal.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod colouring;
mod covering;
mod error;
mod graph;
mod renormalise;
mod scaling;
mod telemetry;

#[cfg(test)]
mod test_utils;

pub use crate::{
    colouring::{
        Colouring, VertexOrder, cover_by_colouring, dual_graph, greedy_colouring, smallest_last,
    },
    covering::{
        AUTO_MATRIX_MAX_VERTICES, AUTO_MATRIX_MIN_DENSITY, AcceleratedMemb, BoxCovering,
        BoxDiameter, CachedMemb, CentreSet, Coverage, CoveringAlgorithm, MatrixMemb, NaiveMemb,
        RandomSequential, TieBreak,
    },
    error::{FractalError, FractalErrorCode, Result},
    graph::{DEFAULT_MATRIX_VERTEX_LIMIT, DistanceMatrix, Graph},
    renormalise::{
        BoxAssignment, MIN_FLOW_DIAMETER, Renormalisation, RenormalisationFlow,
        RenormalisationStep, Renormaliser, assign_boxes, central_distances, renormalise,
    },
    scaling::{
        ClassifierConfig, CurveConfig, FitError, FitErrorCode, FitModel, FractalDimension,
        FractalityReport, GridFit, GridSearch, LinearFit, ModelFit, ScalingCurve, WindowFit,
        best_window, classify, classify_graph, fit_exponential, fit_power_law, fractal_dimension,
        linear_regression, scaling_curve,
    },
};
