//! Scaling curves, model fitting and fractality classification.
//!
//! A [`ScalingCurve`] records the minimum box count `NB` against the box
//! diameter `lB`. Fractal networks follow `NB ~ lB^(-dB)`; small-world
//! networks decay exponentially. [`classify`] fits both laws and reports
//! which one explains the curve better.

mod classify;
mod curve;
mod fit;

pub use self::{
    classify::{ClassifierConfig, FractalityReport, classify, classify_graph},
    curve::{CurveConfig, ScalingCurve, scaling_curve},
    fit::{
        FitError, FitErrorCode, FitModel, FractalDimension, GridFit, GridSearch, LinearFit,
        ModelFit, WindowFit, best_window, fit_exponential, fit_power_law, fractal_dimension,
        linear_regression,
    },
};
