//! Curve fitting for box-count scaling laws.
//!
//! Two fitting routes are provided. The closed-form route log-transforms the
//! box counts and solves ordinary least squares, scoring each model by the
//! R² of its log predictions; the classifier uses this route. The grid
//! route ([`GridSearch`]) minimises the sum of squared residuals in linear
//! space over an iteratively narrowed parameter grid.

use rayon::prelude::*;
use thiserror::Error;

use crate::telemetry;

/// Errors raised while fitting scaling models.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FitError {
    /// Too few points to fit a line.
    #[error("at least {minimum} points are required (got {got})")]
    InsufficientPoints {
        /// Number of points supplied.
        got: usize,
        /// Smallest number accepted.
        minimum: usize,
    },
    /// Abscissae and ordinates differ in length.
    #[error("abscissa has {x} values but ordinate has {y}")]
    LengthMismatch {
        /// Number of abscissae.
        x: usize,
        /// Number of ordinates.
        y: usize,
    },
    /// A value that must be log-transformed was zero, negative or not finite.
    #[error("value {value} at index {index} must be positive and finite")]
    NonPositiveValue {
        /// Position of the offending value.
        index: usize,
        /// The offending value.
        value: f64,
    },
    /// Every abscissa is identical, so no slope exists.
    #[error("abscissa values are all equal")]
    ConstantAbscissa,
    /// The fitted slope is zero, so the model carries no scaling exponent.
    #[error("fitted slope is zero")]
    FlatFit,
    /// A window fraction outside `(0, 1]` or one that leaves fewer than two
    /// points.
    #[error("window fraction {fraction} does not select at least two points")]
    InvalidWindow {
        /// The rejected fraction.
        fraction: f64,
    },
    /// Grid-search parameters are unusable.
    #[error("invalid grid: {reason}")]
    InvalidGrid {
        /// Description of the problem.
        reason: &'static str,
    },
}

impl FitError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> FitErrorCode {
        match self {
            Self::InsufficientPoints { .. } => FitErrorCode::InsufficientPoints,
            Self::LengthMismatch { .. } => FitErrorCode::LengthMismatch,
            Self::NonPositiveValue { .. } => FitErrorCode::NonPositiveValue,
            Self::ConstantAbscissa => FitErrorCode::ConstantAbscissa,
            Self::FlatFit => FitErrorCode::FlatFit,
            Self::InvalidWindow { .. } => FitErrorCode::InvalidWindow,
            Self::InvalidGrid { .. } => FitErrorCode::InvalidGrid,
        }
    }
}

/// Machine-readable error codes for [`FitError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FitErrorCode {
    /// Too few points to fit a line.
    InsufficientPoints,
    /// Abscissae and ordinates differ in length.
    LengthMismatch,
    /// A log-transformed value was not positive.
    NonPositiveValue,
    /// Every abscissa is identical.
    ConstantAbscissa,
    /// The fitted slope is zero.
    FlatFit,
    /// A window fraction is unusable.
    InvalidWindow,
    /// Grid-search parameters are unusable.
    InvalidGrid,
}

impl FitErrorCode {
    /// Returns the symbolic identifier for logging and metrics surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsufficientPoints => "INSUFFICIENT_POINTS",
            Self::LengthMismatch => "LENGTH_MISMATCH",
            Self::NonPositiveValue => "NON_POSITIVE_VALUE",
            Self::ConstantAbscissa => "CONSTANT_ABSCISSA",
            Self::FlatFit => "FLAT_FIT",
            Self::InvalidWindow => "INVALID_WINDOW",
            Self::InvalidGrid => "INVALID_GRID",
        }
    }
}

const MIN_POINTS: usize = 2;

/// Ordinary least-squares line `y = intercept + slope · x`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearFit {
    /// Value of the line at `x = 0`.
    pub intercept: f64,
    /// Gradient of the line.
    pub slope: f64,
    /// Coefficient of determination of the fit.
    pub r_squared: f64,
}

fn check_lengths(x: &[f64], y: &[f64]) -> Result<(), FitError> {
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.len() < MIN_POINTS {
        return Err(FitError::InsufficientPoints {
            got: x.len(),
            minimum: MIN_POINTS,
        });
    }
    Ok(())
}

/// Fits a least-squares line through `(x, y)`.
///
/// R² follows the usual convention for a constant ordinate: 1 for a perfect
/// fit, 0 otherwise.
///
/// # Errors
/// Returns [`FitError::LengthMismatch`], [`FitError::InsufficientPoints`]
/// or [`FitError::ConstantAbscissa`] for degenerate input.
///
/// # Examples
/// ```
/// use fractanet_core::linear_regression;
///
/// let fit = linear_regression(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0])?;
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!((fit.intercept - 1.0).abs() < 1e-12);
/// assert!((fit.r_squared - 1.0).abs() < 1e-12);
/// # Ok::<(), fractanet_core::FitError>(())
/// ```
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<LinearFit, FitError> {
    check_lengths(x, y)?;
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx == 0.0 {
        return Err(FitError::ConstantAbscissa);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let residual: f64 = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| (yi - (intercept + slope * xi)).powi(2))
        .sum();
    let r_squared = if syy == 0.0 {
        if residual == 0.0 { 1.0 } else { 0.0 }
    } else {
        1.0 - residual / syy
    };

    Ok(LinearFit {
        intercept,
        slope,
        r_squared,
    })
}

/// Scaling-law family.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FitModel {
    /// `y = A · x^(-c)`, the fractal signature.
    PowerLaw,
    /// `y = A · e^(-c · x)`, the non-fractal signature.
    Exponential,
    /// `y = A - c · x`.
    Linear,
}

impl FitModel {
    /// Evaluates the model at `x`.
    #[must_use]
    pub fn predict(self, amplitude: f64, exponent: f64, x: f64) -> f64 {
        match self {
            Self::PowerLaw => amplitude * x.powf(-exponent),
            Self::Exponential => amplitude * (-exponent * x).exp(),
            Self::Linear => amplitude - exponent * x,
        }
    }

    /// Sum of squared residuals of the model against `(x, y)`.
    #[must_use]
    pub fn ssr(self, amplitude: f64, exponent: f64, x: &[f64], y: &[f64]) -> f64 {
        x.iter()
            .zip(y)
            .map(|(&xi, &yi)| (yi - self.predict(amplitude, exponent, xi)).powi(2))
            .sum()
    }
}

/// A fitted scaling model.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelFit {
    /// Model family.
    pub model: FitModel,
    /// Amplitude `A`.
    pub amplitude: f64,
    /// Exponent `c`; for a power law this is the box dimension.
    pub exponent: f64,
    /// R² of the log-space regression.
    pub r_squared: f64,
    /// Sum of squared residuals of the fitted model in linear space.
    pub ssr: f64,
}

fn logs(values: &[f64]) -> Result<Vec<f64>, FitError> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            if value > 0.0 && value.is_finite() {
                Ok(value.ln())
            } else {
                Err(FitError::NonPositiveValue { index, value })
            }
        })
        .collect()
}

fn model_fit(model: FitModel, line: LinearFit, x: &[f64], y: &[f64]) -> Result<ModelFit, FitError> {
    if line.slope == 0.0 {
        return Err(FitError::FlatFit);
    }
    let amplitude = line.intercept.exp();
    let exponent = -line.slope;
    Ok(ModelFit {
        model,
        amplitude,
        exponent,
        r_squared: line.r_squared,
        ssr: model.ssr(amplitude, exponent, x, y),
    })
}

/// Fits `y = A · x^(-c)` by regressing `ln y` on `ln x`.
///
/// # Errors
/// Returns [`FitError`] for degenerate input, non-positive values or a
/// zero slope.
///
/// # Examples
/// ```
/// use fractanet_core::fit_power_law;
///
/// let x = [1.0, 2.0, 4.0, 8.0];
/// let y = [64.0, 16.0, 4.0, 1.0];
/// let fit = fit_power_law(&x, &y)?;
/// assert!((fit.exponent - 2.0).abs() < 1e-9);
/// assert!((fit.amplitude - 64.0).abs() < 1e-6);
/// # Ok::<(), fractanet_core::FitError>(())
/// ```
pub fn fit_power_law(x: &[f64], y: &[f64]) -> Result<ModelFit, FitError> {
    check_lengths(x, y)?;
    let line = linear_regression(&logs(x)?, &logs(y)?)?;
    model_fit(FitModel::PowerLaw, line, x, y)
}

/// Fits `y = A · e^(-c · x)` by regressing `ln y` on `x`.
///
/// # Errors
/// Returns [`FitError`] for degenerate input, non-positive ordinates or a
/// zero slope.
pub fn fit_exponential(x: &[f64], y: &[f64]) -> Result<ModelFit, FitError> {
    check_lengths(x, y)?;
    let line = linear_regression(x, &logs(y)?)?;
    model_fit(FitModel::Exponential, line, x, y)
}

/// Best parameters found by a [`GridSearch`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridFit {
    /// Model family searched.
    pub model: FitModel,
    /// Amplitude `A`.
    pub amplitude: f64,
    /// Exponent `c`.
    pub exponent: f64,
    /// Sum of squared residuals at the best cell.
    pub ssr: f64,
}

/// Brute-force least-squares search over a rectangular `(A, c)` grid.
///
/// Each round scores `steps × steps` evenly spaced cells in parallel and
/// keeps the lowest sum of squared residuals (the first cell in row-major
/// order on ties). The next round recentres the grid on the winner with the
/// amplitude span divided by 10 and the exponent span by 5, clamping both
/// lower bounds at zero.
///
/// # Examples
/// ```
/// use fractanet_core::{FitModel, GridSearch};
///
/// let x = [1.0, 2.0, 3.0, 4.0];
/// let y = [10.0, 8.0, 6.0, 4.0];
/// let fit = GridSearch::new(FitModel::Linear).fit(&x, &y)?;
/// assert!((fit.amplitude - 12.0).abs() < 1e-6);
/// assert!((fit.exponent - 2.0).abs() < 1e-6);
/// # Ok::<(), fractanet_core::FitError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSearch {
    model: FitModel,
    amplitude: (f64, f64),
    exponent: (f64, f64),
    steps: usize,
    rounds: usize,
}

impl GridSearch {
    /// Creates a search with the default ranges for `model`: `A ∈ [0, 10000]`
    /// and `c ∈ [0, 12.5]` on a 100-point grid for the power-law and
    /// exponential families, `A ∈ [0, 100]` and `c ∈ [0, 10]` on a 101-point
    /// grid for the linear family; four rounds in every case.
    #[must_use]
    pub fn new(model: FitModel) -> Self {
        let (amplitude, exponent, steps) = match model {
            FitModel::PowerLaw | FitModel::Exponential => ((0.0, 10_000.0), (0.0, 12.5), 100),
            FitModel::Linear => ((0.0, 100.0), (0.0, 10.0), 101),
        };
        Self {
            model,
            amplitude,
            exponent,
            steps,
            rounds: 4,
        }
    }

    /// Sets the initial amplitude range.
    #[must_use]
    pub fn with_amplitude_range(mut self, min: f64, max: f64) -> Self {
        self.amplitude = (min, max);
        self
    }

    /// Sets the initial exponent range.
    #[must_use]
    pub fn with_exponent_range(mut self, min: f64, max: f64) -> Self {
        self.exponent = (min, max);
        self
    }

    /// Sets the number of grid points per axis.
    #[must_use]
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Sets the number of zoom rounds.
    #[must_use]
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Model family searched.
    #[must_use]
    #[rustfmt::skip]
    pub fn model(&self) -> FitModel { self.model }

    fn validate(&self) -> Result<(), FitError> {
        let ranges_ok = [self.amplitude, self.exponent]
            .iter()
            .all(|&(min, max)| min.is_finite() && max.is_finite() && min <= max);
        if !ranges_ok {
            return Err(FitError::InvalidGrid {
                reason: "ranges must be finite with min <= max",
            });
        }
        if self.steps < 2 {
            return Err(FitError::InvalidGrid {
                reason: "at least two steps per axis are required",
            });
        }
        if self.rounds == 0 {
            return Err(FitError::InvalidGrid {
                reason: "at least one round is required",
            });
        }
        Ok(())
    }

    /// Runs the search against `(x, y)`.
    ///
    /// # Errors
    /// Returns [`FitError::InvalidGrid`] for unusable parameters and the
    /// length errors of [`linear_regression`].
    pub fn fit(&self, x: &[f64], y: &[f64]) -> Result<GridFit, FitError> {
        self.validate()?;
        check_lengths(x, y)?;

        let (mut amplitude, mut exponent) = (self.amplitude, self.exponent);
        let mut amplitude_span = amplitude.1 - amplitude.0;
        let mut exponent_span = exponent.1 - exponent.0;
        let mut best = GridFit {
            model: self.model,
            amplitude: amplitude.0,
            exponent: exponent.0,
            ssr: f64::INFINITY,
        };

        for _ in 0..self.rounds {
            best = self.best_cell(amplitude, exponent, x, y);
            amplitude_span /= 10.0;
            exponent_span /= 5.0;
            amplitude = (
                (best.amplitude - amplitude_span / 2.0).max(0.0),
                best.amplitude + amplitude_span / 2.0,
            );
            exponent = (
                (best.exponent - exponent_span / 2.0).max(0.0),
                best.exponent + exponent_span / 2.0,
            );
        }

        let cells = (self.steps * self.steps * self.rounds) as u64;
        telemetry::increment(telemetry::GRID_SEARCH_CELLS, cells);
        Ok(best)
    }

    fn best_cell(&self, amplitude: (f64, f64), exponent: (f64, f64), x: &[f64], y: &[f64]) -> GridFit {
        let steps = self.steps;
        let at = |range: (f64, f64), index: usize| {
            range.0 + (range.1 - range.0) * index as f64 / (steps - 1) as f64
        };
        let (cell, ssr) = (0..steps * steps)
            .into_par_iter()
            .map(|cell| {
                let a = at(amplitude, cell / steps);
                let c = at(exponent, cell % steps);
                (cell, self.model.ssr(a, c, x, y))
            })
            .min_by(|left, right| left.1.total_cmp(&right.1).then(left.0.cmp(&right.0)))
            .unwrap_or((0, f64::INFINITY));
        GridFit {
            model: self.model,
            amplitude: at(amplitude, cell / steps),
            exponent: at(exponent, cell % steps),
            ssr,
        }
    }
}

/// Line fitted over the best contiguous window of a curve.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowFit {
    /// Index of the first point in the window.
    pub start: usize,
    /// Number of points in the window.
    pub width: usize,
    /// Least-squares line over the window.
    pub line: LinearFit,
}

/// Slides a window covering `floor(len · fraction)` points along `(x, y)`
/// and returns the window whose line has the highest R². Windows with a
/// zero slope are skipped; the earliest window wins ties.
///
/// # Errors
/// Returns [`FitError::InvalidWindow`] when `fraction` is outside `(0, 1]`
/// or selects fewer than two points, [`FitError::FlatFit`] when every
/// window is flat, and the length errors of [`linear_regression`].
pub fn best_window(x: &[f64], y: &[f64], fraction: f64) -> Result<WindowFit, FitError> {
    check_lengths(x, y)?;
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(FitError::InvalidWindow { fraction });
    }
    let width = (x.len() as f64 * fraction).floor() as usize;
    if width < MIN_POINTS {
        return Err(FitError::InvalidWindow { fraction });
    }

    let mut best: Option<WindowFit> = None;
    for start in 0..=x.len() - width {
        let window = start..start + width;
        let line = match linear_regression(&x[window.clone()], &y[window]) {
            Ok(line) if line.slope != 0.0 => line,
            Ok(_) | Err(FitError::ConstantAbscissa) => continue,
            Err(error) => return Err(error),
        };
        if best.is_none_or(|current| line.r_squared > current.line.r_squared) {
            best = Some(WindowFit { start, width, line });
        }
    }
    best.ok_or(FitError::FlatFit)
}

/// Box dimension estimated from the steepest well-fitting stretch of a
/// log-log scaling curve.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FractalDimension {
    /// Estimated dimension `dB`, the negated log-log slope.
    pub dimension: f64,
    /// Window fraction that produced the estimate.
    pub fraction: f64,
    /// The window and its line in log-log coordinates.
    pub window: WindowFit,
}

/// Estimates the box dimension from `(lB, NB)` values, trying every window
/// fraction and keeping the fit with the highest R² (earliest fraction on
/// ties). An empty list of fractions means the whole curve.
///
/// # Errors
/// Returns [`FitError::NonPositiveValue`] for values that cannot be
/// log-transformed and the errors of [`best_window`].
///
/// # Examples
/// ```
/// use fractanet_core::fractal_dimension;
///
/// let lb = [2.0, 4.0, 8.0, 16.0];
/// let nb = [256.0, 64.0, 16.0, 4.0];
/// let estimate = fractal_dimension(&lb, &nb, &[1.0, 0.5])?;
/// assert!((estimate.dimension - 2.0).abs() < 1e-9);
/// # Ok::<(), fractanet_core::FitError>(())
/// ```
pub fn fractal_dimension(lb: &[f64], nb: &[f64], fractions: &[f64]) -> Result<FractalDimension, FitError> {
    check_lengths(lb, nb)?;
    let (log_lb, log_nb) = (logs(lb)?, logs(nb)?);
    let fractions = if fractions.is_empty() { &[1.0][..] } else { fractions };

    let mut best: Option<FractalDimension> = None;
    for &fraction in fractions {
        let window = best_window(&log_lb, &log_nb, fraction)?;
        if best.is_none_or(|current| window.line.r_squared > current.window.line.r_squared) {
            best = Some(FractalDimension {
                dimension: -window.line.slope,
                fraction,
                window,
            });
        }
    }
    best.ok_or(FitError::InsufficientPoints {
        got: lb.len(),
        minimum: MIN_POINTS,
    })
}
