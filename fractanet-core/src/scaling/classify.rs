//! Fractal versus non-fractal classification of scaling curves.

use tracing::{info, instrument};

use super::{
    curve::{CurveConfig, ScalingCurve, scaling_curve},
    fit::{FitError, FractalDimension, ModelFit, fit_exponential, fit_power_law, fractal_dimension},
};
use crate::{error::Result, graph::Graph};

/// Settings for [`classify`].
///
/// # Examples
/// ```
/// use fractanet_core::ClassifierConfig;
///
/// let config = ClassifierConfig::new().with_window_fractions(vec![1.0, 0.75])?;
/// assert_eq!(config.window_fractions(), &[1.0, 0.75]);
/// assert!(ClassifierConfig::new().with_window_fractions(vec![1.5]).is_err());
/// # Ok::<(), fractanet_core::FitError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    window_fractions: Vec<f64>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            window_fractions: vec![1.0],
        }
    }
}

impl ClassifierConfig {
    /// Fits the dimension over the whole curve.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window fractions tried when estimating the dimension.
    ///
    /// # Errors
    /// Returns [`FitError::InvalidWindow`] for a fraction outside `(0, 1]`
    /// and [`FitError::InsufficientPoints`] for an empty list.
    pub fn with_window_fractions(mut self, fractions: Vec<f64>) -> core::result::Result<Self, FitError> {
        if fractions.is_empty() {
            return Err(FitError::InsufficientPoints { got: 0, minimum: 1 });
        }
        if let Some(&fraction) = fractions.iter().find(|&&p| !(p > 0.0 && p <= 1.0)) {
            return Err(FitError::InvalidWindow { fraction });
        }
        self.window_fractions = fractions;
        Ok(self)
    }

    /// Window fractions tried when estimating the dimension.
    #[must_use]
    #[rustfmt::skip]
    pub fn window_fractions(&self) -> &[f64] { &self.window_fractions }
}

/// Outcome of classifying a scaling curve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FractalityReport {
    /// The classified curve.
    pub curve: ScalingCurve,
    /// Power-law fit `NB = A · lB^(-dB)`.
    pub power_law: ModelFit,
    /// Exponential fit `NB = A · e^(-c · lB)`.
    pub exponential: ModelFit,
    /// `true` when the power law scores strictly higher.
    pub is_fractal: bool,
    /// Windowed dimension estimate, present only for fractal curves.
    pub dimension: Option<FractalDimension>,
}

/// Decides whether `curve` follows a power law or an exponential.
///
/// Both models are scored by the R² of their log-space regressions. The
/// curve is fractal only when the power law scores strictly higher; the
/// dimension is then re-estimated over the configured windows.
///
/// # Errors
/// Returns [`crate::FractalError::Fit`] when either model cannot be fitted,
/// for example for fewer than two points or a flat curve.
///
/// # Examples
/// ```
/// use fractanet_core::{ClassifierConfig, ScalingCurve, classify};
///
/// let power = ScalingCurve::from_points(vec![(3, 100), (5, 36), (7, 18), (9, 11)]);
/// let report = classify(&power, &ClassifierConfig::default())?;
/// assert!(report.is_fractal);
///
/// let decay = ScalingCurve::from_points(vec![(1, 100), (2, 61), (3, 37), (4, 22)]);
/// assert!(!classify(&decay, &ClassifierConfig::default())?.is_fractal);
/// # Ok::<(), fractanet_core::FractalError>(())
/// ```
#[instrument(
    name = "scaling.classify",
    err,
    skip(curve, config),
    fields(points = curve.len()),
)]
pub fn classify(curve: &ScalingCurve, config: &ClassifierConfig) -> Result<FractalityReport> {
    let (lb, nb) = (curve.lb_values(), curve.nb_values());
    let power_law = fit_power_law(&lb, &nb)?;
    let exponential = fit_exponential(&lb, &nb)?;
    let is_fractal = power_law.r_squared > exponential.r_squared;
    let dimension = if is_fractal {
        Some(fractal_dimension(&lb, &nb, config.window_fractions())?)
    } else {
        None
    };

    info!(
        power_law_r2 = power_law.r_squared,
        exponential_r2 = exponential.r_squared,
        is_fractal,
        dimension = dimension.map(|estimate| estimate.dimension),
        "classification complete"
    );
    Ok(FractalityReport {
        curve: curve.clone(),
        power_law,
        exponential,
        is_fractal,
        dimension,
    })
}

/// Measures the scaling curve of `graph` and classifies it.
///
/// # Errors
/// Returns the errors of [`scaling_curve`] and [`classify`].
pub fn classify_graph(
    graph: &Graph,
    curve_config: &CurveConfig,
    classifier_config: &ClassifierConfig,
) -> Result<FractalityReport> {
    let curve = scaling_curve(graph, curve_config)?;
    classify(&curve, classifier_config)
}
