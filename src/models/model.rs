//! Forecasting capabilities and ARMA evaluation.
//!
//! The pipeline only depends on two capabilities:
//! - `Fittable`: turn a series into a fitted model (or a `ModelFitError`)
//! - `FittedModel`: produce a forecast and a description of itself
//!
//! The ARMA one-step predictor below is shared by estimation (residual
//! recursion) and forecasting so both use exactly the same equation.

use crate::domain::{Forecast, ModelDescription};
use crate::error::ModelFitError;

/// A model family that can be fitted to a univariate series.
pub trait Fittable {
    type Fitted: FittedModel;

    fn fit(&self, series: &[f64]) -> Result<Self::Fitted, ModelFitError>;
}

/// A fitted model, ready to forecast.
pub trait FittedModel {
    /// Forecast `horizon` periods past the end of the fitted series.
    fn forecast(&self, horizon: usize) -> Forecast;

    fn describe(&self) -> ModelDescription;
}

/// One-step ARMA prediction for position `t`:
///
/// `ŵ_t = c + Σ φ_i w_{t-i} + Σ θ_j e_{t-j}`
///
/// Lags that fall before the start of `w`/`e` contribute zero.
pub fn arma_predict(intercept: f64, ar: &[f64], ma: &[f64], w: &[f64], e: &[f64], t: usize) -> f64 {
    let mut pred = intercept;
    for (i, phi) in ar.iter().enumerate() {
        if t > i {
            pred += phi * w[t - 1 - i];
        }
    }
    for (j, theta) in ma.iter().enumerate() {
        if t > j {
            pred += theta * e[t - 1 - j];
        }
    }
    pred
}
