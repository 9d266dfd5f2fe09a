//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during generation and fitting
//! - exported to CSV/JSON
//! - read back for round-trip checks and the `tables` command

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Number of monthly observations generated per city.
pub const SERIES_LEN: usize = 36;

/// Number of future months forecast per city.
pub const FORECAST_HORIZON: usize = 12;

/// Number of most recent observations used as the growth baseline.
pub const TRAILING_WINDOW: usize = 12;

/// Seed for the synthetic data generator.
pub const DEFAULT_SEED: u64 = 42;

/// Static description of a city's synthetic crime process.
///
/// `value[i] = base + i * step + U{-noise, ..., noise}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityProfile {
    pub name: String,
    pub base: f64,
    pub step: f64,
    pub noise: i64,
}

impl CityProfile {
    pub fn new(name: impl Into<String>, base: f64, step: f64, noise: i64) -> Self {
        Self {
            name: name.into(),
            base,
            step,
            noise,
        }
    }
}

/// The six cities the batch job forecasts by default, in processing order.
pub fn default_cities() -> Vec<CityProfile> {
    vec![
        CityProfile::new("Ballari", 100.0, 2.0, 5),
        CityProfile::new("Bengaluru", 320.0, 3.0, 8),
        CityProfile::new("Mysuru", 150.0, 1.0, 4),
        CityProfile::new("Hubballi", 180.0, 1.5, 6),
        CityProfile::new("Mangaluru", 140.0, 2.2, 5),
        CityProfile::new("Kalaburagi", 160.0, 1.8, 7),
    ]
}

/// Information criterion used to rank candidate ARIMA orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InfoCriterion {
    Aic,
    /// Small-sample corrected AIC.
    Aicc,
    Bic,
}

impl InfoCriterion {
    pub fn display_name(self) -> &'static str {
        match self {
            InfoCriterion::Aic => "AIC",
            InfoCriterion::Aicc => "AICc",
            InfoCriterion::Bic => "BIC",
        }
    }

    /// Score a fit with log-likelihood `ll`, `k` estimated parameters and `n`
    /// effective observations. Lower is better.
    pub fn score(self, ll: f64, k: usize, n: usize) -> f64 {
        let k = k as f64;
        let n = n as f64;
        let aic = -2.0 * ll + 2.0 * k;
        match self {
            InfoCriterion::Aic => aic,
            InfoCriterion::Aicc => {
                if n - k - 1.0 <= 0.0 {
                    f64::INFINITY
                } else {
                    aic + (2.0 * k * (k + 1.0)) / (n - k - 1.0)
                }
            }
            InfoCriterion::Bic => -2.0 * ll + k * n.ln(),
        }
    }
}

/// How candidate orders are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Hill-climb from a few starting orders through neighbouring orders.
    Stepwise,
    /// Fit every admissible order.
    Exhaustive,
}

/// Bounds and strategy for automatic ARIMA order selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub max_p: usize,
    pub max_q: usize,
    pub max_d: usize,
    /// Upper bound on `p + q`.
    pub max_order: usize,
    /// Upper bound on the number of candidate fits per series.
    pub max_models: usize,
    pub criterion: InfoCriterion,
    pub mode: SearchMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_p: 5,
            max_q: 5,
            max_d: 2,
            max_order: 5,
            max_models: 94,
            criterion: InfoCriterion::Aic,
            mode: SearchMode::Stepwise,
        }
    }
}

/// Resolved run configuration.
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub cities: Vec<CityProfile>,
    pub seed: u64,
    pub series_len: usize,
    pub horizon: usize,
    pub search: SearchConfig,

    pub out_dir: PathBuf,
    pub charts: bool,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export: bool,
    pub manifest: Option<PathBuf>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            cities: default_cities(),
            seed: DEFAULT_SEED,
            series_len: SERIES_LEN,
            horizon: FORECAST_HORIZON,
            search: SearchConfig::default(),
            out_dir: PathBuf::from("."),
            charts: true,
            plot: true,
            plot_width: 72,
            plot_height: 20,
            export: true,
            manifest: None,
        }
    }
}

/// Monthly observations for one city, periods numbered from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub city: String,
    pub values: Vec<f64>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The last `window` observations (all of them if the series is shorter).
    pub fn trailing(&self, window: usize) -> &[f64] {
        &self.values[self.values.len().saturating_sub(window)..]
    }
}

/// Point forecasts with 95% prediction bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Period number of `values[0]` (the first month after the series).
    pub start_period: usize,
    pub values: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Forecast {
    /// `(period, value)` pairs, e.g. `(37, ..), (38, ..), ...`.
    pub fn points(&self) -> Vec<(usize, f64)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| (self.start_period + i, v))
            .collect()
    }
}

/// Human-readable description of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescription {
    /// e.g. `ARIMA(0,1,1) with drift`.
    pub label: String,
    pub criterion: InfoCriterion,
    pub score: f64,
    pub sigma2: f64,
    /// Intercept (if any), then AR, then MA coefficients.
    pub coefficients: Vec<f64>,
    pub candidates_tried: usize,
}

/// Per-city aggregate. `None` values are flagged in `note`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySummary {
    pub city: String,
    pub total: Option<f64>,
    /// Growth in percent, rounded to 2 decimal places.
    pub growth: Option<f64>,
    pub note: Option<String>,
}

/// Everything computed for one city. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityResult {
    pub series: TimeSeries,
    pub model: Option<ModelDescription>,
    pub forecast: Option<Forecast>,
    pub summary: CitySummary,
}

impl CityResult {
    pub fn city(&self) -> &str {
        &self.summary.city
    }
}

/// One row of the predicted-totals table; field names are the export columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Total Predicted Crimes")]
    pub total: Option<f64>,
}

/// One row of the growth table; field names are the export columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRow {
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Predicted Growth %")]
    pub growth: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrowthTable {
    pub rows: Vec<GrowthRow>,
}
