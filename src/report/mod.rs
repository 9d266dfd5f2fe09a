//! Aggregation: forecast totals, growth versus trailing actuals, and the
//! summary/growth tables.
//!
//! Everything here is a pure function of already-computed series and
//! forecasts. Failures are contained per city: a city whose model could not be
//! fitted, or whose growth is undefined, still gets a (flagged) row.

use std::cmp::Ordering;

use crate::domain::{
    CityResult, CitySummary, Forecast, GrowthRow, GrowthTable, SummaryRow, SummaryTable, TRAILING_WINDOW,
    TimeSeries,
};
use crate::error::{DivideByZeroError, ModelFitError};

pub mod format;

pub use format::*;

/// Note attached to rows whose model could not be fitted.
pub const FORECAST_UNAVAILABLE: &str = "forecast unavailable";

/// Sum of the forecast values.
pub fn total_forecast(forecast: &[f64]) -> f64 {
    forecast.iter().sum()
}

/// Percentage change of the forecast total over the last `TRAILING_WINDOW`
/// observations (the whole series if shorter).
pub fn growth_percent(forecast: &[f64], series: &TimeSeries) -> Result<f64, DivideByZeroError> {
    let trailing: f64 = series.trailing(TRAILING_WINDOW).iter().sum();
    if trailing == 0.0 {
        return Err(DivideByZeroError);
    }
    Ok((total_forecast(forecast) - trailing) / trailing * 100.0)
}

/// Round half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Build the per-city summary, containing fit and growth failures.
pub fn summarize_city(series: &TimeSeries, forecast: Result<&Forecast, &ModelFitError>) -> CitySummary {
    let forecast = match forecast {
        Ok(f) => f,
        Err(err) => {
            return CitySummary {
                city: series.city.clone(),
                total: None,
                growth: None,
                note: Some(format!("{FORECAST_UNAVAILABLE}: {err}")),
            };
        }
    };

    let total = total_forecast(&forecast.values);
    match growth_percent(&forecast.values, series) {
        Ok(growth) => CitySummary {
            city: series.city.clone(),
            total: Some(total),
            growth: Some(round_to(growth, 2)),
            note: None,
        },
        Err(err) => {
            log::warn!("{}: {err}", series.city);
            CitySummary {
                city: series.city.clone(),
                total: Some(total),
                growth: None,
                note: Some(err.to_string()),
            }
        }
    }
}

/// `(city, total)` rows in city order.
pub fn build_summary_table(cities: &[CityResult]) -> SummaryTable {
    SummaryTable {
        rows: cities
            .iter()
            .map(|c| SummaryRow {
                city: c.city().to_string(),
                total: c.summary.total,
            })
            .collect(),
    }
}

/// `(city, growth %)` rows in city order; growth is rounded to 2 decimals.
pub fn build_growth_table(cities: &[CityResult]) -> GrowthTable {
    GrowthTable {
        rows: cities
            .iter()
            .map(|c| GrowthRow {
                city: c.city().to_string(),
                growth: c.summary.growth,
            })
            .collect(),
    }
}

impl SummaryTable {
    /// Stable sort by total, largest first; unavailable rows last.
    pub fn sort_descending(&mut self) {
        self.rows.sort_by(|a, b| cmp_desc(a.total, b.total));
    }

    pub fn sorted_descending(&self) -> Self {
        let mut out = self.clone();
        out.sort_descending();
        out
    }
}

impl GrowthTable {
    /// Stable sort by growth, largest first; unavailable rows last.
    pub fn sort_descending(&mut self) {
        self.rows.sort_by(|a, b| cmp_desc(a.growth, b.growth));
    }

    pub fn sorted_descending(&self) -> Self {
        let mut out = self.clone();
        out.sort_descending();
        out
    }
}

fn cmp_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
