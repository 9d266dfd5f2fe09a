//! Shared forecast pipeline.
//!
//! Keeps the core workflow in one place:
//! generate series -> fit/search per city (parallel) -> forecast -> aggregate
//!
//! The CLI only handles presentation (printing, charts, exports).

use rayon::prelude::*;

use crate::data::generate_all;
use crate::domain::{CityResult, ForecastConfig, GrowthTable, SummaryTable, TimeSeries};
use crate::error::{AppError, ModelFitError};
use crate::fit::AutoArima;
use crate::models::{Fittable, FittedModel};
use crate::report::{build_growth_table, build_summary_table, summarize_city};

/// All computed outputs of a single run. Tables are in city order.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub results: Vec<CityResult>,
    pub summary: SummaryTable,
    pub growth: GrowthTable,
}

/// Execute the full pipeline with the automatic ARIMA backend.
pub fn run_forecast(config: &ForecastConfig) -> Result<RunOutput, AppError> {
    let backend = AutoArima::new(config.search.clone());
    run_forecast_with(config, &backend)
}

/// Execute the pipeline with any forecasting backend.
///
/// Generation errors abort the run; fitting errors only flag the affected city.
pub fn run_forecast_with<F>(config: &ForecastConfig, backend: &F) -> Result<RunOutput, AppError>
where
    F: Fittable + Sync,
{
    // 1) Generate all series sequentially from one seeded generator.
    let series = generate_all(&config.cities, config.seed, config.series_len)?;
    log::info!("generated {} series (seed={})", series.len(), config.seed);

    // 2) Fit and forecast each city independently.
    let results: Vec<CityResult> = series
        .into_par_iter()
        .map(|s| forecast_city(backend, s, config.horizon))
        .collect();

    let failed = results.iter().filter(|r| r.forecast.is_none()).count();
    log::info!("forecast {} cities ({} flagged)", results.len(), failed);

    // 3) Aggregate.
    let summary = build_summary_table(&results);
    let growth = build_growth_table(&results);

    Ok(RunOutput {
        results,
        summary,
        growth,
    })
}

/// Fit, forecast and summarize one city. Never fails; failures are recorded
/// in the result's summary note.
pub fn forecast_city<F: Fittable>(backend: &F, series: TimeSeries, horizon: usize) -> CityResult {
    let fitted = backend.fit(&series.values).and_then(|model| {
        let forecast = model.forecast(horizon);
        if forecast.values.iter().any(|v| !v.is_finite()) {
            return Err(ModelFitError::NonFinite);
        }
        Ok((model.describe(), forecast))
    });

    match fitted {
        Ok((model, forecast)) => {
            log::info!("{}: {}", series.city, model.label);
            let summary = summarize_city(&series, Ok(&forecast));
            CityResult {
                series,
                model: Some(model),
                forecast: Some(forecast),
                summary,
            }
        }
        Err(err) => {
            log::warn!("{}: forecast unavailable: {err}", series.city);
            let summary = summarize_city(&series, Err(&err));
            CityResult {
                series,
                model: None,
                forecast: None,
                summary,
            }
        }
    }
}
