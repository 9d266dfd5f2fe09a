//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - city profiles and run configuration (`CityProfile`, `ForecastConfig`)
//! - series, forecasts and fitted-model descriptions
//! - per-city results and the two output tables

pub mod types;

pub use types::*;
