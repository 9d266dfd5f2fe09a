//! Forecasting model capabilities.
//!
//! Models are described by small traits so that the per-city pipeline can stay
//! generic over the fitting backend.

pub mod model;

pub use model::*;
