//! ARIMA fitting and automatic order selection.
//!
//! Responsibilities:
//!
//! - choose the differencing order (`diff`)
//! - estimate a single `ARIMA(p,d,q)` and forecast from it (`fitter`)
//! - enumerate candidate orders (`order_grid`)
//! - search candidates in parallel and keep the best by information criterion (`selection`)

pub mod diff;
pub mod fitter;
pub mod order_grid;
pub mod selection;

pub use fitter::*;
pub use selection::*;
