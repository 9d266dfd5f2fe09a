//! Chart rendering.
//!
//! - terminal plot of the monthly forecasts (`ascii`)
//! - SVG comparison and monthly-trend charts (`charts`)

pub mod ascii;
pub mod charts;

pub use ascii::*;
pub use charts::*;
