//! Mathematical utilities: least squares, lag polynomials and statistics.

pub mod ols;
pub mod poly;
pub mod stats;

pub use ols::*;
pub use poly::*;
pub use stats::*;
