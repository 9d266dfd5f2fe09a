//! Input data: synthetic per-city series.

pub mod sample;

pub use sample::*;
