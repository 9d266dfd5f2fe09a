//! Input/output helpers.
//!
//! - summary/growth CSV export and read-back (`export`)
//! - JSON run manifest (`manifest`)
//! - city profile files (`profiles`)

pub mod export;
pub mod manifest;
pub mod profiles;

pub use export::*;
pub use manifest::*;
pub use profiles::*;
