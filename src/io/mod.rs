//! Input/output helpers.
//!
//! - calibration table CSV export (`export`)

pub mod export;

pub use export::*;
