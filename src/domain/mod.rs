//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - mix-design inputs and their control ranges (`MixParameters`, `MixField`, `ParamRange`)
//! - estimator outputs (`EstimationResult`, `StrengthGrade`, `StrengthFactors`)
//! - maturity projection points and static reference rows

pub mod types;

pub use types::*;
