//! Strength estimation engine.
//!
//! - closed-form estimate + grade (`estimate`)
//! - injectable jitter sources (`jitter`)
//! - maturity projection (`maturity`)

pub mod estimate;
pub mod jitter;
pub mod maturity;

pub use estimate::{estimate, raw_strength};
pub use jitter::{FixedJitter, Jitter, JitterSource, NoJitter, UniformJitter};
pub use maturity::{maturity_curve, maturity_for, step_after};
