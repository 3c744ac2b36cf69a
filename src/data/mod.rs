//! Bundled data.

pub mod reference;

pub use reference::{REFERENCE_FOOTNOTE, REFERENCE_SAMPLES, reference_samples};
