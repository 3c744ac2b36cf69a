//! Reporting utilities: text reports, tables and JSON output.

pub mod format;

pub use format::*;
