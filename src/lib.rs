//! `mix-strength` library crate.
//!
//! The binary (`mix`) is a thin wrapper around this library so that:
//!
//! - the estimator and session logic are testable without a terminal
//! - the TUI and the one-shot CLI commands share one engine

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
