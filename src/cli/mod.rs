//! Command-line parsing for the concrete strength estimator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the estimation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{MixField, MixParameters};
use crate::error::AppError;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mix", version, about = "Concrete mix-design strength estimator")]
pub struct Cli {
    /// Write logs to this file (also read from `MIX_LOG_FILE`).
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI (sliders, maturity chart, calibration table).
    Tui(TuiArgs),
    /// Estimate strength for one mix and print a report.
    Estimate(EstimateArgs),
    /// Print the calibration table, optionally exporting it to CSV.
    Reference(ReferenceArgs),
}

/// Jitter options shared by the TUI and `estimate`.
#[derive(Debug, Args, Clone)]
pub struct JitterArgs {
    /// Seed for the jitter RNG (omit for a fresh sequence every run).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable jitter entirely (deterministic output).
    #[arg(long)]
    pub no_jitter: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    /// Show the technical guide panel on start.
    #[arg(long)]
    pub guide: bool,

    /// Simulated calculation delay in milliseconds.
    #[arg(long, default_value_t = 650)]
    pub delay_ms: u64,

    #[command(flatten)]
    pub jitter: JitterArgs,
}

#[derive(Debug, Parser, Clone)]
pub struct EstimateArgs {
    /// Cementitious content (kg/m³), 150..=550.
    #[arg(long, default_value_t = 350.0)]
    pub cement: f64,

    /// Free water content (kg/m³), 120..=280.
    #[arg(long, default_value_t = 180.0)]
    pub water: f64,

    /// Coarse aggregate (kg/m³), 850..=1150.
    #[arg(long, default_value_t = 950.0)]
    pub coarse: f64,

    /// Fine aggregate (kg/m³), 600..=950.
    #[arg(long, default_value_t = 750.0)]
    pub fine: f64,

    /// Curing period (days), 1..=90.
    #[arg(long, default_value_t = 28)]
    pub days: u32,

    #[command(flatten)]
    pub jitter: JitterArgs,

    /// Print JSON instead of the text report.
    #[arg(long, conflicts_with = "plot")]
    pub json: bool,

    /// Append an ASCII maturity-curve plot to the report.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,
}

impl EstimateArgs {
    /// Build validated parameters. Out-of-range values are rejected, not clamped.
    pub fn params(&self) -> Result<MixParameters, AppError> {
        let params = MixParameters {
            cement: self.cement,
            water: self.water,
            coarse_aggregate: self.coarse,
            fine_aggregate: self.fine,
            curing_days: self.days,
        };

        if let Some((field, value)) = params.out_of_range() {
            let range = field.range();
            return Err(AppError::input(format!(
                "{} {value} is outside {}..={} {}.",
                field.flag(),
                range.min,
                range.max,
                field.unit(),
            )));
        }
        Ok(params)
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ReferenceArgs {
    /// Export the table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

/// Parse typed slider input for `field`.
///
/// Non-numeric text is rejected; numeric values are clamped to the field's range.
pub fn parse_field_value(field: MixField, input: &str) -> Result<f64, AppError> {
    let trimmed = input.trim();
    let v = trimmed
        .parse::<f64>()
        .map_err(|_| AppError::input(format!("'{trimmed}' is not a number.")))?;
    if !v.is_finite() {
        return Err(AppError::input(format!("'{trimmed}' is not a finite number.")));
    }
    Ok(field.normalize(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate_args(argv: &[&str]) -> EstimateArgs {
        let mut full = vec!["mix", "estimate"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Command::Estimate(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn estimate_defaults_match_session_defaults() {
        let args = estimate_args(&[]);
        assert_eq!(args.params().unwrap(), MixParameters::default());
        assert!(!args.jitter.no_jitter);
    }

    #[test]
    fn estimate_rejects_out_of_range_values() {
        let err = estimate_args(&["--water", "300"]).params().unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("--water"), "{err}");

        let err = estimate_args(&["--days", "0"]).params().unwrap_err();
        assert!(err.message().contains("--days"), "{err}");
    }

    #[test]
    fn typed_values_are_clamped_or_rejected() {
        assert_eq!(parse_field_value(MixField::Cement, " 600 ").unwrap(), 550.0);
        assert_eq!(parse_field_value(MixField::CuringDays, "7.4").unwrap(), 7.0);
        assert!(parse_field_value(MixField::Water, "abc").is_err());
        assert!(parse_field_value(MixField::Water, "NaN").is_err());
    }
}
