//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initializes logging
//! - dispatches to the TUI or the one-shot commands

use clap::Parser;
use tracing::debug;

use crate::cli::{Command, EstimateArgs, ReferenceArgs};
use crate::data::{REFERENCE_FOOTNOTE, reference_samples};
use crate::engine::{Jitter, estimate, maturity_for};
use crate::error::AppError;
use crate::logging::LogTarget;
use crate::report::{EstimateReport, format_estimate_report, format_reference_table};

pub mod session;

/// Entry point for the `mix` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // We want `mix` and `mix --guide` to behave like `mix tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let interactive = matches!(cli.command, Command::Tui(_));
    crate::logging::init(&LogTarget::resolve(cli.log_file.as_deref(), interactive))?;
    debug!(command = ?cli.command, "dispatching");

    match cli.command {
        Command::Tui(args) => crate::tui::run(args),
        Command::Estimate(args) => handle_estimate(args),
        Command::Reference(args) => handle_reference(args),
    }
}

fn handle_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let params = args.params()?;
    let mut jitter = Jitter::from_flags(args.jitter.seed, args.jitter.no_jitter);
    let result = estimate(&params, &mut jitter)?;
    let report = EstimateReport {
        params,
        maturity: maturity_for(&result),
        result,
    };

    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!("{}", format_estimate_report(&report));
    if args.plot {
        println!(
            "{}",
            crate::plot::render_maturity_plot(&report.maturity, args.width, args.height)
        );
    }
    Ok(())
}

fn handle_reference(args: ReferenceArgs) -> Result<(), AppError> {
    let rows = reference_samples();
    println!("{}", format_reference_table(rows, REFERENCE_FOOTNOTE));

    if let Some(path) = &args.export {
        crate::io::export::write_reference_csv(path, rows)?;
        println!("Exported {} rows to {}", rows.len(), path.display());
    }
    Ok(())
}

/// Rewrite argv so `mix` defaults to `mix tui`.
///
/// Rules:
/// - `mix`                       -> `mix tui`
/// - `mix --guide ...`           -> `mix tui --guide ...`
/// - `mix --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "estimate" | "reference");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
