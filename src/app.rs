//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the input CSV (flag or interactive picker)
//! - runs the analysis pipeline
//! - prints reports/plots
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;
use log::debug;

use crate::cli::picker::{IDLE_PROMPT, prompt_for_csv_path};
use crate::cli::{AnalyzeArgs, Command};
use crate::domain::{AnalysisConfig, RegressionConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `ptrend` binary.
pub fn run() -> Result<(), AppError> {
    // We want `ptrend` and `ptrend -f data.csv` to behave like `ptrend tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args, OutputMode::Full),
        Command::Stats(args) => handle_analyze(args, OutputMode::StatsOnly),
        Command::Tui(args) => handle_tui(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    StatsOnly,
}

fn handle_analyze(args: AnalyzeArgs, mode: OutputMode) -> Result<(), AppError> {
    let mut config = config_from_args(&args)?;
    let Some(path) = resolve_input(config.input.take())? else {
        println!("{IDLE_PROMPT}");
        return Ok(());
    };
    debug!("analyzing {}", path.display());

    let run = pipeline::run_analysis(&path, &config)?;

    if config.json {
        println!("{}", crate::report::render_json(&run)?);
    } else {
        println!("{}", crate::report::format_banner(&run.source));
        println!("{}", crate::report::format_descriptive(&run));

        if config.plot {
            let years: Vec<String> = run.table.columns().iter().map(|c| c.name.clone()).collect();
            let plot = crate::plot::render_trend_plot(
                &run.trend,
                &years,
                &format!("Production trend {}", run.source),
                config.plot_width,
                config.plot_height,
            );
            println!("{plot}");
        }

        if mode == OutputMode::Full {
            match &run.regression {
                Ok(output) => {
                    println!("{}", crate::report::format_regression(output));
                    if config.plot {
                        let plot = crate::plot::render_scatter_plot(
                            &output.actual,
                            &output.predicted,
                            config.plot_width,
                            config.plot_height,
                        );
                        println!("{plot}");
                    }
                }
                Err(err) => eprintln!("Regression skipped: {err}"),
            }
        }
    }

    if mode == OutputMode::StatsOnly {
        return Ok(());
    }

    // Optional export.
    if let (Some(path), Ok(output)) = (&config.export_predictions, &run.regression) {
        crate::io::export::write_predictions_csv(path, output)?;
    }

    match run.regression {
        Ok(_) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn handle_tui(args: AnalyzeArgs) -> Result<(), AppError> {
    let mut config = config_from_args(&args)?;
    let Some(path) = resolve_input(config.input.take())? else {
        println!("{IDLE_PROMPT}");
        return Ok(());
    };
    crate::tui::run(path, config)
}

/// Use the explicit path when given, otherwise ask the picker.
fn resolve_input(input: Option<PathBuf>) -> Result<Option<PathBuf>, AppError> {
    match input {
        Some(path) if path.is_file() => Ok(Some(path)),
        Some(path) => Err(AppError::new(
            4,
            format!("CSV file not found: {}", path.display()),
        )),
        None => prompt_for_csv_path(),
    }
}

pub fn config_from_args(args: &AnalyzeArgs) -> Result<AnalysisConfig, AppError> {
    if !(args.test_fraction > 0.0 && args.test_fraction < 1.0) {
        return Err(AppError::new(
            2,
            format!("--test-fraction must be in (0, 1), got {}", args.test_fraction),
        ));
    }
    if args.preview_rows == 0 {
        return Err(AppError::new(2, "--preview-rows must be at least 1"));
    }

    Ok(AnalysisConfig {
        input: args.file.clone(),
        id_column: args.id_column.clone(),
        target_column: args.target.clone(),
        regression: RegressionConfig {
            test_fraction: args.test_fraction,
            seed: args.seed,
        },
        preview_rows: args.preview_rows,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_predictions: args.export.clone(),
        json: args.json,
    })
}

/// Rewrite argv so `ptrend` defaults to `ptrend tui`.
///
/// Rules:
/// - `ptrend`                      -> `ptrend tui`
/// - `ptrend -f data.csv ...`      -> `ptrend tui -f data.csv ...`
/// - `ptrend --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "stats" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn argv(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn args(v: &[&str]) -> AnalyzeArgs {
        match Cli::parse_from(v).command {
            Command::Analyze(a) | Command::Stats(a) | Command::Tui(a) => a,
        }
    }

    #[test]
    fn bare_invocation_and_leading_flags_mean_tui() {
        assert_eq!(rewrite_args(argv(&["ptrend"])), argv(&["ptrend", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["ptrend", "-f", "a.csv"])),
            argv(&["ptrend", "tui", "-f", "a.csv"])
        );
        assert_eq!(
            rewrite_args(argv(&["ptrend", "analyze", "-f", "a.csv"])),
            argv(&["ptrend", "analyze", "-f", "a.csv"])
        );
        assert_eq!(rewrite_args(argv(&["ptrend", "--help"])), argv(&["ptrend", "--help"]));
    }

    #[test]
    fn config_carries_cli_options() {
        let a = args(&[
            "ptrend", "analyze", "-f", "padi.csv", "--seed", "9", "--test-fraction", "0.3",
            "--no-plot", "--export", "out.csv",
        ]);
        let config = config_from_args(&a).unwrap();
        assert_eq!(config.input, Some(PathBuf::from("padi.csv")));
        assert_eq!(config.regression.seed, 9);
        assert_eq!(config.regression.test_fraction, 0.3);
        assert!(!config.plot);
        assert_eq!(config.export_predictions, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn out_of_range_options_are_rejected() {
        let err = config_from_args(&args(&["ptrend", "analyze", "--test-fraction", "1.0"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let err = config_from_args(&args(&["ptrend", "analyze", "--preview-rows", "0"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
