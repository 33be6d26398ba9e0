//! Command-line parsing for the production trend analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the statistics/regression code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_PREVIEW_ROWS, DEFAULT_SEED, DEFAULT_TEST_FRACTION};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "ptrend",
    version,
    about = "Regional production trends and final-year linear regression"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print preview, statistics, trend chart and regression results.
    Analyze(AnalyzeArgs),
    /// Print the data preview and descriptive statistics only.
    Stats(AnalyzeArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `ptrend analyze`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(AnalyzeArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    /// Input CSV (first column = entity, one column per year).
    ///
    /// When omitted, an interactive picker lists CSV files in the current directory.
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Identifier column to exclude from the features (default: first column).
    #[arg(long, value_name = "NAME")]
    pub id_column: Option<String>,

    /// Year column to predict (default: last column).
    #[arg(short = 't', long, value_name = "NAME")]
    pub target: Option<String>,

    /// Fraction of rows held out for evaluation.
    #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
    pub test_fraction: f64,

    /// Random seed for the train/test split.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of rows in the data preview.
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub preview_rows: usize,

    /// Disable the terminal charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export held-out predictions to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Print the run as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}
