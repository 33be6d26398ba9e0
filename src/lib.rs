//! `prod-trend` library crate.
//!
//! The binary (`ptrend`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the CLI report and the TUI share one analysis pipeline
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod stats;
pub mod trend;
pub mod tui;
