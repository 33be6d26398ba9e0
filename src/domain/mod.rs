//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the wide input table (`Table`, `NumericColumn`)
//! - derived views (`LongRecord`, `TrendSeries`, `ColumnSummary`)
//! - regression outputs (`Split`, `Metrics`) and run configuration

pub mod types;

pub use types::*;
