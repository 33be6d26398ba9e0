//! Shared analysis pipeline logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> preview/statistics -> trend series -> regression
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::io::Read;
use std::path::Path;

use log::{info, warn};

use crate::domain::{AnalysisConfig, ColumnSummary, Table, TrendSeries};
use crate::error::AnalysisError;
use crate::fit::{RegressionOutput, fit_regression, resolve_columns};
use crate::io::ingest::{load_table, parse_table};

/// All computed outputs of a single analysis run.
///
/// The regression result is kept separately from the descriptive outputs: when
/// it fails, the preview, statistics and trend series are still shown.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    /// Display name of the input (file name).
    pub source: String,
    pub table: Table,
    pub preview: Table,
    pub statistics: Vec<ColumnSummary>,
    pub trend: Vec<TrendSeries>,
    pub regression: Result<RegressionOutput, AnalysisError>,
}

impl AnalysisRun {
    /// The regression error, if the regression stage did not complete.
    pub fn regression_error(&self) -> Option<&AnalysisError> {
        self.regression.as_ref().err()
    }
}

/// Load `path` and execute the full pipeline.
pub fn run_analysis(path: &Path, config: &AnalysisConfig) -> Result<AnalysisRun, AnalysisError> {
    let table = load_table(path)?;
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(analyze_table(source, table, config))
}

/// Execute the full pipeline on an in-memory byte stream.
pub fn run_analysis_from_reader<R: Read>(
    source: impl Into<String>,
    reader: R,
    config: &AnalysisConfig,
) -> Result<AnalysisRun, AnalysisError> {
    let table = parse_table(reader)?;
    Ok(analyze_table(source.into(), table, config))
}

/// Run every stage that consumes an already ingested table.
pub fn analyze_table(source: String, table: Table, config: &AnalysisConfig) -> AnalysisRun {
    // 1) Descriptive views.
    let preview = crate::stats::preview(&table, config.preview_rows);
    let statistics = crate::stats::describe(&table);

    // 2) Long form, grouped per entity for the trend chart.
    let trend = crate::trend::entity_series(&table);

    // 3) Regression on the original table.
    let regression = resolve_columns(
        &table,
        config.id_column.as_deref(),
        config.target_column.as_deref(),
    )
    .and_then(|(id, target)| fit_regression(&table, &id, &target, &config.regression));

    match &regression {
        Err(err) if err.is_regression_only() => info!("regression stage did not complete: {err}"),
        Err(err) => warn!("regression inputs rejected: {err}"),
        Ok(_) => {}
    }

    AnalysisRun {
        source,
        table,
        preview,
        statistics,
        trend,
        regression,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Provinsi,1993,1994,1995
Aceh,10,12,15
Bali,20,,26
Jambi,5,6,8
Riau,7,9,11
Papua,3,4,6
";

    #[test]
    fn small_table_keeps_descriptive_outputs_when_regression_fails() {
        let run = run_analysis_from_reader("prod.csv", CSV.as_bytes(), &AnalysisConfig::default()).unwrap();
        assert_eq!(run.preview.n_rows(), 5);
        assert_eq!(run.statistics[1].count, 4);
        assert_eq!(run.trend.len(), 5);
        assert!(matches!(run.regression_error(), Some(AnalysisError::InsufficientData(_))));
    }

    #[test]
    fn parse_errors_abort_the_run() {
        let err = run_analysis_from_reader("empty.csv", "".as_bytes(), &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[test]
    fn configured_target_must_exist() {
        let config = AnalysisConfig {
            target_column: Some("2015".to_string()),
            ..AnalysisConfig::default()
        };
        let run = run_analysis_from_reader("prod.csv", CSV.as_bytes(), &config).unwrap();
        assert!(matches!(run.regression_error(), Some(AnalysisError::Schema(_))));
    }
}
