//! Machine-readable run report.

use serde::Serialize;

use crate::app::pipeline::AnalysisRun;
use crate::domain::{ColumnSummary, Table};
use crate::error::AppError;
use crate::fit::RegressionOutput;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    tool: &'static str,
    source: &'a str,
    rows: usize,
    columns: usize,
    preview: &'a Table,
    statistics: &'a [ColumnSummary],
    #[serde(skip_serializing_if = "Option::is_none")]
    regression: Option<&'a RegressionOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    regression_error: Option<String>,
}

/// Serialize the run as pretty-printed JSON.
pub fn render_json(run: &AnalysisRun) -> Result<String, AppError> {
    let report = JsonReport {
        tool: "ptrend",
        source: &run.source,
        rows: run.table.n_rows(),
        columns: run.table.n_columns(),
        preview: &run.preview,
        statistics: &run.statistics,
        regression: run.regression.as_ref().ok(),
        regression_error: run.regression_error().map(|e| e.to_string()),
    };
    serde_json::to_string_pretty(&report)
        .map_err(|e| AppError::new(4, format!("Failed to serialize JSON report: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_analysis_from_reader;
    use crate::domain::AnalysisConfig;

    #[test]
    fn failed_regression_is_reported_as_error() {
        let csv = "Provinsi,1993,1994\nA,1,2\nB,2,4\n";
        let run = run_analysis_from_reader("p.csv", csv.as_bytes(), &AnalysisConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&render_json(&run).unwrap()).unwrap();

        assert_eq!(value["tool"], "ptrend");
        assert_eq!(value["rows"], 2);
        assert_eq!(value["statistics"][0]["count"], 2);
        assert!(value.get("regression").is_none());
        assert!(value["regression_error"].as_str().unwrap().starts_with("Not enough data"));
    }

    #[test]
    fn missing_cells_serialize_as_null() {
        let csv = "Provinsi,1993,1994\nA,,2\n";
        let run = run_analysis_from_reader("p.csv", csv.as_bytes(), &AnalysisConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&render_json(&run).unwrap()).unwrap();
        assert!(value["preview"]["columns"][0]["values"][0].is_null());
    }
}
