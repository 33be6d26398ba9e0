//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::app::pipeline::AnalysisRun;
use crate::domain::{ColumnSummary, Table};
use crate::fit::RegressionOutput;

const ENTITY_WIDTH: usize = 24;
const CELL_WIDTH: usize = 12;

/// Title and one-paragraph description shown above every report.
pub fn format_banner(source: &str) -> String {
    let mut out = String::new();
    out.push_str("=== ptrend - Linear regression for production data ===\n");
    out.push_str(
        "Predicts the final year's production from every earlier year with an\n\
         ordinary least-squares model and reports its fit on held-out rows.\n",
    );
    out.push_str(&format!("Input: {source}\n"));
    out
}

/// Format the descriptive part of a run (preview + statistics).
pub fn format_descriptive(run: &AnalysisRun) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Table: {} rows x {} columns\n\n",
        run.table.n_rows(),
        run.table.n_columns()
    ));
    out.push_str(&format!("First {} rows:\n", run.preview.n_rows()));
    out.push_str(&format_preview(&run.preview));
    out.push('\n');
    out.push_str("Descriptive statistics:\n");
    out.push_str(&format_statistics(&run.statistics));
    out
}

/// Render a table with the identifier column first.
pub fn format_preview(table: &Table) -> String {
    let mut out = String::new();

    let mut header = format!("{:<ENTITY_WIDTH$}", truncate(table.id_name(), ENTITY_WIDTH));
    for column in table.columns() {
        header.push_str(&format!(" {:>CELL_WIDTH$}", truncate(&column.name, CELL_WIDTH)));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    let mut rule = "-".repeat(ENTITY_WIDTH);
    for _ in table.columns() {
        rule.push(' ');
        rule.push_str(&"-".repeat(CELL_WIDTH));
    }
    out.push_str(&rule);
    out.push('\n');

    for (row, entity) in table.entities().iter().enumerate() {
        let mut line = format!("{:<ENTITY_WIDTH$}", truncate(entity, ENTITY_WIDTH));
        for column in table.columns() {
            line.push_str(&format!(" {:>CELL_WIDTH$}", fmt_opt(column.values[row])));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

/// One line per column: count, mean, std, min, quartiles, max.
pub fn format_statistics(stats: &[ColumnSummary]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<10} {:>6} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}",
            "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!(
        "{:-<10} {:-<6} {:-<14} {:-<14} {:-<14} {:-<14} {:-<14} {:-<14} {:-<14}\n",
        "", "", "", "", "", "", "", "", ""
    ));

    for s in stats {
        out.push_str(
            format!(
                "{:<10} {:>6} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}",
                truncate(&s.name, 10),
                s.count,
                fmt_opt(s.mean),
                fmt_opt(s.std),
                fmt_opt(s.min),
                fmt_opt(s.q25),
                fmt_opt(s.q50),
                fmt_opt(s.q75),
                fmt_opt(s.max),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Metrics, fitted coefficients and held-out predictions.
pub fn format_regression(output: &RegressionOutput) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Regression: `{}` ~ {} feature(s) | train={} held-out={}\n",
        output.target,
        output.model.features().len(),
        output.split.train.len(),
        output.split.test.len(),
    ));
    out.push_str(&format!("Mean Squared Error: {}\n", output.metrics.mse));
    out.push_str(&format!("R² Score: {}\n", output.metrics.r2));

    out.push_str("\nModel:\n");
    out.push_str(&format!("- intercept: {:.6}\n", output.model.intercept()));
    for (name, weight) in output.model.coefficients() {
        out.push_str(&format!("- {name:<10} {weight:.6}\n"));
    }

    let filled: Vec<String> = output
        .imputation
        .iter()
        .filter(|n| n.filled > 0)
        .map(|n| format!("{} ({} cell(s) <- {:.2})", n.column, n.filled, n.median))
        .collect();
    if !filled.is_empty() {
        out.push_str(&format!("\nImputed with column median: {}\n", filled.join(", ")));
    }
    if !output.dropped_features.is_empty() {
        out.push_str(&format!(
            "Dropped empty feature column(s): {}\n",
            output.dropped_features.join(", ")
        ));
    }
    if !output.skipped_rows.is_empty() {
        out.push_str(&format!(
            "Skipped {} row(s) without a `{}` value\n",
            output.skipped_rows.len(),
            output.target
        ));
    }

    out.push_str("\nHeld-out predictions:\n");
    out.push_str(
        format!(
            "{:<ENTITY_WIDTH$} {:>14} {:>14} {:>14}",
            "entity", "actual", "predicted", "residual"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!(
        "{:-<ENTITY_WIDTH$} {:-<14} {:-<14} {:-<14}\n",
        "", "", "", ""
    ));
    for ((entity, actual), predicted) in output
        .test_entities
        .iter()
        .zip(&output.actual)
        .zip(&output.predicted)
    {
        out.push_str(&format!(
            "{:<ENTITY_WIDTH$} {:>14.2} {:>14.2} {:>14.2}\n",
            truncate(entity, ENTITY_WIDTH),
            actual,
            predicted,
            actual - predicted,
        ));
    }

    out
}

pub(crate) fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => "-".to_string(),
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
