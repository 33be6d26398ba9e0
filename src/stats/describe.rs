//! Data preview and per-column descriptive statistics.

use log::debug;

use crate::domain::{ColumnSummary, NumericColumn, Table};
use crate::math::{quantile_sorted, sorted_copy};

/// First `n` rows of the table.
pub fn preview(table: &Table, n: usize) -> Table {
    table.head(n)
}

/// Describe every numeric column, in column order.
pub fn describe(table: &Table) -> Vec<ColumnSummary> {
    let out: Vec<ColumnSummary> = table.columns().iter().map(describe_column).collect();
    debug!("described {} column(s)", out.len());
    out
}

/// Count, mean, sample std, min, quartiles and max of the non-missing values.
pub fn describe_column(column: &NumericColumn) -> ColumnSummary {
    let sorted = sorted_copy(column.present());
    let count = sorted.len();

    let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
    let std = match mean {
        Some(m) if count > 1 => {
            let ss: f64 = sorted.iter().map(|v| (v - m) * (v - m)).sum();
            Some((ss / (count as f64 - 1.0)).sqrt())
        }
        _ => None,
    };

    ColumnSummary {
        name: column.name.clone(),
        count,
        mean,
        std,
        min: sorted.first().copied(),
        q25: quantile_sorted(&sorted, 0.25),
        q50: quantile_sorted(&sorted, 0.5),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}
