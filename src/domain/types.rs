//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between pipeline stages without copying the raw input
//! - rendered by any front-end (text report, TUI)
//! - dumped as a JSON report

use std::path::PathBuf;

use serde::Serialize;

use crate::error::AnalysisError;

/// Seed used for the train/test split unless overridden.
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of rows held out for evaluation unless overridden.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Number of rows shown in the data preview unless overridden.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// One numeric (per-year) column. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl NumericColumn {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Iterate over the non-missing values in row order.
    pub fn present(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v)
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

/// Wide table: one identifier column followed by one numeric column per year.
///
/// Every numeric column has exactly one cell per entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    id_name: String,
    entities: Vec<String>,
    columns: Vec<NumericColumn>,
}

impl Table {
    pub fn new(
        id_name: impl Into<String>,
        entities: Vec<String>,
        columns: Vec<NumericColumn>,
    ) -> Result<Self, AnalysisError> {
        let n_rows = entities.len();
        if let Some(bad) = columns.iter().find(|c| c.values.len() != n_rows) {
            return Err(AnalysisError::Schema(format!(
                "column `{}` has {} cells but the table has {n_rows} rows",
                bad.name,
                bad.values.len()
            )));
        }
        Ok(Self {
            id_name: id_name.into(),
            entities,
            columns,
        })
    }

    /// Header of the identifier column.
    pub fn id_name(&self) -> &str {
        &self.id_name
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Numeric columns in header order (identifier excluded).
    pub fn columns(&self) -> &[NumericColumn] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.entities.len()
    }

    /// Total column count, identifier included.
    pub fn n_columns(&self) -> usize {
        self.columns.len() + 1
    }

    pub fn column(&self, name: &str) -> Option<&NumericColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn last_column(&self) -> Option<&NumericColumn> {
        self.columns.last()
    }

    /// All headers, identifier first.
    pub fn headers(&self) -> Vec<&str> {
        std::iter::once(self.id_name.as_str())
            .chain(self.columns.iter().map(|c| c.name.as_str()))
            .collect()
    }

    /// First `n` rows as a new table (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> Table {
        let n = n.min(self.n_rows());
        Table {
            id_name: self.id_name.clone(),
            entities: self.entities[..n].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| NumericColumn::new(c.name.clone(), c.values[..n].to_vec()))
                .collect(),
        }
    }
}

/// One `(entity, year, value)` cell of the long form of a `Table`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LongRecord<'a> {
    pub entity: &'a str,
    pub year: &'a str,
    pub value: Option<f64>,
}

/// Values of one entity across all year columns, in column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub entity: String,
    pub points: Vec<(String, Option<f64>)>,
}

/// Descriptive statistics of one numeric column (missing values ignored).
///
/// Statistics that are undefined for the available values are `None`
/// (e.g. `std` with fewer than two values).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Held-out evaluation metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    pub mse: f64,
    pub r2: f64,
}

/// Row partition produced by the seeded splitter (indices into the table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Regression knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionConfig {
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub input: Option<PathBuf>,
    /// Identifier column to exclude from the features; defaults to the first header.
    pub id_column: Option<String>,
    /// Column to predict; defaults to the last header.
    pub target_column: Option<String>,
    pub regression: RegressionConfig,
    pub preview_rows: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_predictions: Option<PathBuf>,
    pub json: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input: None,
            id_column: None,
            target_column: None,
            regression: RegressionConfig::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            plot: true,
            plot_width: 100,
            plot_height: 25,
            export_predictions: None,
            json: false,
        }
    }
}
