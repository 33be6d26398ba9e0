//! Final-year regression: predict the target year from every earlier year.
//!
//! Steps:
//! 1. Validate the identifier/target columns against the table.
//! 2. Use every other numeric column as a feature; fill missing feature cells
//!    with the column median over all rows (before splitting).
//! 3. Drop rows whose target is missing.
//! 4. Split the remaining rows with the seeded splitter.
//! 5. Fit OLS on the training rows, predict the held-out rows, score them.
//!
//! Guardrails:
//! - both subsets need at least 2 rows (`InsufficientData`)
//! - at least one feature must vary across the rows (`DegenerateFeature`)

use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use crate::domain::{Metrics, RegressionConfig, Split, Table};
use crate::error::AnalysisError;
use crate::math::{evaluate, fit_ols, impute_median, train_test_split};
use crate::models::LinearModel;

/// Minimum number of rows in each of the train and held-out subsets.
pub const MIN_SUBSET_ROWS: usize = 2;

/// Median fill applied to one feature column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImputationNote {
    pub column: String,
    pub median: f64,
    pub filled: usize,
}

/// Everything produced by one regression run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionOutput {
    pub target: String,
    pub model: LinearModel,
    /// Table row indices used for training / evaluation.
    pub split: Split,
    /// Entity of each held-out row, aligned with `actual` and `predicted`.
    pub test_entities: Vec<String>,
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
    pub metrics: Metrics,
    pub imputation: Vec<ImputationNote>,
    /// Feature columns without any value (nothing to impute from).
    pub dropped_features: Vec<String>,
    /// Table rows excluded because their target value is missing.
    pub skipped_rows: Vec<usize>,
}

/// Feature matrix after imputation, one `Vec` per column over all table rows.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub names: Vec<String>,
    pub columns: Vec<Vec<f64>>,
    pub imputation: Vec<ImputationNote>,
    pub dropped: Vec<String>,
}

impl FeatureMatrix {
    fn row(&self, i: usize) -> Vec<f64> {
        self.columns.iter().map(|c| c[i]).collect()
    }

    fn design(&self, rows: &[usize]) -> DMatrix<f64> {
        DMatrix::from_fn(rows.len(), self.columns.len(), |i, j| self.columns[j][rows[i]])
    }
}

/// Resolve the identifier and target names, defaulting to the first and last headers.
pub fn resolve_columns(
    table: &Table,
    id_column: Option<&str>,
    target: Option<&str>,
) -> Result<(String, String), AnalysisError> {
    let id = id_column.unwrap_or(table.id_name()).to_string();
    let target = match target {
        Some(t) => t.to_string(),
        None => table
            .last_column()
            .map(|c| c.name.clone())
            .ok_or_else(|| AnalysisError::Schema("Table has no year columns.".to_string()))?,
    };
    Ok((id, target))
}

/// Partition the table into imputed features and the target column.
pub fn build_features(
    table: &Table,
    id_column: &str,
    target: &str,
) -> Result<(FeatureMatrix, Vec<Option<f64>>), AnalysisError> {
    if id_column != table.id_name() {
        return Err(AnalysisError::Schema(format!(
            "Missing identifier column `{id_column}` (first column is `{}`).",
            table.id_name()
        )));
    }
    if target == table.id_name() {
        return Err(AnalysisError::Schema(format!(
            "Identifier column `{target}` cannot be the regression target."
        )));
    }
    let target_values = table
        .column(target)
        .ok_or_else(|| AnalysisError::Schema(format!("Missing target column `{target}`.")))?
        .values
        .clone();

    let mut features = FeatureMatrix {
        names: Vec::new(),
        columns: Vec::new(),
        imputation: Vec::new(),
        dropped: Vec::new(),
    };

    for column in table.columns().iter().filter(|c| c.name != target) {
        match impute_median(&column.values) {
            Some(imputed) => {
                if imputed.filled > 0 {
                    debug!(
                        "imputed {} cell(s) of `{}` with median {}",
                        imputed.filled, column.name, imputed.median
                    );
                }
                features.imputation.push(ImputationNote {
                    column: column.name.clone(),
                    median: imputed.median,
                    filled: imputed.filled,
                });
                features.names.push(column.name.clone());
                features.columns.push(imputed.values);
            }
            None => {
                warn!("feature `{}` has no values; dropping it", column.name);
                features.dropped.push(column.name.clone());
            }
        }
    }

    Ok((features, target_values))
}

/// Run the full regression stage.
pub fn fit_regression(
    table: &Table,
    id_column: &str,
    target: &str,
    config: &RegressionConfig,
) -> Result<RegressionOutput, AnalysisError> {
    let (features, target_values) = build_features(table, id_column, target)?;

    // (table row, target value) for every row with a target.
    let mut usable: Vec<(usize, f64)> = Vec::with_capacity(target_values.len());
    let mut skipped_rows = Vec::new();
    for (i, v) in target_values.iter().enumerate() {
        match v {
            Some(y) => usable.push((i, *y)),
            None => skipped_rows.push(i),
        }
    }
    if !skipped_rows.is_empty() {
        warn!(
            "{} row(s) have no `{target}` value and are excluded from the regression",
            skipped_rows.len()
        );
    }
    if usable.len() < 2 * MIN_SUBSET_ROWS {
        return Err(AnalysisError::InsufficientData(format!(
            "{} usable row(s); training and held-out subsets need at least {MIN_SUBSET_ROWS} each.",
            usable.len()
        )));
    }

    let rows: Vec<usize> = usable.iter().map(|&(i, _)| i).collect();
    ensure_informative(&features, &rows)?;

    let positions = train_test_split(usable.len(), config.test_fraction, config.seed);
    let split = Split {
        train: positions.train.iter().map(|&p| usable[p].0).collect(),
        test: positions.test.iter().map(|&p| usable[p].0).collect(),
    };
    if split.train.len() < MIN_SUBSET_ROWS || split.test.len() < MIN_SUBSET_ROWS {
        return Err(AnalysisError::InsufficientData(format!(
            "{} usable row(s) split into {} training and {} held-out; each side needs at least {MIN_SUBSET_ROWS}.",
            usable.len(),
            split.train.len(),
            split.test.len()
        )));
    }
    info!(
        "regressing `{target}` on {} feature(s): {} train / {} held-out rows (seed {})",
        features.names.len(),
        split.train.len(),
        split.test.len(),
        config.seed
    );

    let x_train = features.design(&split.train);
    let y_train = DVector::from_iterator(
        positions.train.len(),
        positions.train.iter().map(|&p| usable[p].1),
    );

    let solution = fit_ols(&x_train, &y_train).ok_or_else(|| {
        AnalysisError::DegenerateFeature("least-squares solve did not produce finite weights".to_string())
    })?;
    let model = LinearModel::from_solution(features.names.clone(), solution);

    let actual: Vec<f64> = positions.test.iter().map(|&p| usable[p].1).collect();
    let predicted: Vec<f64> = split
        .test
        .iter()
        .map(|&i| model.predict(&features.row(i)))
        .collect();
    let metrics = evaluate(&actual, &predicted).ok_or_else(|| {
        AnalysisError::InsufficientData("no held-out rows to evaluate".to_string())
    })?;
    info!("held-out mse={:.6} r2={:.6}", metrics.mse, metrics.r2);

    let test_entities = split
        .test
        .iter()
        .map(|&i| table.entities()[i].clone())
        .collect();

    Ok(RegressionOutput {
        target: target.to_string(),
        model,
        split,
        test_entities,
        actual,
        predicted,
        metrics,
        imputation: features.imputation,
        dropped_features: features.dropped,
        skipped_rows,
    })
}

fn ensure_informative(features: &FeatureMatrix, rows: &[usize]) -> Result<(), AnalysisError> {
    if features.columns.is_empty() {
        return Err(AnalysisError::DegenerateFeature(
            "no feature column has any value".to_string(),
        ));
    }
    let varies = |col: &Vec<f64>| {
        let mut it = rows.iter().map(|&i| col[i]);
        match it.next() {
            Some(first) => it.any(|v| v != first),
            None => false,
        }
    };
    if !features.columns.iter().any(varies) {
        return Err(AnalysisError::DegenerateFeature(
            "every feature column is constant after imputation".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NumericColumn;

    /// `2015 = 1 + 2·1993 + 0.5·1994` for every row.
    fn linear_table(n: usize) -> Table {
        let entities = (0..n).map(|i| format!("P{i:02}")).collect();
        let a: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..n).map(|i| ((i * 7) % 5) as f64).collect();
        let y: Vec<f64> = a.iter().zip(&b).map(|(a, b)| 1.0 + 2.0 * a + 0.5 * b).collect();
        Table::new(
            "Provinsi",
            entities,
            vec![
                NumericColumn::new("1993", a.into_iter().map(Some).collect()),
                NumericColumn::new("1994", b.into_iter().map(Some).collect()),
                NumericColumn::new("2015", y.into_iter().map(Some).collect()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn recovers_exact_linear_relationship() {
        let table = linear_table(20);
        let out = fit_regression(&table, "Provinsi", "2015", &RegressionConfig::default()).unwrap();

        assert_eq!(out.split.test.len(), 4);
        assert_eq!(out.split.train.len(), 16);
        assert!((out.model.intercept() - 1.0).abs() < 1e-8);
        assert!((out.model.weights()[0] - 2.0).abs() < 1e-8);
        assert!((out.model.weights()[1] - 0.5).abs() < 1e-8);
        assert!(out.metrics.mse < 1e-12);
        assert!((out.metrics.r2 - 1.0).abs() < 1e-9);
        assert_eq!(out.test_entities.len(), out.actual.len());
    }

    #[test]
    fn split_is_reproducible() {
        let table = linear_table(30);
        let cfg = RegressionConfig::default();
        let a = fit_regression(&table, "Provinsi", "2015", &cfg).unwrap();
        let b = fit_regression(&table, "Provinsi", "2015", &cfg).unwrap();
        assert_eq!(a.split, b.split);
        assert_eq!(a, b);
    }

    #[test]
    fn missing_features_are_imputed_with_median() {
        let table = Table::new(
            "id",
            (0..6).map(|i| i.to_string()).collect(),
            vec![
                NumericColumn::new(
                    "1993",
                    vec![Some(1.0), None, Some(3.0), Some(10.0), Some(2.0), None],
                ),
                NumericColumn::new("1994", (0..6).map(|i| Some(i as f64)).collect()),
            ],
        )
        .unwrap();

        let (features, _) = build_features(&table, "id", "1994").unwrap();
        assert_eq!(features.names, vec!["1993".to_string()]);
        assert_eq!(features.columns[0], vec![1.0, 2.5, 3.0, 10.0, 2.0, 2.5]);
        assert_eq!(
            features.imputation,
            vec![ImputationNote { column: "1993".into(), median: 2.5, filled: 2 }]
        );
    }

    #[test]
    fn all_missing_feature_is_dropped() {
        let base = linear_table(12);
        let table = Table::new(
            "Provinsi",
            base.entities().to_vec(),
            std::iter::once(NumericColumn::new("1992", vec![None; 12]))
                .chain(base.columns().iter().cloned())
                .collect(),
        )
        .unwrap();

        let out = fit_regression(&table, "Provinsi", "2015", &RegressionConfig::default()).unwrap();
        assert_eq!(out.dropped_features, vec!["1992".to_string()]);
        assert_eq!(out.model.features(), &["1993".to_string(), "1994".to_string()]);
    }

    #[test]
    fn rows_without_target_are_skipped() {
        let base = linear_table(12);
        let mut columns = base.columns().to_vec();
        columns[2].values[3] = None;
        let table = Table::new("Provinsi", base.entities().to_vec(), columns).unwrap();

        let out = fit_regression(&table, "Provinsi", "2015", &RegressionConfig::default()).unwrap();
        assert_eq!(out.skipped_rows, vec![3]);
        assert!(!out.split.train.contains(&3) && !out.split.test.contains(&3));
        assert_eq!(out.split.train.len() + out.split.test.len(), 11);
    }

    #[test]
    fn single_held_out_row_is_insufficient() {
        let err = fit_regression(&linear_table(5), "Provinsi", "2015", &RegressionConfig::default())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData(_)), "{err:?}");
    }

    #[test]
    fn too_few_usable_rows_are_insufficient_not_degenerate() {
        use crate::io::ingest::parse_table;

        let inputs = [
            "Provinsi,1993,1994\n",
            "Provinsi,1993,1994\nAceh,1,2\n",
            "Provinsi,1993,1994\nA,1,\nB,2,\nC,3,\nD,4,\nE,5,\n",
        ];
        for csv in inputs {
            let table = parse_table(csv.as_bytes()).unwrap();
            let err = fit_regression(&table, "Provinsi", "1994", &RegressionConfig::default())
                .unwrap_err();
            assert!(matches!(err, AnalysisError::InsufficientData(_)), "{csv:?}: {err:?}");
        }
    }

    #[test]
    fn held_out_values_are_the_target_values_of_test_rows() {
        let table = linear_table(12);
        let out = fit_regression(&table, "Provinsi", "2015", &RegressionConfig::default()).unwrap();
        let target = table.column("2015").unwrap();
        let expected: Vec<f64> = out.split.test.iter().map(|&i| target.values[i].unwrap()).collect();
        assert_eq!(out.actual, expected);
    }

    #[test]
    fn constant_features_are_degenerate() {
        let table = Table::new(
            "id",
            (0..10).map(|i| i.to_string()).collect(),
            vec![
                NumericColumn::new("1993", vec![Some(4.0); 10]),
                NumericColumn::new("1994", (0..10).map(|i| Some(i as f64)).collect()),
            ],
        )
        .unwrap();
        let err = fit_regression(&table, "id", "1994", &RegressionConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateFeature(_)), "{err:?}");
    }

    #[test]
    fn unknown_columns_are_schema_errors() {
        let table = linear_table(10);
        let cfg = RegressionConfig::default();
        assert!(matches!(
            fit_regression(&table, "Region", "2015", &cfg).unwrap_err(),
            AnalysisError::Schema(_)
        ));
        assert!(matches!(
            fit_regression(&table, "Provinsi", "2016", &cfg).unwrap_err(),
            AnalysisError::Schema(_)
        ));
        assert!(matches!(
            fit_regression(&table, "Provinsi", "Provinsi", &cfg).unwrap_err(),
            AnalysisError::Schema(_)
        ));
    }

    #[test]
    fn defaults_resolve_to_first_and_last_headers() {
        let (id, target) = resolve_columns(&linear_table(3), None, None).unwrap();
        assert_eq!(id, "Provinsi");
        assert_eq!(target, "2015");
    }
}
