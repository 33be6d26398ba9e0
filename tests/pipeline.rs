//! End-to-end runs of the analysis pipeline through the public library API.

use approx::{assert_abs_diff_eq, assert_relative_eq};

use prod_trend::app::pipeline::{AnalysisRun, run_analysis, run_analysis_from_reader};
use prod_trend::domain::{AnalysisConfig, RegressionConfig};
use prod_trend::error::AnalysisError;
use prod_trend::io::write_predictions;

/// 12 provinces, target year is exactly `2*1994 + 0.5*1993 + 3`.
fn exact_csv() -> String {
    let mut csv = String::from("Provinsi,1993,1994,1995\n");
    let rows = [
        (10.0, 4.0),
        (12.0, 9.0),
        (7.0, 3.0),
        (20.0, 1.0),
        (15.0, 15.0),
        (3.0, 8.0),
        (9.0, 12.0),
        (11.0, 2.0),
        (18.0, 7.0),
        (5.0, 5.0),
        (14.0, 11.0),
        (6.0, 13.0),
    ];
    for (i, (a, b)) in rows.iter().enumerate() {
        let target = 2.0 * b + 0.5 * a + 3.0;
        csv.push_str(&format!("P{i},{a},{b},{target}\n"));
    }
    csv
}

fn analyze(csv: &str, config: &AnalysisConfig) -> AnalysisRun {
    run_analysis_from_reader("produksi.csv", csv.as_bytes(), config).unwrap()
}

#[test]
fn small_table_keeps_descriptive_outputs_and_rejects_regression() {
    let csv = "\
Provinsi,1993,1994,1995
Aceh,10,12,15
Bali,20,,26
Jambi,5,6,8
Riau,7,9,11
Papua,3,4,6
";
    let run = analyze(csv, &AnalysisConfig::default());

    assert_eq!(run.table.n_rows(), 5);
    assert_eq!(run.statistics[0].count, 5);
    assert_eq!(run.statistics[1].count, 4);
    assert_eq!(run.trend.len(), 5);
    assert!(matches!(
        run.regression,
        Err(AnalysisError::InsufficientData(_))
    ));
}

#[test]
fn exact_linear_relation_is_recovered() {
    let run = analyze(&exact_csv(), &AnalysisConfig::default());
    let output = run.regression.as_ref().unwrap();

    assert_eq!(output.target, "1995");
    assert_eq!(output.model.features(), ["1993", "1994"]);
    assert_relative_eq!(output.model.weights()[0], 0.5, epsilon = 1e-9);
    assert_relative_eq!(output.model.weights()[1], 2.0, epsilon = 1e-9);
    assert_relative_eq!(output.model.intercept(), 3.0, epsilon = 1e-8);
    assert_abs_diff_eq!(output.metrics.mse, 0.0, epsilon = 1e-12);
    assert_relative_eq!(output.metrics.r2, 1.0, epsilon = 1e-9);

    // ceil(0.2 * 12) = 3 held-out rows.
    assert_eq!(output.split.test.len(), 3);
    assert_eq!(output.split.train.len(), 9);
}

#[test]
fn same_input_twice_gives_identical_runs() {
    let mut csv = exact_csv();
    csv.push_str("P12,8,,30\n");
    let config = AnalysisConfig::default();

    let a = analyze(&csv, &config);
    let b = analyze(&csv, &config);

    assert_eq!(a.preview, b.preview);
    assert_eq!(a.statistics, b.statistics);
    assert_eq!(a.regression, b.regression);
    let (ra, rb) = (a.regression.unwrap(), b.regression.unwrap());
    assert_eq!(ra.metrics.mse.to_bits(), rb.metrics.mse.to_bits());
    assert_eq!(ra.metrics.r2.to_bits(), rb.metrics.r2.to_bits());
}

#[test]
fn seed_controls_the_split() {
    let mut config = AnalysisConfig::default();
    let a = analyze(&exact_csv(), &config);
    config.regression = RegressionConfig {
        seed: 7,
        ..config.regression
    };
    let b = analyze(&exact_csv(), &config);

    let (sa, sb) = (
        &a.regression.as_ref().unwrap().split,
        &b.regression.as_ref().unwrap().split,
    );
    assert_eq!(sa.test.len(), sb.test.len());
    assert_ne!(sa, sb);
}

#[test]
fn noisy_fit_scores_r2_at_most_one_and_imputes_by_median() {
    let csv = "\
Provinsi,1993,1994,1995
A,1,2,5
B,2,,6
C,3,5,11
D,4,3,9
E,5,8,14
F,6,6,15
G,7,9,17
H,8,,20
I,9,10,22
J,10,12,23
";
    let run = analyze(csv, &AnalysisConfig::default());
    let output = run.regression.as_ref().unwrap();

    assert!(output.metrics.r2 <= 1.0);
    assert!(output.metrics.mse >= 0.0);

    // 1994 present values: 2,5,3,8,6,9,10,12 -> median 7.
    let note = output.imputation.iter().find(|n| n.column == "1994").unwrap();
    assert_relative_eq!(note.median, 7.0);
    assert_eq!(note.filled, 2);
    assert_eq!(output.actual.len(), output.predicted.len());
    assert_eq!(output.test_entities.len(), output.actual.len());
}

#[test]
fn predictions_export_matches_held_out_rows() {
    let run = analyze(&exact_csv(), &AnalysisConfig::default());
    let output = run.regression.as_ref().unwrap();

    let mut buf = Vec::new();
    write_predictions(&mut buf, output).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "entity,actual,predicted,residual");
    assert_eq!(lines.len(), 1 + output.actual.len());
    for (line, entity) in lines[1..].iter().zip(&output.test_entities) {
        assert!(line.starts_with(&format!("{entity},")), "{line}");
    }
}

#[test]
fn malformed_input_is_a_parse_error() {
    let err = run_analysis_from_reader("x.csv", "".as_bytes(), &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::Parse(_)));

    let err = run_analysis(
        std::path::Path::new("no/such/produksi.csv"),
        &AnalysisConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, AnalysisError::Parse(_)));
}
