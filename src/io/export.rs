//! Export held-out predictions to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::io::Write;
use std::path::Path;

use crate::error::AppError;
use crate::fit::RegressionOutput;

/// Write held-out predictions to a CSV file.
pub fn write_predictions_csv(path: &Path, output: &RegressionOutput) -> Result<(), AppError> {
    let file = std::fs::File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_predictions(file, output)
}

/// Write held-out predictions as CSV to any writer.
pub fn write_predictions<W: Write>(writer: W, output: &RegressionOutput) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["entity", "actual", "predicted", "residual"])
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    for ((entity, actual), predicted) in output
        .test_entities
        .iter()
        .zip(&output.actual)
        .zip(&output.predicted)
    {
        let row = [
            entity.clone(),
            actual.to_string(),
            predicted.to_string(),
            (actual - predicted).to_string(),
        ];
        wtr.write_record(&row)
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
