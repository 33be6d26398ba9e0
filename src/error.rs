use thiserror::Error;

/// Failures of the analysis pipeline itself.
///
/// `Parse` and `Schema` stop a run before anything is computed.
/// `InsufficientData` and `DegenerateFeature` only affect the regression stage:
/// the preview, statistics and trend series are still valid when they occur.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Failed to parse input: {0}")]
    Parse(String),
    #[error("Invalid table layout: {0}")]
    Schema(String),
    #[error("Not enough data for regression: {0}")]
    InsufficientData(String),
    #[error("Features carry no information: {0}")]
    DegenerateFeature(String),
}

impl AnalysisError {
    /// Process exit code used when this error ends a CLI run.
    pub fn exit_code(&self) -> u8 {
        match self {
            AnalysisError::Parse(_) | AnalysisError::Schema(_) => 2,
            AnalysisError::InsufficientData(_) | AnalysisError::DegenerateFeature(_) => 3,
        }
    }

    /// True for errors that leave the descriptive outputs usable.
    pub fn is_regression_only(&self) -> bool {
        matches!(
            self,
            AnalysisError::InsufficientData(_) | AnalysisError::DegenerateFeature(_)
        )
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_errors_map_to_exit_codes() {
        let app: AppError = AnalysisError::Schema("missing `2015`".to_string()).into();
        assert_eq!(app.exit_code(), 2);
        assert_eq!(app.to_string(), "Invalid table layout: missing `2015`");

        let app: AppError = AnalysisError::InsufficientData("1 held-out row".to_string()).into();
        assert_eq!(app.exit_code(), 3);
    }

    #[test]
    fn only_regression_errors_keep_descriptive_outputs() {
        assert!(AnalysisError::DegenerateFeature(String::new()).is_regression_only());
        assert!(!AnalysisError::Parse(String::new()).is_regression_only());
    }
}
