use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort report generation.
///
/// Statistical anomalies (too few samples, zero averages) are not errors:
/// they surface as undefined cells in the report and never reach this type.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Data source error in {source_name}: {reason}")]
    DataSource { source_name: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write report to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    pub fn data_source(source_name: impl Into<String>, reason: impl ToString) -> Self {
        ReportError::DataSource {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        ReportError::Config(reason.into())
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Write {
            path: path.into(),
            source,
        }
    }

    /// Whether the error is a structural failure of an input table.
    pub fn is_data_source(&self) -> bool {
        matches!(self, ReportError::DataSource { .. })
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
