use std::path::PathBuf;
use thiserror::Error;

/// Coarse grouping used to pick the message shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input on the form itself (empty path)
    Validation,
    /// Selected path is not a readable file
    FileNotFound,
    /// A required column is absent from the sheet
    MissingColumn,
    /// Anything else: corrupt input, bad numbers, write failures
    Generic,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no input file selected")]
    EmptyPath,

    #[error("file '{}' not found", path.display())]
    FileNotFound { path: PathBuf },

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("{0}")]
    Load(String),

    #[error("Sales value '{value}' in row {row} is not a number")]
    NonNumericSales { row: usize, value: String },

    #[error("failed to write '{}': {msg}", path.display())]
    Write { path: PathBuf, msg: String },
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::EmptyPath => ErrorCategory::Validation,
            ReportError::FileNotFound { .. } => ErrorCategory::FileNotFound,
            ReportError::MissingColumn(_) => ErrorCategory::MissingColumn,
            ReportError::Load(_)
            | ReportError::NonNumericSales { .. }
            | ReportError::Write { .. } => ErrorCategory::Generic,
        }
    }

    /// Message shown in the error dialog (and printed in headless mode)
    pub fn user_message(&self) -> String {
        match self {
            ReportError::EmptyPath => "Please select an Excel file.".to_string(),
            ReportError::FileNotFound { path } => {
                format!("File '{}' not found.", path.display())
            }
            ReportError::MissingColumn(name) => {
                format!("Missing column in Excel file: '{}'", name)
            }
            other => format!("Error: {}", other),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ReportError::Write {
            path: path.into(),
            msg: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
