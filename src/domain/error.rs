use serde::{Deserialize, Serialize};
use std::fmt;

/// Reasons a question document is rejected. Every variant aborts the whole import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportError {
    /// Fewer than two non-blank lines (header plus one data row).
    EmptyDocument,
    MissingColumns {
        missing: Vec<String>,
        expected: Vec<String>,
    },
    InvalidQuestionType {
        raw_type: String,
        /// 1-based line number among non-blank lines, header is line 1.
        row: usize,
        mapped_type: String,
        valid_types: Vec<String>,
    },
    /// Every data row was too short to be read.
    NoQuestionsFound,
}

impl ImportError {
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::EmptyDocument => "empty_document",
            ImportError::MissingColumns { .. } => "missing_columns",
            ImportError::InvalidQuestionType { .. } => "invalid_question_type",
            ImportError::NoQuestionsFound => "no_questions_found",
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::EmptyDocument => write!(
                f,
                "CSV file must contain at least a header row and one data row"
            ),
            ImportError::MissingColumns { missing, expected } => write!(
                f,
                "Missing required columns: {}. Expected exact format: {}",
                missing.join(", "),
                expected.join(", ")
            ),
            ImportError::InvalidQuestionType {
                raw_type,
                row,
                mapped_type,
                valid_types,
            } => write!(
                f,
                "Invalid question type \"{}\" in row {}. Mapped to \"{}\". Supported types: {}",
                raw_type,
                row,
                mapped_type,
                valid_types.join(", ")
            ),
            ImportError::NoQuestionsFound => write!(f, "No valid questions found in CSV file"),
        }
    }
}

impl std::error::Error for ImportError {}

#[derive(Debug, Serialize, Deserialize)]
pub enum AppError {
    Import(ImportError),
    Internal(String),
    ValidationError(String),
    ConfigError(String),
    DatabaseError(String),
    UploadError {
        message: String,
        details: Option<String>,
    },
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Import errors are shown to operators as-is
            AppError::Import(err) => write!(f, "{}", err),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::UploadError { message, details } => match details {
                Some(details) => write!(f, "Upload Failed: {} Details: {}", message, details),
                None => write!(f, "Upload Failed: {}", message),
            },
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        AppError::Import(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
