//! Error types for HealthDocs.

use thiserror::Error;

use crate::document::format_size;

/// Common error type for HealthDocs.
#[derive(Error, Debug)]
pub enum HealthDocsError {
    /// The upload carried no file payload.
    #[error("No file provided")]
    MissingFile,

    /// The uploaded file is not a PDF.
    #[error("Only PDF files are allowed")]
    InvalidFileType,

    /// The uploaded file exceeds the size limit.
    #[error("File size must not exceed {} (got {})", format_size(*.max), format_size(*.size))]
    FileTooLarge {
        /// Actual size of the uploaded file in bytes.
        size: u64,
        /// Configured limit in bytes.
        max: u64,
    },

    /// Document record or backing file not found.
    ///
    /// The message distinguishes the two cases.
    #[error("{0}")]
    NotFound(String),

    /// Database error.
    ///
    /// Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl HealthDocsError {
    /// Whether this error was caused by the client's upload rather than the server.
    pub fn is_upload_rejection(&self) -> bool {
        matches!(
            self,
            HealthDocsError::MissingFile
                | HealthDocsError::InvalidFileType
                | HealthDocsError::FileTooLarge { .. }
        )
    }
}

// Conversion from sqlx errors
impl From<sqlx::Error> for HealthDocsError {
    fn from(e: sqlx::Error) -> Self {
        HealthDocsError::Database(e.to_string())
    }
}

/// Result type alias for HealthDocs operations.
pub type Result<T> = std::result::Result<T, HealthDocsError>;
