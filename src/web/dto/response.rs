//! Response DTOs for the HTTP API.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::document::Document;

/// Document record as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    /// Document ID.
    #[schema(example = 1)]
    pub id: i64,
    /// Original file name.
    #[schema(example = "report.pdf")]
    pub filename: String,
    /// Path of the stored file.
    #[schema(example = "uploads/documents/report.pdf")]
    pub filepath: String,
    /// File size in bytes.
    #[schema(example = 48213)]
    pub filesize: i64,
    /// Upload time (RFC 3339, UTC).
    #[schema(example = "2024-05-01T10:00:00.000000Z")]
    pub created_at: String,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            id: document.id,
            filename: document.filename,
            filepath: document.filepath,
            filesize: document.filesize,
            created_at: document.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}
