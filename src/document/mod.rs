//! Document management module for HealthDocs.
//!
//! This module provides PDF upload/download functionality:
//! - Document metadata records in SQLite
//! - On-disk storage with collision-safe naming
//! - Upload validation (presence, PDF extension, size limit)

mod metadata;
mod service;
mod spool;
mod storage;

pub use metadata::{Document, DocumentRepository, NewDocument};
pub use service::{DocumentDownload, DocumentService, UploadedFile};
pub use spool::SpoolFile;
pub use storage::{read_chunks, DocumentStorage};

/// Default maximum upload size (10MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Subdirectory of the media root that holds document files.
pub const DOCUMENTS_DIR: &str = "documents";

/// Subdirectory of the media root that holds in-flight upload spools.
pub const SPOOL_DIR: &str = "tmp";

/// Size of the chunks used when copying document bytes.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Accepted file extension (compared case-insensitively).
pub const PDF_EXTENSION: &str = "pdf";

/// Content type served for downloads.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Message for a missing document record.
pub const DOCUMENT_NOT_FOUND: &str = "Document not found";

/// Message for a record whose backing file is gone.
pub const FILE_NOT_FOUND: &str = "File not found on server";

/// Format a byte count in human-readable form (e.g. `"1.50 MB"`).
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} TB")
}
