//! Document service for HealthDocs.
//!
//! This module provides the high-level document operations:
//! - Upload with presence, type and size checks
//! - Listing and lookup
//! - Download as an open file
//! - Deletion of record and file


use futures::Stream;
use tokio::fs::File;
use tokio::io::AsyncRead;

use crate::db::Database;
use crate::{HealthDocsError, Result};

use super::metadata::{Document, DocumentRepository, NewDocument};
use super::storage::{read_chunks, DocumentStorage};
use super::{DEFAULT_MAX_FILE_SIZE, DOCUMENT_NOT_FOUND, PDF_CONTENT_TYPE, PDF_EXTENSION};

/// An uploaded file as received from the client.
#[derive(Debug)]
pub struct UploadedFile<R> {
    /// Client-supplied file name.
    pub filename: String,
    /// Declared size in bytes.
    pub size: u64,
    /// File content.
    pub content: R,
}

impl<R> UploadedFile<R> {
    /// Create a new uploaded file.
    pub fn new(filename: impl Into<String>, size: u64, content: R) -> Self {
        Self {
            filename: filename.into(),
            size,
            content,
        }
    }
}

/// A document ready to be sent to the client.
#[derive(Debug)]
pub struct DocumentDownload {
    /// Document metadata.
    pub document: Document,
    /// Open handle on the stored file.
    pub file: File,
    /// File length in bytes.
    pub length: u64,
}

impl DocumentDownload {
    /// Content type of the download.
    pub fn content_type(&self) -> &'static str {
        PDF_CONTENT_TYPE
    }

    /// File name offered to the client.
    pub fn filename(&self) -> &str {
        &self.document.filename
    }

    /// Convert into a stream of content chunks.
    pub fn into_stream(self) -> impl Stream<Item = std::io::Result<Vec<u8>>> + Send + 'static {
        read_chunks(self.file)
    }
}

/// Document service coordinating metadata and file storage.
pub struct DocumentService<'a> {
    db: &'a Database,
    storage: &'a DocumentStorage,
    max_file_size: u64,
}

impl<'a> DocumentService<'a> {
    /// Create a new DocumentService.
    pub fn new(db: &'a Database, storage: &'a DocumentStorage) -> Self {
        Self {
            db,
            storage,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Create a new DocumentService with a custom max file size.
    pub fn with_max_file_size(mut self, max_size: u64) -> Self {
        self.max_file_size = max_size;
        self
    }

    /// Get the configured max file size.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    fn repo(&self) -> DocumentRepository<'_> {
        DocumentRepository::new(self.db.pool())
    }

    /// Validate an upload before anything is written.
    ///
    /// Checks run in order: presence, PDF extension, size. A size exactly at
    /// the limit is accepted.
    ///
    /// # Returns
    ///
    /// The file name with any directory components removed.
    pub fn validate(&self, filename: Option<&str>, size: u64) -> Result<String> {
        let filename = filename
            .map(DocumentStorage::base_name)
            .filter(|name| !name.trim().is_empty())
            .ok_or(HealthDocsError::MissingFile)?;

        if !has_pdf_extension(filename) {
            return Err(HealthDocsError::InvalidFileType);
        }

        if size > self.max_file_size {
            return Err(HealthDocsError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(filename.to_string())
    }

    /// Upload a document.
    ///
    /// The content is written under a collision-free name, then the record
    /// is created. If the record cannot be created the written file is
    /// removed again.
    ///
    /// # Returns
    ///
    /// The created document record.
    pub async fn upload<R>(&self, file: Option<UploadedFile<R>>) -> Result<Document>
    where
        R: AsyncRead + Unpin,
    {
        let Some(mut file) = file else {
            return Err(HealthDocsError::MissingFile);
        };

        let filename = self.validate(Some(file.filename.as_str()), file.size)?;

        let (path, written) = self
            .storage
            .write_stream(&filename, &mut file.content)
            .await?;
        let filepath = path.to_string_lossy().into_owned();

        let new_document = NewDocument::new(&filename, &filepath, written as i64);
        match self.repo().create(&new_document).await {
            Ok(document) => {
                tracing::info!(
                    document_id = document.id,
                    filename = %document.filename,
                    filepath = %document.filepath,
                    filesize = document.filesize,
                    "Document uploaded"
                );
                Ok(document)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.remove(&path).await {
                    tracing::warn!(
                        filepath = %filepath,
                        error = %cleanup,
                        "Failed to remove orphaned upload"
                    );
                }
                Err(e)
            }
        }
    }

    /// List all documents, newest first.
    pub async fn list(&self) -> Result<Vec<Document>> {
        self.repo().list_all().await
    }

    /// Get a document by ID.
    pub async fn get(&self, id: i64) -> Result<Document> {
        self.repo()
            .get_by_id(id)
            .await?
            .ok_or_else(|| HealthDocsError::NotFound(DOCUMENT_NOT_FOUND.to_string()))
    }

    /// Open a document for download.
    ///
    /// Fails with not-found when either the record or its backing file is
    /// missing; the error message tells the two apart.
    pub async fn download(&self, id: i64) -> Result<DocumentDownload> {
        let document = self.get(id).await?;

        let (file, length) = match self.storage.open(&document.filepath).await {
            Ok(opened) => opened,
            Err(e) => {
                if matches!(e, HealthDocsError::NotFound(_)) {
                    tracing::warn!(
                        document_id = document.id,
                        filepath = %document.filepath,
                        "Document file missing on disk"
                    );
                }
                return Err(e);
            }
        };

        Ok(DocumentDownload {
            document,
            file,
            length,
        })
    }

    /// Delete a document and its file.
    ///
    /// A backing file that is already gone does not block deletion of the
    /// record.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let document = self.get(id).await?;

        if !self.storage.remove(&document.filepath).await? {
            tracing::warn!(
                document_id = document.id,
                filepath = %document.filepath,
                "Document file already missing"
            );
        }

        self.repo().delete(id).await?;

        tracing::info!(document_id = id, filename = %document.filename, "Document deleted");
        Ok(())
    }
}

/// Check whether the last extension of `filename` is `pdf`, ignoring case.
fn has_pdf_extension(filename: &str) -> bool {
    // Leading dots belong to the stem, so "..pdf" has no extension.
    filename
        .trim_start_matches('.')
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(PDF_EXTENSION))
}
