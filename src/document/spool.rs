//! Temporary spool for incoming uploads.
//!
//! A multipart part's size is only known once it has been read in full, so
//! the HTTP layer writes the part here first. Bytes beyond the limit are
//! counted but dropped: the spool never holds more than `limit` bytes while
//! [`SpoolFile::size`] still reports the full size of the part.
//!
//! The spool file is removed when the [`SpoolFile`] is dropped, including
//! when an upload is abandoned midway.

use std::path::Path;

use tempfile::TempPath;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::Result;

/// A temporary file holding one incoming upload.
#[derive(Debug)]
pub struct SpoolFile {
    path: TempPath,
    file: Option<File>,
    size: u64,
    limit: u64,
}

impl SpoolFile {
    /// Create a new spool file in `dir` that stores at most `limit` bytes.
    pub async fn create(dir: &Path, limit: u64) -> Result<Self> {
        fs::create_dir_all(dir).await?;

        let path = dir.join(format!("{}.upload", Uuid::new_v4()));
        let file = File::create(&path).await?;

        Ok(Self {
            path: TempPath::from_path(path),
            file: Some(file),
            size: 0,
            limit,
        })
    }

    /// Append a chunk.
    ///
    /// Once the total passes the limit the spool stops storing data and only
    /// keeps counting.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.size += chunk.len() as u64;

        if self.size > self.limit {
            // Over the limit: the content will be rejected, so drop it.
            self.file = None;
            return Ok(());
        }

        if let Some(file) = self.file.as_mut() {
            file.write_all(chunk).await?;
        }
        Ok(())
    }

    /// Flush buffered data to disk.
    pub async fn finish(&mut self) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush().await?;
        }
        Ok(())
    }

    /// Total number of bytes received, including any that were dropped.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Path of the spool file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the spooled content for reading.
    pub async fn reader(&self) -> Result<File> {
        Ok(File::open(&*self.path).await?)
    }

    /// Remove the spool file, logging any failure.
    pub fn cleanup(self) {
        let Self { path, file, .. } = self;
        drop(file);

        let path_display = path.display().to_string();
        if let Err(e) = path.close() {
            tracing::error!("Failed to remove spool file {}: {}", path_display, e);
        }
    }
}
