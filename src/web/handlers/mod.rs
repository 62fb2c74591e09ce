//! API handlers for the HTTP API.

pub mod document;

pub use document::*;

use crate::db::Database;
use crate::document::{DocumentService, DocumentStorage, DEFAULT_MAX_FILE_SIZE};

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database pool.
    pub db: Database,
    /// Document file storage.
    pub storage: DocumentStorage,
    /// Maximum accepted file size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state with the default upload limit.
    pub fn new(db: Database, storage: DocumentStorage) -> Self {
        Self {
            db,
            storage,
            max_upload_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set the upload limit.
    pub fn with_max_upload_size(mut self, max_upload_size: u64) -> Self {
        self.max_upload_size = max_upload_size;
        self
    }

    /// Build a document service over this state.
    pub fn document_service(&self) -> DocumentService<'_> {
        DocumentService::new(&self.db, &self.storage).with_max_file_size(self.max_upload_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_default_limit_matches_config() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open_in_memory().await.unwrap();
        let storage = DocumentStorage::new(temp_dir.path()).unwrap();

        let state = AppState::new(db, storage);
        assert_eq!(
            state.max_upload_size,
            Config::default().files.max_upload_size_bytes()
        );
    }
}
