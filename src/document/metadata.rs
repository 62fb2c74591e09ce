//! Document metadata types and repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::{HealthDocsError, Result};

/// Timestamp layout for `created_at`.
///
/// Fixed-width UTC with microseconds, so string order is time order.
const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Metadata for a stored document.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Document {
    /// Unique document ID.
    pub id: i64,
    /// Original filename as uploaded.
    pub filename: String,
    /// Path of the stored file on disk.
    pub filepath: String,
    /// File size in bytes.
    pub filesize: i64,
    /// When the document was uploaded.
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new document record.
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Original filename as uploaded.
    pub filename: String,
    /// Path of the stored file on disk.
    pub filepath: String,
    /// File size in bytes.
    pub filesize: i64,
}

impl NewDocument {
    /// Create a new NewDocument.
    pub fn new(filename: impl Into<String>, filepath: impl Into<String>, filesize: i64) -> Self {
        Self {
            filename: filename.into(),
            filepath: filepath.into(),
            filesize,
        }
    }
}

/// Repository for document metadata.
///
/// Records are immutable once created; there is no update operation.
pub struct DocumentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DocumentRepository<'a> {
    /// Create a new DocumentRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new document record, stamping `created_at` with the current time.
    pub async fn create(&self, document: &NewDocument) -> Result<Document> {
        let created_at = Utc::now().format(CREATED_AT_FORMAT).to_string();

        let result = sqlx::query(
            "INSERT INTO documents (filename, filepath, filesize, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&document.filename)
        .bind(&document.filepath)
        .bind(document.filesize)
        .bind(&created_at)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| HealthDocsError::NotFound(crate::document::DOCUMENT_NOT_FOUND.to_string()))
    }

    /// Get a document by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            "SELECT id, filename, filepath, filesize, created_at
             FROM documents WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(document)
    }

    /// List all documents, newest first.
    pub async fn list_all(&self) -> Result<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT id, filename, filepath, filesize, created_at
             FROM documents ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(documents)
    }

    /// Delete a document record by ID.
    ///
    /// Returns true if a record was deleted, false if not found. The backing
    /// file is not touched.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_document() {
        let db = setup_db().await;
        let repo = DocumentRepository::new(db.pool());

        let before = Utc::now();
        let doc = repo
            .create(&NewDocument::new("scan.pdf", "uploads/documents/scan.pdf", 2048))
            .await
            .unwrap();

        assert_eq!(doc.id, 1);
        assert_eq!(doc.filename, "scan.pdf");
        assert_eq!(doc.filepath, "uploads/documents/scan.pdf");
        assert_eq!(doc.filesize, 2048);
        // Stored at microsecond precision
        assert!(doc.created_at >= before - chrono::Duration::milliseconds(1));
        assert!(doc.created_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = setup_db().await;
        let repo = DocumentRepository::new(db.pool());

        let created = repo
            .create(&NewDocument::new("a.pdf", "docs/a.pdf", 1))
            .await
            .unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = setup_db().await;
        let repo = DocumentRepository::new(db.pool());

        assert!(repo.get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let db = setup_db().await;
        let repo = DocumentRepository::new(db.pool());

        let first = repo.create(&NewDocument::new("1.pdf", "d/1.pdf", 1)).await.unwrap();
        let second = repo.create(&NewDocument::new("2.pdf", "d/2.pdf", 2)).await.unwrap();
        let third = repo.create(&NewDocument::new("3.pdf", "d/3.pdf", 3)).await.unwrap();

        let docs = repo.list_all().await.unwrap();
        let ids: Vec<i64> = docs.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn test_list_all_orders_by_timestamp_not_id() {
        let db = setup_db().await;
        let repo = DocumentRepository::new(db.pool());

        // Rows inserted out of chronological order
        for (name, created_at) in [
            ("middle.pdf", "2024-01-02T00:00:00.000000Z"),
            ("newest.pdf", "2024-01-03T00:00:00.000000Z"),
            ("oldest.pdf", "2024-01-01T00:00:00.000000Z"),
        ] {
            sqlx::query(
                "INSERT INTO documents (filename, filepath, filesize, created_at) VALUES (?, ?, 0, ?)",
            )
            .bind(name)
            .bind(format!("d/{name}"))
            .bind(created_at)
            .execute(db.pool())
            .await
            .unwrap();
        }

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.filename)
            .collect();
        assert_eq!(names, vec!["newest.pdf", "middle.pdf", "oldest.pdf"]);
    }

    #[tokio::test]
    async fn test_list_all_empty() {
        let db = setup_db().await;
        let repo = DocumentRepository::new(db.pool());

        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = setup_db().await;
        let repo = DocumentRepository::new(db.pool());

        let doc = repo.create(&NewDocument::new("a.pdf", "d/a.pdf", 1)).await.unwrap();

        assert!(repo.delete(doc.id).await.unwrap());
        assert!(repo.get_by_id(doc.id).await.unwrap().is_none());
        // Second delete finds nothing
        assert!(!repo.delete(doc.id).await.unwrap());
    }

    #[test]
    fn test_created_at_format_sorts_lexically() {
        let earlier = DateTime::parse_from_rfc3339("2024-05-01T09:59:59.999999Z")
            .unwrap()
            .with_timezone(&Utc)
            .format(CREATED_AT_FORMAT)
            .to_string();
        let later = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
            .format(CREATED_AT_FORMAT)
            .to_string();

        assert_eq!(later, "2024-05-01T10:00:00.000000Z");
        assert!(earlier < later);
    }
}
