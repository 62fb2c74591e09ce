//! Database schema and migrations for HealthDocs.
//!
//! Migrations are applied sequentially when the database is first opened
//! or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - documents table
    r#"
-- Document metadata; file content lives under {media_root}/documents
CREATE TABLE documents (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    filename    TEXT NOT NULL,           -- Original upload name
    filepath    TEXT NOT NULL,           -- Resolved path on disk
    filesize    INTEGER NOT NULL,        -- Bytes written
    created_at  TEXT NOT NULL            -- RFC 3339 UTC, microsecond precision
);

CREATE INDEX idx_documents_created_at ON documents(created_at);
"#,
];
