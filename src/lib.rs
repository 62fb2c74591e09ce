//! HealthDocs - PDF document management backend
//!
//! Upload, list, download and delete PDF files over HTTP. Metadata lives in
//! SQLite; file content lives on disk under a configurable media root.

pub mod config;
pub mod db;
pub mod document;
pub mod error;
pub mod logging;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use document::{
    format_size, Document, DocumentDownload, DocumentRepository, DocumentService,
    DocumentStorage, NewDocument, UploadedFile,
};
pub use error::{HealthDocsError, Result};
