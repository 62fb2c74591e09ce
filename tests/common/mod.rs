//! Test helpers for HTTP API tests.
//!
//! Provides a TestServer over the document router backed by an in-memory
//! database and a temporary media root.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use tempfile::TempDir;

use healthdocs::web::handlers::AppState;
use healthdocs::web::router::{create_health_router, create_router};
use healthdocs::{Database, DocumentStorage};

/// A minimal PDF body.
pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\ntrailer\n<<>>\n%%EOF\n";

/// Test server plus the resources backing it.
pub struct TestApp {
    /// The HTTP test server.
    pub server: TestServer,
    /// Database shared with the server.
    pub db: Database,
    /// Storage shared with the server.
    pub storage: DocumentStorage,
    /// Keeps the media root alive for the test.
    pub media_root: TempDir,
}

/// Create a test app with the default upload limit.
pub async fn create_test_app() -> TestApp {
    create_test_app_with_limit(10 * 1024 * 1024).await
}

/// Create a test app with a custom upload limit.
pub async fn create_test_app_with_limit(max_upload_size: u64) -> TestApp {
    let media_root = TempDir::new().expect("Failed to create media root");
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let storage = DocumentStorage::new(media_root.path()).expect("Failed to create storage");

    let app_state = Arc::new(
        AppState::new(db.clone(), storage.clone()).with_max_upload_size(max_upload_size),
    );

    let router = create_router(app_state, &[]).merge(create_health_router());
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        db,
        storage,
        media_root,
    }
}

/// Build a multipart form carrying one file in the `file` field.
pub fn file_form(filename: &str, content: impl Into<Vec<u8>>) -> MultipartForm {
    let part = Part::bytes(content.into())
        .file_name(filename.to_string())
        .mime_type("application/pdf");
    MultipartForm::new().add_part("file", part)
}
