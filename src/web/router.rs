//! Router configuration for the HTTP API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::dto::{DocumentResponse, UploadForm};
use super::error::ErrorBody;
use super::handlers::{
    self, delete_document, download_document, list_documents, upload_document, AppState,
};
use super::middleware::create_cors_layer;

/// OpenAPI document for the HTTP API.
#[derive(OpenApi)]
#[openapi(
    info(title = "HealthDocs API", description = "PDF document management"),
    paths(
        handlers::upload_document,
        handlers::list_documents,
        handlers::download_document,
        handlers::delete_document,
    ),
    components(schemas(DocumentResponse, ErrorBody, UploadForm)),
    tags((name = "documents", description = "Upload, list, download and delete PDFs"))
)]
pub struct ApiDoc;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let document_routes = Router::new()
        .route("/", get(list_documents))
        .route(
            "/upload",
            post(upload_document).layer(DefaultBodyLimit::disable()),
        )
        .route("/:id", get(download_document).delete(delete_document));

    Router::new()
        .nest("/documents", document_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create the Swagger UI and OpenAPI document router.
pub fn create_swagger_router() -> Router {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
