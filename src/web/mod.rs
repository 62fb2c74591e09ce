//! HTTP API for HealthDocs.
//!
//! This module exposes the document operations as a JSON/multipart REST API
//! for the separate frontend, plus a health check and OpenAPI document.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router, create_swagger_router};
pub use server::WebServer;
