//! Request DTOs for the HTTP API.

use utoipa::ToSchema;

/// Multipart form accepted by the upload endpoint.
///
/// Only used to describe the request body in the OpenAPI document; the
/// handler reads the multipart stream directly.
#[derive(Debug, ToSchema)]
pub struct UploadForm {
    /// The PDF file.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
