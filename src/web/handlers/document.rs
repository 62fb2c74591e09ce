//! Document handlers for the HTTP API.

use axum::{
    body::Body,
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        rejection::PathRejection,
        Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::path::Path as FsPath;
use std::sync::Arc;

use crate::document::{SpoolFile, UploadedFile, DOCUMENT_NOT_FOUND};
use crate::web::dto::DocumentResponse;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::HealthDocsError;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// Generate a safe Content-Disposition header value for downloads.
///
/// Control characters are dropped and quotes/backslashes replaced in the
/// plain `filename` parameter. Names that needed sanitizing or are not
/// ASCII are also sent as an RFC 5987 `filename*` parameter.
fn content_disposition_header(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && sanitized == filename {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// Map a path rejection (e.g. a non-numeric id) to a not-found error.
fn document_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            tracing::debug!("Rejected document id: {}", rejection);
            Err(ApiError::not_found(DOCUMENT_NOT_FOUND))
        }
    }
}

/// Map a multipart read error to an API error.
fn multipart_error(e: MultipartError) -> ApiError {
    tracing::warn!("Failed to read multipart data: {}", e);
    ApiError::bad_request("Invalid multipart data")
}

/// Spool one multipart field to disk.
///
/// The spool is removed again if reading the field fails. The request body
/// is not size-limited; only the first `limit` bytes of the part are kept.
async fn spool_field(
    mut field: Field<'_>,
    dir: &FsPath,
    limit: u64,
) -> Result<SpoolFile, ApiError> {
    let mut spool = SpoolFile::create(dir, limit).await?;

    let result = async {
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            spool.write_chunk(&chunk).await?;
        }
        spool.finish().await?;
        Ok::<(), ApiError>(())
    }
    .await;

    match result {
        Ok(()) => Ok(spool),
        Err(e) => {
            spool.cleanup();
            Err(e)
        }
    }
}

/// Read the multipart stream, spooling the first `file` part.
///
/// Parts without a file name are not files and are skipped.
async fn receive_upload(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<Option<(String, SpoolFile)>, ApiError> {
    let mut received: Option<(String, SpoolFile)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                if let Some((_, spool)) = received.take() {
                    spool.cleanup();
                }
                return Err(multipart_error(e));
            }
        };

        if received.is_some() || field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let spool = spool_field(field, state.storage.spool_dir(), state.max_upload_size).await?;
        received = Some((filename, spool));
    }

    Ok(received)
}

/// POST /documents/upload - Upload a PDF.
///
/// Request body: multipart/form-data with a "file" field.
#[utoipa::path(
    post,
    path = "/documents/upload",
    tag = "documents",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document uploaded", body = DocumentResponse),
        (status = 400, description = "Missing file, not a PDF, or file too large", body = ErrorBody)
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<DocumentResponse>), ApiError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!("Upload without multipart body: {}", rejection);
            return Err(HealthDocsError::MissingFile.into());
        }
    };

    let Some((filename, spool)) = receive_upload(&state, &mut multipart).await? else {
        return Err(HealthDocsError::MissingFile.into());
    };

    let service = state.document_service();
    let result = async {
        service.validate(Some(filename.as_str()), spool.size())?;
        let reader = spool.reader().await?;
        service
            .upload(Some(UploadedFile::new(&filename, spool.size(), reader)))
            .await
    }
    .await;

    spool.cleanup();

    let document = result?;
    Ok((StatusCode::CREATED, Json(document.into())))
}

/// GET /documents - List all documents, newest first.
#[utoipa::path(
    get,
    path = "/documents",
    tag = "documents",
    responses(
        (status = 200, description = "List of documents", body = Vec<DocumentResponse>)
    )
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DocumentResponse>>, ApiError> {
    let documents = state.document_service().list().await?;

    Ok(Json(documents.into_iter().map(DocumentResponse::from).collect()))
}

/// GET /documents/:id - Download a document.
#[utoipa::path(
    get,
    path = "/documents/{id}",
    tag = "documents",
    params(
        ("id" = i64, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "PDF content", content_type = "application/pdf"),
        (status = 404, description = "Document or file not found", body = ErrorBody)
    )
)]
pub async fn download_document(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response<Body>, ApiError> {
    let id = document_id(path)?;
    let download = state.document_service().download(id).await?;

    let content_type = download.content_type();
    let disposition = content_disposition_header(download.filename());
    let length = download.length;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, length)
        .body(Body::from_stream(download.into_stream()))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })?;

    Ok(response)
}

/// DELETE /documents/:id - Delete a document and its file.
#[utoipa::path(
    delete,
    path = "/documents/{id}",
    tag = "documents",
    params(
        ("id" = i64, Path, description = "Document ID")
    ),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 404, description = "Document not found", body = ErrorBody)
    )
)]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = document_id(path)?;
    state.document_service().delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
