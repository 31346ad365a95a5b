use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::api::response::ApiError;
use crate::attachments::AttachmentError;
use crate::AppState;

/// Serve a stored attachment by its stored filename.
/// Route: GET /uploads/:filename
pub async fn serve_attachment(
    State(state): State<Arc<AppState>>,
    axum::extract::Path(filename): axum::extract::Path<String>,
) -> Result<Response, ApiError> {
    let data = state
        .attachments
        .read(&filename)
        .await
        .map_err(|e| match e {
            AttachmentError::NotFound(_) | AttachmentError::InvalidName(_) => {
                ApiError::not_found("Attachment not found")
            }
            _ => {
                tracing::error!(error = %e, "Failed to read attachment");
                ApiError::internal("Erro ao buscar dados")
            }
        })?;

    // Build response with appropriate headers
    let mime_type = mime_guess::from_path(&filename).first_or_octet_stream();

    let mut response = (StatusCode::OK, data).into_response();
    let headers = response.headers_mut();

    headers.insert(
        header::CONTENT_TYPE,
        mime_type
            .as_ref()
            .parse()
            .unwrap_or(header::HeaderValue::from_static("application/octet-stream")),
    );

    if let Ok(value) = format!("inline; filename=\"{filename}\"").parse() {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    // Cache for 1 hour (attachments are immutable once uploaded)
    headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("public, max-age=3600"),
    );

    Ok(response)
}
