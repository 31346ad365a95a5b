use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::BytesMut;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::response::{ApiError, AppJson, MessageResponse};
use crate::category::Category;
use crate::storage::models::Record;
use crate::AppState;

/// Exact legacy validation message; existing clients match on it.
const MISSING_FIELDS: &str = "Faltando título ou definição";

// ============================================================================
// Types
// ============================================================================

/// JSON create body. The legacy Portuguese field names are accepted as
/// aliases so the original frontend keeps working.
#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    #[serde(default, alias = "titulo")]
    pub title: Option<String>,
    #[serde(default, alias = "definicao")]
    pub definition: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/:category for the text-only categories.
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    AppJson(req): AppJson<CreateRecordRequest>,
) -> Result<Response, ApiError> {
    let category = resolve_slug(&slug)?;
    validate_and_insert(&state, category, req.title, req.definition, None)
}

/// POST /api/geometry — multipart, with an optional attachment.
pub async fn create_geometry_record(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut title: Option<String> = None;
    let mut definition: Option<String> = None;
    let mut upload: Option<(String, BytesMut)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&state, e))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "attachment" | "imagem" => {
                let original_name = field.file_name().unwrap_or("attachment").to_string();

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(&state, e))?;

                if data.len() as u64 > state.config.max_upload_size {
                    return Err(ApiError::payload_too_large(format!(
                        "Attachment exceeds maximum upload size of {} bytes",
                        state.config.max_upload_size
                    )));
                }

                let mut buf = BytesMut::with_capacity(data.len());
                buf.extend_from_slice(&data);
                upload = Some((original_name, buf));
            }
            "title" | "titulo" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Invalid title: {e}")))?,
                );
            }
            "definition" | "definicao" => {
                definition = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Invalid definition: {e}")))?,
                );
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    // Reject before touching disk so an invalid request leaves nothing behind.
    if field_missing(&title) || field_missing(&definition) {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    }

    let attachment = match upload {
        Some((original_name, data)) => {
            let stored = state
                .attachments
                .save(&original_name, data.freeze())
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Failed to store attachment");
                    ApiError::internal(Category::Geometry.insert_error_message())
                })?;
            tracing::debug!(stored_name = %stored, "Stored attachment");
            Some(stored)
        }
        None => None,
    };

    // An insert failure past this point leaves the stored file behind,
    // matching the legacy upload flow (the file hit disk before the insert).
    validate_and_insert(&state, Category::Geometry, title, definition, attachment)
}

/// GET /api/:category for the text-only categories.
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let category = resolve_slug(&slug)?;
    list_category(&state, category)
}

/// GET /api/geometry.
pub async fn list_geometry_records(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    list_category(&state, Category::Geometry)
}

// ============================================================================
// Helpers
// ============================================================================

fn resolve_slug(slug: &str) -> Result<Category, ApiError> {
    Category::from_slug(slug).ok_or_else(|| ApiError::not_found("Unknown category"))
}

fn field_missing(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// A multipart read fails with 413 when `DefaultBodyLimit` cuts the body off;
/// everything else is a malformed request.
fn multipart_error(state: &AppState, e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(format!(
            "Attachment exceeds maximum upload size of {} bytes",
            state.config.max_upload_size
        ))
    } else {
        ApiError::bad_request(format!("Invalid multipart data: {e}"))
    }
}

/// The shared create path: apply the category's validation policy, then issue
/// one parameterized insert.
fn validate_and_insert(
    state: &AppState,
    category: Category,
    title: Option<String>,
    definition: Option<String>,
    attachment: Option<String>,
) -> Result<Response, ApiError> {
    if !category.skips_validation() && (field_missing(&title) || field_missing(&definition)) {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    }

    state
        .db
        .insert_record(
            category,
            title.as_deref(),
            definition.as_deref(),
            attachment.as_deref(),
        )
        .map_err(|e| {
            tracing::error!(category = category.slug(), error = %e, "Insert failed");
            ApiError::internal(category.insert_error_message())
        })?;

    tracing::debug!(category = category.slug(), "Created record");

    Ok((
        category.created_status(),
        MessageResponse::new(category.insert_message()),
    )
        .into_response())
}

fn list_category(state: &AppState, category: Category) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state.db.list_records(category).map_err(|e| {
        tracing::error!(category = category.slug(), error = %e, "List failed");
        ApiError::internal(category.fetch_error_message())
    })?;

    Ok(Json(records))
}
