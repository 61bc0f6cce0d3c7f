//! Document API endpoints
//!
//! REST surface over the document service:
//! - `POST /documents/upload` — multipart upload (field `file`)
//! - `GET /documents` — list all documents, most recent first
//! - `GET /documents/:id` — download the stored file
//! - `DELETE /documents/:id` — delete row and stored file

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::db::Document;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Upload body limit: 50MB
const MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

/// Upload response
#[derive(Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub document: UploadedDocument,
}

/// The subset of document fields echoed back after upload
#[derive(Serialize)]
pub struct UploadedDocument {
    pub id: i64,
    pub filename: String,
    pub size: i64,
}

/// Delete confirmation response
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create the documents router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents))
        .route("/upload", post(upload_document))
        .route("/:id", get(download_document).delete(delete_document))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
}

/// List all documents, most recent first
async fn list_documents(State(state): State<AppState>) -> Result<Json<Vec<Document>>> {
    let documents = state.documents().list().await?;
    Ok(Json(documents))
}

/// Upload a new document from a multipart form
async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "file" {
            continue;
        }

        let original_name = field.file_name().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file data: {}", e)))?;

        let document = state.documents().upload(&data, &original_name).await?;

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                message: "File uploaded successfully".to_string(),
                document: UploadedDocument {
                    id: document.id,
                    filename: document.filename,
                    size: document.filesize,
                },
            }),
        ));
    }

    Err(AppError::Validation("No file part".to_string()))
}

/// Download a document as an attachment under its original name
async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    let (bytes, filename) = state.documents().fetch_for_download(id).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Delete a document
async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>> {
    state.documents().delete(id).await?;

    Ok(Json(MessageResponse {
        message: "File deleted successfully".to_string(),
    }))
}
