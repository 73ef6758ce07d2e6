//! HTTP request handlers for the Server.
//!
//! Implements PDF upload, lease fact extraction and health check endpoints
//! using axum.

use axum::{
    extract::multipart::{Field, MultipartError, MultipartRejection},
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use leasefacts_domain::FactRecord;
use leasefacts_extractor::document::PDF_SIGNATURE;
use leasefacts_extractor::{extract_pdf_text, is_declared_pdf, looks_like_pdf, LeaseExtractor};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Multipart field carrying the document
pub const FILE_FIELD: &str = "file";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Extractor shared by all requests
    pub extractor: Arc<LeaseExtractor>,
    /// Directory where uploads are stored
    pub upload_dir: PathBuf,
    /// Reject bodies without the `%PDF-` signature
    pub strict_pdf_signature: bool,
    /// Request body limit in bytes
    pub max_upload_bytes: usize,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Always "ok" while the process serves requests
    pub status: String,
}

/// Response to a stored upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Confirmation message
    pub message: String,
    /// File name supplied by the client
    pub original_filename: String,
    /// Content type supplied by the client
    pub content_type: String,
    /// Bytes written
    pub size_bytes: u64,
    /// Where the file was stored
    pub saved_path: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Request carried no `file` part
    #[error("No file uploaded")]
    NoFile,

    /// Neither the file name nor the content type says PDF
    #[error("File must be a PDF with content-type application/pdf")]
    NotPdf,

    /// Strict mode and the body lacks the PDF signature
    #[error("Uploaded file does not appear to be a valid PDF")]
    BadSignature,

    /// Malformed multipart body
    #[error("Invalid multipart request: {0}")]
    Multipart(String),

    /// Body exceeds the configured limit
    #[error("Upload exceeds the size limit")]
    TooLarge,

    /// Text extraction failed
    #[error("Failed to read PDF: {0}")]
    PdfRead(String),

    /// Upload could not be written
    #[error("Failed to store upload: {0}")]
    Storage(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NoFile | AppError::NotPdf | AppError::BadSignature | AppError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::PdfRead(_) | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            warn!("Request failed: {}", self);
        } else {
            debug!("Request rejected: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::TooLarge
        } else {
            AppError::Multipart(e.body_text())
        }
    }
}

/// Name and content type the client sent with the file part
struct Declared {
    filename: Option<String>,
    content_type: Option<String>,
}

impl Declared {
    /// Read the declaration from a field, requiring it to say PDF
    fn check(field: &Field<'_>) -> Result<Self, AppError> {
        let declared = Declared {
            filename: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
        };
        if !is_declared_pdf(declared.filename.as_deref(), declared.content_type.as_deref()) {
            return Err(AppError::NotPdf);
        }
        Ok(declared)
    }
}

/// Warn about, or in strict mode reject, bytes without the PDF signature
fn check_signature(state: &AppState, head: &[u8]) -> Result<(), AppError> {
    if looks_like_pdf(head) {
        return Ok(());
    }
    if state.strict_pdf_signature {
        return Err(AppError::BadSignature);
    }
    warn!("Upload does not start with %PDF-, accepting anyway");
    Ok(())
}

/// GET /health - Liveness check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
    })
}

/// POST /upload-pdf - Store a PDF in the upload directory
async fn upload_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|_| AppError::NoFile)?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let declared = Declared::check(&field)?;
        return store_upload(&state, field, declared).await.map(Json);
    }

    Err(AppError::NoFile)
}

/// Stream one field to a uniquely named file; nothing is kept on failure
async fn store_upload(
    state: &AppState,
    mut field: Field<'_>,
    declared: Declared,
) -> Result<UploadResponse, AppError> {
    tokio::fs::create_dir_all(&state.upload_dir).await?;

    let temp = tempfile::Builder::new()
        .prefix("upload_")
        .suffix(".pdf")
        .tempfile_in(&state.upload_dir)?;
    let mut file = tokio::fs::File::from_std(temp.reopen()?);

    let mut size_bytes: u64 = 0;
    let mut head: Vec<u8> = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if head.len() < PDF_SIGNATURE.len() {
            let wanted = PDF_SIGNATURE.len() - head.len();
            head.extend_from_slice(&chunk[..chunk.len().min(wanted)]);
        }
        file.write_all(&chunk).await?;
        size_bytes += chunk.len() as u64;
    }
    file.flush().await?;
    drop(file);

    check_signature(state, &head)?;

    let saved_path = temp.into_temp_path().keep().map_err(|e| e.error)?;
    info!("Stored upload of {} bytes at {}", size_bytes, saved_path.display());

    Ok(UploadResponse {
        message: "PDF uploaded successfully".to_string(),
        original_filename: declared.filename.unwrap_or_else(|| "uploaded.pdf".to_string()),
        content_type: declared.content_type.unwrap_or_default(),
        size_bytes,
        saved_path: saved_path.display().to_string(),
    })
}

/// POST /extract-lease-facts - Extract the eleven lease facts from a PDF
async fn extract_lease_facts(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<FactRecord>, AppError> {
    let mut multipart = multipart.map_err(|_| AppError::NoFile)?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let declared = Declared::check(&field)?;
        let bytes = field.bytes().await?;
        check_signature(&state, &bytes)?;

        info!(
            "Extracting facts from {} ({} bytes)",
            declared.filename.as_deref().unwrap_or("lease.pdf"),
            bytes.len()
        );

        let text = tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
            .await
            .map_err(|e| AppError::PdfRead(e.to_string()))?
            .map_err(|e| AppError::PdfRead(e.to_string()))?;

        let result = state.extractor.extract(&text).await;
        return Ok(Json(result.facts));
    }

    Err(AppError::NoFile)
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    let body_limit = state.max_upload_bytes;
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/upload-pdf", post(upload_pdf))
        .route("/extract-lease-facts", post(extract_lease_facts))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
