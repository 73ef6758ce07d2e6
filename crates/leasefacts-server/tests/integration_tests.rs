//! Integration tests for the Server

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use leasefacts_domain::{FactField, FactRecord, FactSuggester};
use leasefacts_server::{
    build_state,
    config::ServerConfig,
    handlers::{create_router, ErrorResponse, HealthCheckResponse, UploadResponse},
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

const BOUNDARY: &str = "X-LEASEFACTS-BOUNDARY";

/// Helper to create a router storing uploads under `upload_dir`
fn create_test_app(upload_dir: &Path, suggester: Option<Arc<dyn FactSuggester>>) -> Router {
    let mut config = ServerConfig::default_test_config();
    config.upload_dir = upload_dir.to_path_buf();
    create_router(build_state(&config, suggester))
}

/// Build a multipart body with a single part
fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn post(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// A one-page PDF with a text layer
fn make_pdf(lines: &[&str]) -> Vec<u8> {
    use lopdf::dictionary;
    use lopdf::{Document, Object, Stream};

    let mut doc = Document::with_version("1.4");
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let content: String = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("BT /F1 12 Tf 72 {} Td ({}) Tj ET\n", 720 - 20 * i, line))
        .collect();
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        },
    });
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    });
    if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
        dict.set("Parent", pages_id);
    }
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path(), None);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthCheckResponse = read_json(response).await;
    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_upload_pdf_success() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path(), None);

    let pdf = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF\n";
    let request = post("/upload-pdf", multipart_body("file", "test.pdf", "application/pdf", pdf));

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let upload: UploadResponse = read_json(response).await;
    assert_eq!(upload.message, "PDF uploaded successfully");
    assert_eq!(upload.original_filename, "test.pdf");
    assert_eq!(upload.content_type, "application/pdf");
    assert_eq!(upload.size_bytes, pdf.len() as u64);

    let saved = Path::new(&upload.saved_path);
    assert!(saved.starts_with(dir.path()));
    assert_eq!(std::fs::read(saved).unwrap(), pdf);
}

#[tokio::test]
async fn test_upload_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("Downloads").join("pdf_uploads");
    let app = create_test_app(&nested, None);

    let request = post("/upload-pdf", multipart_body("file", "a.pdf", "application/pdf", b"%PDF-1.7"));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(nested.is_dir());
}

#[tokio::test]
async fn test_upload_rejects_non_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path(), None);

    let request = post("/upload-pdf", multipart_body("file", "notpdf.txt", "text/plain", b"hello world"));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "File must be a PDF with content-type application/pdf");
}

#[tokio::test]
async fn test_upload_accepts_pdf_name_with_generic_type() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path(), None);

    let request = post(
        "/upload-pdf",
        multipart_body("file", "lease.PDF", "application/octet-stream", b"%PDF-1.4"),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_file_field() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path(), None);

    let request = post(
        "/extract-lease-facts",
        multipart_body("document", "lease.pdf", "application/pdf", b"%PDF-1.4"),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = read_json(response).await;
    assert_eq!(error.error, "No file uploaded");
}

#[tokio::test]
async fn test_non_multipart_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path(), None);

    let request = Request::builder()
        .method("POST")
        .uri("/upload-pdf")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_extract_lease_facts() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path(), None);

    let pdf = make_pdf(&["Tenant: Acme Corp"]);
    let request = post("/extract-lease-facts", multipart_body("file", "lease.pdf", "application/pdf", &pdf));

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let facts: Value = read_json(response).await;
    let object = facts.as_object().unwrap();
    assert_eq!(object.len(), 11);
    assert_eq!(object["tenant_name"], "Acme Corp");
    assert!(object["security_deposit"].is_null());
    assert!(object["property_address_and_suite"].is_null());
}

#[tokio::test]
async fn test_extract_unreadable_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path(), None);

    let request = post(
        "/extract-lease-facts",
        multipart_body("file", "lease.pdf", "application/pdf", b"%PDF-1.4 truncated garbage"),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorResponse = read_json(response).await;
    assert!(error.error.starts_with("Failed to read PDF: "));
}

struct StubSuggester;

impl FactSuggester for StubSuggester {
    fn suggest(&self, _text: &str) -> FactRecord {
        FactRecord::new()
            .with(FactField::TenantName, Some("Someone Else"))
            .with(FactField::BaseYear, Some("2025"))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

#[tokio::test]
async fn test_extract_with_fallback_fills_gaps() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_test_app(dir.path(), Some(Arc::new(StubSuggester)));

    let pdf = make_pdf(&["Tenant: Acme Corp"]);
    let request = post("/extract-lease-facts", multipart_body("file", "lease.pdf", "application/pdf", &pdf));

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let facts: Value = read_json(response).await;
    assert_eq!(facts["tenant_name"], "Acme Corp");
    assert_eq!(facts["base_year"], "2025");
}
