//! Document text source
//!
//! Turns uploaded bytes into the plain text the pipeline reads. Only PDFs
//! with an embedded text layer are supported; scanned images yield empty text.

use crate::error::ExtractorError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

/// Content type of a PDF upload
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Leading bytes of every PDF file
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Whether the bytes start with the PDF signature
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_SIGNATURE)
}

/// Whether an upload declares itself a PDF, by file name or content type
///
/// Content type parameters (`; charset=...`) are ignored.
pub fn is_declared_pdf(filename: Option<&str>, content_type: Option<&str>) -> bool {
    let by_name = filename
        .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
        .unwrap_or(false);
    let by_type = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false);
    by_name || by_type
}

/// Extract the text layer of a PDF held in memory
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractorError> {
    if !looks_like_pdf(bytes) {
        warn!("Document does not start with the PDF signature");
    }

    // The parser panics on some malformed inputs
    let outcome = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)));

    match outcome {
        Ok(Ok(text)) => {
            debug!("Extracted {} chars of PDF text", text.len());
            Ok(text)
        }
        Ok(Err(e)) => Err(ExtractorError::Document(e.to_string())),
        Err(_) => Err(ExtractorError::Document(
            "PDF parser aborted on malformed input".to_string(),
        )),
    }
}
