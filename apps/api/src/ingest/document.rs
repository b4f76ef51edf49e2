//! Document text extraction (stage 1): raw bytes + MIME type → normalized text.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::ingest::normalize::{enhance, normalize};
use crate::ingest::pdf::{extract_pdf, PdfText, PLACEHOLDER_TEXT};
use crate::ingest::word::{extract_docx, salvage_doc_text};

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_GOOGLE_DOC: &str = "application/vnd.google-apps.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Doc,
    Docx,
}

impl DocumentFormat {
    /// Parameters (`; charset=...`) are ignored, comparison is case-insensitive.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            MIME_PDF => Some(DocumentFormat::Pdf),
            MIME_DOC => Some(DocumentFormat::Doc),
            MIME_DOCX | MIME_GOOGLE_DOC => Some(DocumentFormat::Docx),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionQuality {
    Full,
    Degraded { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub quality: ExtractionQuality,
}

impl ExtractedText {
    fn new(raw: &str, quality: ExtractionQuality) -> Self {
        Self {
            text: enhance(&normalize(raw)),
            quality,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.quality, ExtractionQuality::Degraded { .. })
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match &self.quality {
            ExtractionQuality::Full => None,
            ExtractionQuality::Degraded { reason } => Some(reason),
        }
    }
}

/// Extracts plain text from a document.
///
/// Only an unsupported MIME type is an error. Unreadable content of a supported
/// type yields degraded text instead.
pub fn extract(bytes: &[u8], mime: &str) -> Result<ExtractedText, AppError> {
    let format = DocumentFormat::from_mime(mime)
        .ok_or_else(|| AppError::UnsupportedFormat(format!("'{mime}' is not a supported document type")))?;

    let extracted = match format {
        DocumentFormat::Pdf => extract_pdf_text(bytes),
        DocumentFormat::Docx => match extract_docx(bytes) {
            Ok(text) => ExtractedText::new(&text, ExtractionQuality::Full),
            Err(e) => {
                warn!("{e:#}");
                degraded_binary(bytes, "Word document could not be decoded; text was salvaged from raw bytes")
            }
        },
        DocumentFormat::Doc => match extract_docx(bytes) {
            // Mislabelled .docx
            Ok(text) => ExtractedText::new(&text, ExtractionQuality::Full),
            Err(_) => degraded_binary(bytes, "Legacy .doc format; text was recovered heuristically"),
        },
    };

    info!(
        "Extracted {} characters from {:?} document (degraded: {})",
        extracted.text.len(),
        format,
        extracted.is_degraded()
    );
    Ok(extracted)
}

fn extract_pdf_text(bytes: &[u8]) -> ExtractedText {
    match extract_pdf(bytes) {
        PdfText::Structured(text) => ExtractedText::new(&text, ExtractionQuality::Full),
        PdfText::TokenScan(text) => ExtractedText::new(
            &text,
            ExtractionQuality::Degraded {
                reason: "PDF text layer could not be decoded; text was recovered from raw content streams".to_string(),
            },
        ),
        PdfText::Unreadable => ExtractedText::new(
            PLACEHOLDER_TEXT,
            ExtractionQuality::Degraded {
                reason: "No readable text found in PDF".to_string(),
            },
        ),
    }
}

fn degraded_binary(bytes: &[u8], reason: &str) -> ExtractedText {
    ExtractedText::new(
        &salvage_doc_text(bytes),
        ExtractionQuality::Degraded {
            reason: reason.to_string(),
        },
    )
}
