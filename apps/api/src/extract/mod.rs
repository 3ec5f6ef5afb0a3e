//! Document text extraction for uploaded resumes.
//!
//! The file extension picks the backend: `pdf-extract` for PDF, a ZIP + XML
//! run walker for DOCX. Both backends are CPU-bound and run on the blocking pool.

use serde::Serialize;
use thiserror::Error;

pub mod docx;
pub mod pdf;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format. Please upload a PDF or DOCX file.")]
    UnsupportedFormat,

    #[error("Failed to parse PDF. Ensure it is a valid PDF file.")]
    Pdf(String),

    #[error("Failed to parse DOCX. Ensure it is a valid document.")]
    Docx(String),

    #[error("Could not extract text from the file. It may be empty or image-only.")]
    EmptyText,

    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Supported resume formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Chooses the extraction backend from the file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Result<Self, ExtractError> {
        let lower = name.trim().to_lowercase();
        if lower.ends_with(".pdf") {
            Ok(DocumentKind::Pdf)
        } else if lower.ends_with(".docx") {
            Ok(DocumentKind::Docx)
        } else {
            Err(ExtractError::UnsupportedFormat)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
        }
    }
}

/// Extracts plain text from `bytes`. Fails with `EmptyText` when nothing but
/// whitespace comes out (scanned or image-only documents).
pub async fn extract_text(kind: DocumentKind, bytes: bytes::Bytes) -> Result<String, ExtractError> {
    let text = tokio::task::spawn_blocking(move || match kind {
        DocumentKind::Pdf => pdf::extract(&bytes),
        DocumentKind::Docx => docx::extract(&bytes),
    })
    .await
    .map_err(|e| {
        // pdf-extract panics on some malformed inputs; treat that as a parse failure
        if e.is_panic() {
            match kind {
                DocumentKind::Pdf => ExtractError::Pdf("parser panicked".to_string()),
                DocumentKind::Docx => ExtractError::Docx("parser panicked".to_string()),
            }
        } else {
            ExtractError::Task(e)
        }
    })??;

    if text.trim().is_empty() {
        return Err(ExtractError::EmptyText);
    }

    Ok(text)
}

/// Counts whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_pdf_extension() {
        assert_eq!(
            DocumentKind::from_file_name("resume.pdf").unwrap(),
            DocumentKind::Pdf
        );
    }

    #[test]
    fn test_kind_is_case_insensitive() {
        assert_eq!(
            DocumentKind::from_file_name("Jane_Doe_CV.DOCX").unwrap(),
            DocumentKind::Docx
        );
        assert_eq!(
            DocumentKind::from_file_name("CV.Pdf").unwrap(),
            DocumentKind::Pdf
        );
    }

    #[test]
    fn test_unsupported_extensions_rejected() {
        for name in ["resume.doc", "resume.txt", "resume", "pdf", "resume.pdf.zip"] {
            assert!(
                matches!(
                    DocumentKind::from_file_name(name),
                    Err(ExtractError::UnsupportedFormat)
                ),
                "expected {name} to be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_pdf_bytes_fail_as_pdf_error() {
        let result = extract_text(
            DocumentKind::Pdf,
            bytes::Bytes::from_static(b"definitely not a pdf"),
        )
        .await;
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }

    #[tokio::test]
    async fn test_invalid_docx_bytes_fail_as_docx_error() {
        let result = extract_text(
            DocumentKind::Docx,
            bytes::Bytes::from_static(b"PK not really a zip"),
        )
        .await;
        assert!(matches!(result, Err(ExtractError::Docx(_))));
    }

    #[tokio::test]
    async fn test_whitespace_only_docx_is_empty_text() {
        let bytes = docx::tests::build_docx("<w:p><w:r><w:t xml:space=\"preserve\">   </w:t></w:r></w:p>");
        let result = extract_text(DocumentKind::Docx, bytes.into()).await;
        assert!(matches!(result, Err(ExtractError::EmptyText)));
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("  Senior   Rust\nEngineer\t2020 "), 4);
        assert_eq!(word_count(""), 0);
    }
}
