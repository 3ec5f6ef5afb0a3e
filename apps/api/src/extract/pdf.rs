use crate::extract::ExtractError;

/// Extracts text from an in-memory PDF via `pdf-extract`.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}
