//! Axum route handlers for resume upload, analysis and extraction.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::analyze_resume;
use crate::analysis::upload::read_upload;
use crate::errors::AppError;
use crate::extract::{extract_text, word_count, DocumentKind};
use crate::llm_client::LlmError;
use crate::state::AppState;

const ANALYZE_FILE_FIELD: &str = "resume";
const PARSE_FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub file_name: String,
    pub format: DocumentKind,
    pub characters: usize,
    pub words: usize,
    pub text: String,
}

/// POST /api/analyze
///
/// Multipart: `resume` (PDF or DOCX, required), `jobDescription` (optional).
/// Returns the model's analysis object unmodified.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    // Fail before reading the upload when no key is configured.
    if !state.llm.has_api_key() {
        return Err(LlmError::MissingApiKey.into());
    }

    let request_id = Uuid::new_v4();
    let span = info_span!("analyze", %request_id);

    async move {
        let upload = read_upload(&mut multipart, ANALYZE_FILE_FIELD).await?;
        info!(
            file_name = %upload.file_name,
            bytes = upload.bytes.len(),
            "Received resume upload"
        );

        let analysis = analyze_resume(&state.llm, upload).await?;
        info!("Analysis complete");

        Ok::<_, AppError>(Json(AnalyzeResponse {
            success: true,
            analysis,
        }))
    }
    .instrument(span)
    .await
}

/// POST /api/parse
///
/// Multipart: `file` (PDF or DOCX). Extracts the document text without calling the model.
pub async fn handle_parse(mut multipart: Multipart) -> Result<Json<ParseResponse>, AppError> {
    let upload = read_upload(&mut multipart, PARSE_FILE_FIELD).await?;
    let kind = DocumentKind::from_file_name(&upload.file_name)?;
    let text = extract_text(kind, upload.bytes).await?;

    Ok(Json(ParseResponse {
        file_name: upload.file_name,
        format: kind,
        characters: text.chars().count(),
        words: word_count(&text),
        text,
    }))
}
