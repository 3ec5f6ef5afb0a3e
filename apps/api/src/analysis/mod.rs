// Resume analysis: extract → prompt → Gemini → relay.
// The analysis object itself is produced by the model and passed through as-is.

pub mod handlers;
pub mod prompts;
pub mod upload;

use serde_json::Value;
use tracing::info;

use crate::analysis::prompts::build_analysis_prompt;
use crate::analysis::upload::ResumeUpload;
use crate::errors::AppError;
use crate::extract::{extract_text, DocumentKind};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;

/// Runs the full upload-and-relay pipeline for one resume.
pub async fn analyze_resume(llm: &LlmClient, upload: ResumeUpload) -> Result<Value, AppError> {
    let kind = DocumentKind::from_file_name(&upload.file_name)?;
    let text = extract_text(kind, upload.bytes).await?;

    info!(
        kind = kind.as_str(),
        characters = text.chars().count(),
        with_job_description = upload.job_description.is_some(),
        "Extracted resume text"
    );

    let prompt = build_analysis_prompt(&text, upload.job_description.as_deref());
    let reply = llm.call_json_text(&prompt, JSON_ONLY_SYSTEM).await?;

    if let Some(usage) = &reply.usage {
        info!(
            prompt_tokens = usage.prompt_token_count,
            output_tokens = usage.candidates_token_count,
            "Model call succeeded"
        );
    }

    parse_analysis(&reply.text)
}

/// Parses cleaned model output. Anything other than a JSON object is rejected.
fn parse_analysis(raw: &str) -> Result<Value, AppError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        _ => Err(AppError::MalformedAiResponse(raw.to_string())),
    }
}
