/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All LLM interactions MUST go through this module.
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key not configured. Please set GEMINI_API_KEY")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        /// Gemini's canonical status string, e.g. `RESOURCE_EXHAUSTED`.
        code: Option<String>,
        message: String,
    },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// True when the remote rejected our credential.
    pub fn is_invalid_api_key(&self) -> bool {
        match self {
            LlmError::Api { code, message, .. } => {
                code.as_deref() == Some("API_KEY_INVALID")
                    || message.contains("API_KEY_INVALID")
                    || message.contains("API key not valid")
            }
            _ => false,
        }
    }

    /// True when the remote is throttling us (HTTP 429 or quota exhaustion).
    pub fn is_rate_limited(&self) -> bool {
        match self {
            LlmError::Api {
                status,
                code,
                message,
            } => {
                let lower = message.to_lowercase();
                *status == 429
                    || code.as_deref() == Some("RESOURCE_EXHAUSTED")
                    || message.contains("RESOURCE_EXHAUSTED")
                    || lower.contains("quota")
                    || lower.contains("rate limit")
            }
            _ => false,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (Gemini generateContent)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

/// Cleaned JSON text of a model answer.
#[derive(Debug)]
pub struct JsonReply {
    pub text: String,
    pub usage: Option<UsageMetadata>,
}

impl LlmResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
    status: Option<String>,
    #[serde(default)]
    details: Vec<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    reason: Option<String>,
}

/// Turns a non-success response body into an `LlmError::Api`.
/// A specific `details[].reason` (e.g. `API_KEY_INVALID`) wins over the coarse status.
fn api_error(status: u16, body: String) -> LlmError {
    match serde_json::from_str::<GeminiError>(&body) {
        Ok(parsed) => {
            let reason = parsed
                .error
                .details
                .iter()
                .find_map(|d| d.reason.clone());
            LlmError::Api {
                status,
                code: reason.or(parsed.error.status),
                message: parsed.error.message,
            }
        }
        Err(_) => LlmError::Api {
            status,
            code: None,
            message: body,
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by all services.
/// Wraps Gemini `generateContent` with structured output helpers. No retries:
/// a throttled call surfaces to the caller immediately.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    api_base: String,
    model: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            api_base: config.gemini_api_base.clone(),
            model: config.gemini_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }

    /// Makes a raw call to the model, returning the full response object.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![RequestPart { text: system }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: 0.2,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            return Err(api_error(status.as_u16(), body));
        }

        let llm_response: LlmResponse = response.json().await?;
        Ok(llm_response)
    }

    /// Calls the model and returns the cleaned text of its JSON answer plus token usage.
    pub async fn call_json_text(&self, prompt: &str, system: &str) -> Result<JsonReply, LlmError> {
        let response = self.call(prompt, system).await?;

        if let Some(reason) = response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            debug!("LLM finish_reason={reason}");
        }

        let text = response.text().ok_or(LlmError::EmptyContent)?;
        Ok(JsonReply {
            text: clean_json_text(&text).to_string(),
            usage: response.usage_metadata,
        })
    }
}

/// Strips code fences, then falls back to the outermost `{...}` span if the
/// model still wrapped the object in prose.
pub fn clean_json_text(text: &str) -> &str {
    let stripped = strip_json_fences(text);
    if stripped.starts_with('{') || stripped.starts_with('[') {
        return stripped;
    }
    match (stripped.find('{'), stripped.rfind('}')) {
        (Some(start), Some(end)) if start < end => &stripped[start..=end],
        _ => stripped,
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let fence_tag_len = text
        .get(..7)
        .filter(|p| p.eq_ignore_ascii_case("```json"))
        .map(|_| 7)
        .or_else(|| text.starts_with("```").then_some(3));

    match fence_tag_len {
        Some(len) => {
            let inner = text[len..].trim_start();
            inner
                .strip_suffix("```")
                .map(|s| s.trim())
                .unwrap_or(inner)
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_config(base: &str, key: Option<&str>) -> Config {
        Config {
            gemini_api_key: key.map(String::from),
            gemini_model: "gemini-test".to_string(),
            gemini_api_base: base.to_string(),
            port: 0,
            rust_log: "info".to_string(),
            max_upload_bytes: 1024,
            request_timeout_secs: 5,
        }
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_uppercase_tag() {
        let input = "```JSON\n{\"key\": 1}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": 1}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_clean_json_text_drops_surrounding_prose() {
        let input = "Here is the analysis:\n{\"atsScore\": 71}\nGood luck!";
        assert_eq!(clean_json_text(input), "{\"atsScore\": 71}");
    }

    #[test]
    fn test_api_error_prefers_detail_reason() {
        let body = json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT",
                "details": [{ "@type": "type.googleapis.com/google.rpc.ErrorInfo", "reason": "API_KEY_INVALID" }]
            }
        })
        .to_string();

        let err = api_error(400, body);
        assert!(err.is_invalid_api_key());
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_api_error_rate_limit_by_status_string() {
        let body = json!({
            "error": { "code": 429, "message": "Resource has been exhausted (e.g. check quota).", "status": "RESOURCE_EXHAUSTED" }
        })
        .to_string();

        let err = api_error(429, body);
        assert!(err.is_rate_limited());
        assert!(!err.is_invalid_api_key());
    }

    #[test]
    fn test_api_error_unparseable_body_kept_as_message() {
        let err = api_error(502, "Bad Gateway".to_string());
        match err {
            LlmError::Api { status, code, message } => {
                assert_eq!(status, 502);
                assert!(code.is_none());
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_response_text_joins_first_candidate_parts() {
        let response: LlmResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"a\":" }, { "text": " 1}" }] }, "finishReason": "STOP" },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_response_text_none_without_candidates() {
        let response: LlmResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.text().is_none());
    }

    #[tokio::test]
    async fn test_call_without_api_key_fails_fast() {
        let client = LlmClient::new(&test_config("http://127.0.0.1:9", None)).unwrap();
        let err = client.call("prompt", "system").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_call_json_text_sends_key_and_cleans_output() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-test:generateContent")
                    .header("x-goog-api-key", "secret");
                then.status(200).json_body(json!({
                    "candidates": [{ "content": { "parts": [{ "text": "```json\n{\"atsScore\": 80}\n```" }] } }],
                    "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 5 }
                }));
            })
            .await;

        let client = LlmClient::new(&test_config(&server.base_url(), Some("secret"))).unwrap();
        let reply = client.call_json_text("prompt", "system").await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply.text, "{\"atsScore\": 80}");
        let usage = reply.usage.unwrap();
        assert_eq!(usage.prompt_token_count, 12);
        assert_eq!(usage.candidates_token_count, 5);
    }

    #[tokio::test]
    async fn test_call_does_not_retry_rate_limits() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(429).json_body(json!({
                    "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }
                }));
            })
            .await;

        let client = LlmClient::new(&test_config(&server.base_url(), Some("k"))).unwrap();
        let err = client.call("p", "s").await.unwrap_err();

        mock.assert_hits_async(1).await;
        assert!(err.is_rate_limited());
    }
}
