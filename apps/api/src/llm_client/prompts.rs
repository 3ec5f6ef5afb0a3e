// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System instruction that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Wraps untrusted document text in triple quotes under a heading.
pub fn fenced_block(heading: &str, body: &str) -> String {
    // Triple quotes in the body would close the fence early.
    let body = body.replace("\"\"\"", "\"\"");
    format!("{heading}:\n\"\"\"\n{}\n\"\"\"", body.trim())
}
