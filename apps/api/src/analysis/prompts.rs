// Resume analysis prompt templates.
// All prompts for the analysis module are defined here.

use crate::llm_client::prompts::fenced_block;

pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert resume analyzer and career coach. Analyze the following resume thoroughly and return a JSON response with the following structure. Be very precise and detailed.

{resume_block}

{job_description_block}

Return ONLY valid JSON (no markdown, no code blocks, no extra text) with this exact structure:
{
  "atsScore": <number 0-100>,
  "atsDetails": {
    "formatting": <number 0-100>,
    "keywords": <number 0-100>,
    "structure": <number 0-100>,
    "readability": <number 0-100>
  },
  "skills": {
    "technical": ["skill1", "skill2"],
    "soft": ["skill1", "skill2"],
    "tools": ["tool1", "tool2"]
  },
  "experience": {
    "totalYears": <number or "Entry Level">,
    "positions": [
      {
        "title": "...",
        "company": "...",
        "duration": "..."
      }
    ]
  },
  "education": [
    {
      "degree": "...",
      "institution": "...",
      "year": "..."
    }
  ],
  "strengths": ["strength1", "strength2", "strength3", "strength4", "strength5"],
  "weaknesses": ["weakness1", "weakness2", "weakness3", "weakness4", "weakness5"],
  "improvements": [
    {
      "category": "...",
      "suggestion": "...",
      "priority": "high" | "medium" | "low"
    }
  ],
  "jobMatch": {job_match_schema},
  "summary": "A 2-3 sentence professional summary of the candidate's profile"
}
"#;

const JOB_MATCH_SCHEMA: &str = r#"{
    "score": <number 0-100>,
    "matchedKeywords": ["keyword1", "keyword2"],
    "missingKeywords": ["keyword1", "keyword2"],
    "suggestions": ["suggestion1", "suggestion2"]
  }"#;

/// Fills the analysis template. `jobMatch` is requested only when a job
/// description is supplied; otherwise the model is told to emit `null`.
pub fn build_analysis_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    let resume_block = fenced_block("RESUME TEXT", resume_text);
    let (job_description_block, job_match_schema) = match job_description {
        Some(jd) => (fenced_block("JOB DESCRIPTION", jd), JOB_MATCH_SCHEMA),
        None => (String::new(), "null"),
    };

    // Fill the schema slot first so document text can never inject a placeholder.
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{job_match_schema}", job_match_schema)
        .replacen("{job_description_block}", &job_description_block, 1)
        .replacen("{resume_block}", &resume_block, 1)
}
