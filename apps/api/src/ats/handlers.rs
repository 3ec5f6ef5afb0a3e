//! Axum route handlers for the keyword ATS API.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::ats::calculator::{calculate_ats_score, AtsResult};
use crate::ats::skill_db::{find_role, skill_db, JobRole};
use crate::errors::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScoreRequest {
    pub resume_skills: Vec<String>,
    pub job_role: Option<String>,
    /// Overrides the role's skills from the built-in database, even when empty.
    pub required_skills: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsScoreResponse {
    pub job_role: Option<String>,
    #[serde(flatten)]
    pub result: AtsResult,
}

/// GET /api/roles
pub async fn handle_list_roles() -> Json<&'static [JobRole]> {
    Json(skill_db())
}

/// POST /api/ats-score
///
/// Scores resume skills against explicit `requiredSkills`, or against the
/// built-in skill list for `jobRole`.
pub async fn handle_ats_score(
    Json(request): Json<AtsScoreRequest>,
) -> Result<Json<AtsScoreResponse>, AppError> {
    // An explicit list wins even when empty (scores 0).
    if let Some(required) = request.required_skills {
        let result = calculate_ats_score(&request.resume_skills, &required);
        return Ok(Json(AtsScoreResponse {
            job_role: request.job_role,
            result,
        }));
    }

    let title = request
        .job_role
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            AppError::Validation("Either jobRole or requiredSkills must be provided".to_string())
        })?;

    let role = find_role(title)
        .ok_or_else(|| AppError::NotFound(format!("Unknown job role '{}'", title.trim())))?;

    let result = calculate_ats_score(&request.resume_skills, role.required_skills);
    Ok(Json(AtsScoreResponse {
        job_role: Some(role.title.to_string()),
        result,
    }))
}
