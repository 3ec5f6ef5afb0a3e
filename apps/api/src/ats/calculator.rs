//! Keyword ATS calculator.
//!
//! Algorithm:
//! 1. Normalise both skill lists (trim + lowercase).
//! 2. matched = required skills present in the resume, in required order
//! 3. missing = the remaining required skills
//! 4. match_percentage = round(matched / required × 100), 0 when nothing is required
//! 5. score = match_percentage

use std::collections::HashSet;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsResult {
    pub score: u32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub match_percentage: u32,
}

fn normalize(skill: &str) -> String {
    skill.trim().to_lowercase()
}

pub fn calculate_ats_score<R, Q>(resume_skills: &[R], required_skills: &[Q]) -> AtsResult
where
    R: AsRef<str>,
    Q: AsRef<str>,
{
    let have: HashSet<String> = resume_skills.iter().map(|s| normalize(s.as_ref())).collect();

    let (matched_skills, missing_skills): (Vec<String>, Vec<String>) = required_skills
        .iter()
        .map(|s| normalize(s.as_ref()))
        .partition(|s| have.contains(s));

    let match_percentage = if required_skills.is_empty() {
        0
    } else {
        ((matched_skills.len() as f64 / required_skills.len() as f64) * 100.0).round() as u32
    };

    AtsResult {
        score: match_percentage,
        matched_skills,
        missing_skills,
        match_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_match_scores_100() {
        let result = calculate_ats_score(&["SQL", "Python"], &["python", " sql "]);
        assert_eq!(result.score, 100);
        assert_eq!(result.matched_skills, vec!["python", "sql"]);
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_partial_match_rounds_percentage() {
        // 1 of 3 → 33.33… → 33
        let result = calculate_ats_score(&["Git"], &["Git", "React", "CSS"]);
        assert_eq!(result.match_percentage, 33);
        assert_eq!(result.score, result.match_percentage);
        assert_eq!(result.missing_skills, vec!["react", "css"]);
    }

    #[test]
    fn test_two_of_three_rounds_up() {
        let result = calculate_ats_score(&["git", "react"], &["Git", "React", "CSS"]);
        assert_eq!(result.match_percentage, 67);
    }

    #[test]
    fn test_no_required_skills_scores_zero() {
        let empty: [&str; 0] = [];
        let result = calculate_ats_score(&["Rust"], &empty);
        assert_eq!(result.score, 0);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_matched_plus_missing_covers_required() {
        let required = ["HTML", "CSS", "JavaScript", "React", "TypeScript"];
        let result = calculate_ats_score(&["react", "rust", "css"], &required);
        assert_eq!(
            result.matched_skills.len() + result.missing_skills.len(),
            required.len()
        );
        assert!(result.score <= 100);
    }
}
