// Local keyword ATS scoring against a small built-in role database.
// Deterministic and model-free; complements the AI analysis.

pub mod calculator;
pub mod handlers;
pub mod skill_db;
