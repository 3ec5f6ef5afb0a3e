pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::ats::handlers as ats;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume analysis (model-backed)
        .route("/api/analyze", post(analysis::handle_analyze))
        .route("/api/parse", post(analysis::handle_parse))
        // Keyword ATS (local)
        .route("/api/roles", get(ats::handle_list_roles))
        .route("/api/ats-score", post(ats::handle_ats_score))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
