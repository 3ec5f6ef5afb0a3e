use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; each request is independent.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let llm = LlmClient::new(&config)?;
        Ok(Self { llm, config })
    }
}
