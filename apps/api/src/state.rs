use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::llm_client::GeminiClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: GeminiClient,
    pub config: Config,
    /// Exclusive-access guard for the on-disk vector index.
    /// Rebuild and load take this lock so a rebuild cannot interleave
    /// with an analysis reading the same directory.
    pub index_guard: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(llm: GeminiClient, config: Config) -> Self {
        Self {
            llm,
            config,
            index_guard: Arc::new(Mutex::new(())),
        }
    }
}
