use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LanguageModel;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend, Postgres or in-memory depending on `STORE_BACKEND`.
    pub store: Arc<dyn Store>,
    /// Anthropic client, or `OfflineModel` when no API key is configured.
    pub llm: Arc<dyn LanguageModel>,
    pub config: Config,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(llm: Arc<dyn LanguageModel>) -> Self {
        AppState {
            store: Arc::new(crate::store::MemoryStore::new()),
            llm,
            config: Config::for_tests(),
        }
    }
}
