use std::sync::Arc;

use proposer_core::templates::TemplateStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: proposer_db::DbPool,
    /// Server configuration (token secret, password costs, upload limits).
    pub config: Arc<ServerConfig>,
    /// Proposal document template files.
    pub templates: TemplateStore,
}

impl AppState {
    pub fn new(pool: proposer_db::DbPool, config: ServerConfig) -> Self {
        let templates = TemplateStore::new(config.template_dir.clone());
        Self {
            pool,
            config: Arc::new(config),
            templates,
        }
    }
}
