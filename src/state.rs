//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::service::DocumentService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    documents: DocumentService,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config, db: SqlitePool) -> Self {
        let documents = DocumentService::new(&config.storage, db);

        Self {
            inner: Arc::new(AppStateInner { config, documents }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the document service
    pub fn documents(&self) -> &DocumentService {
        &self.inner.documents
    }
}
