//! Shared application state.

use std::sync::Arc;

use crate::config::Config;
use crate::db::{MemoryStore, RepositoryConfig, Store, TaskRepository};
use crate::http::envelope::Envelope;
use crate::http::error::ApiError;
use crate::i18n::Translator;
use crate::service::{TaskService, TaskServiceImpl};

/// Shared application state.
pub struct AppState {
    /// Task operations.
    pub tasks: Arc<dyn TaskService>,

    /// Message lookup for the configured locale.
    pub translator: Translator,
}

impl AppState {
    /// Wire services over the given store.
    pub fn new(config: &Config, store: Arc<dyn Store>) -> Arc<Self> {
        let repository = TaskRepository::with_config(
            store,
            RepositoryConfig {
                items_per_page: config.items_per_page,
            },
        );
        Arc::new(Self {
            tasks: Arc::new(TaskServiceImpl::new(repository)),
            translator: Translator::new(config.locale.clone()),
        })
    }

    /// Wire services over a fresh in-memory store.
    pub fn in_memory(config: &Config) -> Arc<Self> {
        Self::new(config, Arc::new(MemoryStore::new()))
    }

    /// Render a failure as an envelope in the configured locale.
    pub fn fail(&self, err: impl Into<ApiError>) -> Envelope {
        err.into().to_envelope(&self.translator)
    }
}
