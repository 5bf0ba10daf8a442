use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::anyhow;

use crate::classifier::CategoryClassifier;
use crate::errors::AppError;
use crate::store::JobStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Listings loaded at startup. Only `JobStore::create` mutates it.
    pub store: Arc<RwLock<JobStore>>,
    /// Pluggable category predictor. Default: `EmbeddingClassifier`.
    pub classifier: Arc<dyn CategoryClassifier>,
}

impl AppState {
    pub fn new(store: JobStore, classifier: Arc<dyn CategoryClassifier>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            classifier,
        }
    }

    pub fn read_store(&self) -> Result<RwLockReadGuard<'_, JobStore>, AppError> {
        self.store
            .read()
            .map_err(|_| AppError::Internal(anyhow!("job store lock poisoned")))
    }

    pub fn write_store(&self) -> Result<RwLockWriteGuard<'_, JobStore>, AppError> {
        self.store
            .write()
            .map_err(|_| AppError::Internal(anyhow!("job store lock poisoned")))
    }
}
