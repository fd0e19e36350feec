use std::sync::Arc;

use configs::StorageConfig;
use service::{CatalogRepository, CatalogStore};

#[derive(Clone)]
pub struct ServerState {
    pub catalog: Arc<dyn CatalogRepository>,
}

impl ServerState {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// Build the file-backed catalog described by `cfg`.
    pub fn from_storage_config(cfg: &StorageConfig) -> Self {
        let store = CatalogStore::new(&cfg.path)
            .with_id_policy(cfg.id_policy)
            .with_failure_policy(cfg.failure_policy)
            .with_write_serialization(cfg.write_serialization());
        Self::new(Arc::new(store))
    }
}
