use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::storage::json_collection::{Collection, Record};

/// Trait abstraction for product catalog storage.
/// The HTTP adapters only see this; a miss is `Ok(None)`, never an error.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list(&self, limit: Option<i64>) -> Result<Collection, ServiceError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Record>, ServiceError>;
    async fn create(&self, fields: Record) -> Result<Record, ServiceError>;
    async fn update_by_id(&self, id: i64, patch: Record) -> Result<Option<Record>, ServiceError>;
    async fn delete_by_id(&self, id: i64) -> Result<Option<Record>, ServiceError>;
}
