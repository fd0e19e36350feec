//! File-backed product catalog.
//!
//! Every operation loads the whole collection from disk, works on it in
//! memory and, if it changed something, writes the whole collection back.
//! Nothing is kept between calls except the configuration below.

mod policy;
mod repository;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info};

use crate::errors::ServiceError;
use crate::pagination::apply_limit;
use crate::storage::json_collection::{Collection, JsonCollectionFile, Record};

pub use policy::{id_matches, FailurePolicy, IdPolicy, WriteSerialization};
pub use repository::CatalogRepository;

pub struct CatalogStore {
    file: JsonCollectionFile,
    failure_policy: FailurePolicy,
    id_policy: IdPolicy,
    cycle_lock: Option<Mutex<()>>,
}

impl CatalogStore {
    /// Store over `path` with the default policies: soft failures,
    /// positional ids, no serialization.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            file: JsonCollectionFile::new(path),
            failure_policy: FailurePolicy::default(),
            id_policy: IdPolicy::default(),
            cycle_lock: None,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_id_policy(mut self, policy: IdPolicy) -> Self {
        self.id_policy = policy;
        self
    }

    pub fn with_write_serialization(mut self, mode: WriteSerialization) -> Self {
        self.cycle_lock = match mode {
            WriteSerialization::None => None,
            WriteSerialization::Serialized => Some(Mutex::new(())),
        };
        self
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    async fn guard(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.cycle_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    /// Load the full collection. Under `Soft` any failure reads as empty.
    pub async fn load(&self) -> Result<Collection, ServiceError> {
        match self.file.try_load().await {
            Ok(collection) => {
                debug!(path = %self.path().display(), count = collection.len(), "catalog loaded");
                Ok(collection)
            }
            Err(e) if self.failure_policy == FailurePolicy::Soft => {
                error!(
                    path = %self.path().display(),
                    error = %e,
                    "error reading catalog; treating as empty"
                );
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Overwrite the file with `collection`. Under `Soft` a failure is only logged.
    pub async fn persist(&self, collection: &[Record]) -> Result<(), ServiceError> {
        match self.file.try_persist(collection).await {
            Ok(()) => {
                info!(path = %self.path().display(), count = collection.len(), "products saved");
                Ok(())
            }
            Err(e) if self.failure_policy == FailurePolicy::Soft => {
                error!(
                    path = %self.path().display(),
                    error = %e,
                    "error writing catalog; change not persisted"
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Leading records of the catalog; see [`crate::pagination`] for limit rules.
    pub async fn list(&self, limit: Option<i64>) -> Result<Collection, ServiceError> {
        let _guard = self.guard().await;
        let collection = self.load().await?;
        Ok(apply_limit(collection, limit))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Record>, ServiceError> {
        let _guard = self.guard().await;
        let collection = self.load().await?;
        Ok(collection.into_iter().find(|r| id_matches(r, id)))
    }

    /// Append a record built from `fields`. The assigned id replaces any
    /// `id` the caller supplied.
    pub async fn create(&self, fields: Record) -> Result<Record, ServiceError> {
        let _guard = self.guard().await;
        let mut collection = self.load().await?;
        let new_id = self.id_policy.next_id(&collection);

        let mut record = fields;
        record.insert("id".to_string(), Value::from(new_id));
        collection.push(record.clone());

        self.persist(&collection).await?;
        Ok(record)
    }

    /// Merge `patch` over the matching record in place. A patch `id` is
    /// applied like any other field. A miss writes nothing.
    pub async fn update_by_id(
        &self,
        id: i64,
        patch: Record,
    ) -> Result<Option<Record>, ServiceError> {
        let _guard = self.guard().await;
        let mut collection = self.load().await?;
        let Some(index) = collection.iter().position(|r| id_matches(r, id)) else {
            return Ok(None);
        };

        let record = &mut collection[index];
        for (key, value) in patch {
            record.insert(key, value);
        }
        let updated = record.clone();

        self.persist(&collection).await?;
        Ok(Some(updated))
    }

    /// Remove the matching record, keeping the order of the rest. A miss writes nothing.
    pub async fn delete_by_id(&self, id: i64) -> Result<Option<Record>, ServiceError> {
        let _guard = self.guard().await;
        let mut collection = self.load().await?;
        let Some(index) = collection.iter().position(|r| id_matches(r, id)) else {
            return Ok(None);
        };

        let removed = collection.remove(index);
        self.persist(&collection).await?;
        Ok(Some(removed))
    }
}

#[async_trait]
impl CatalogRepository for CatalogStore {
    async fn list(&self, limit: Option<i64>) -> Result<Collection, ServiceError> {
        self.list(limit).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Record>, ServiceError> {
        self.get_by_id(id).await
    }

    async fn create(&self, fields: Record) -> Result<Record, ServiceError> {
        self.create(fields).await
    }

    async fn update_by_id(&self, id: i64, patch: Record) -> Result<Option<Record>, ServiceError> {
        self.update_by_id(id, patch).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<Option<Record>, ServiceError> {
        self.delete_by_id(id).await
    }
}
