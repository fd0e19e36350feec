use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::fs;

use crate::errors::ServiceError;

/// One catalog entry: an open JSON object whose `id` field is reserved.
pub type Record = Map<String, Value>;

/// The whole catalog, in insertion order.
pub type Collection = Vec<Record>;

/// JSON file holding a single array of records.
///
/// Every call goes to disk; nothing is cached between calls. Failures are
/// always returned to the caller, who decides whether to absorb them.
#[derive(Clone, Debug)]
pub struct JsonCollectionFile {
    path: PathBuf,
}

impl JsonCollectionFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the full collection. Integral floats such as `1.0`
    /// come back as integers, so they match and re-encode as `1`.
    pub async fn try_load(&self) -> Result<Collection, ServiceError> {
        let bytes = fs::read(&self.path).await.map_err(|source| ServiceError::StorageRead {
            path: self.path.clone(),
            source,
        })?;
        let mut collection: Collection =
            serde_json::from_slice(&bytes).map_err(|source| ServiceError::Decode {
                path: self.path.clone(),
                source,
            })?;
        for record in &mut collection {
            record.values_mut().for_each(normalize_integral_floats);
        }
        Ok(collection)
    }

    /// Encode the collection with 2-space indentation and overwrite the file.
    pub async fn try_persist(&self, collection: &[Record]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(collection)?;
        fs::write(&self.path, data).await.map_err(|source| ServiceError::StorageWrite {
            path: self.path.clone(),
            source,
        })
    }
}

/// Largest magnitude where every integer is exactly representable as `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn normalize_integral_floats(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_f64() => {
            if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
                    *value = Value::from(f as i64);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_integral_floats),
        Value::Object(map) => map.values_mut().for_each(normalize_integral_floats),
        _ => {}
    }
}
