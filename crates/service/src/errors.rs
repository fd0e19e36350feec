use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("cannot read {path}: {source}")]
    StorageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog in {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode catalog: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ServiceError {
    /// True for failures raised while loading the collection.
    pub fn is_read_failure(&self) -> bool {
        matches!(self, Self::StorageRead { .. } | Self::Decode { .. })
    }
}
