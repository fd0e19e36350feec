//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_storage_dir` without depending directly on `common`.

use std::path::Path;

/// Make sure the directory holding the catalog file exists.
pub async fn ensure_storage_dir(catalog_path: &Path) -> anyhow::Result<()> {
    common::env::ensure_parent_dir(catalog_path).await
}
