//! Service layer for the product catalog.
//! - `storage` reads and writes the JSON collection file and reports every failure.
//! - `catalog` owns the record lifecycle and decides which failures to absorb.
//! - `pagination` implements the list limit.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod catalog;
pub mod pagination;

pub use catalog::{CatalogRepository, CatalogStore, FailurePolicy, IdPolicy, WriteSerialization};
pub use storage::json_collection::{Collection, Record};
