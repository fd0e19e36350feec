//! Storage abstractions for service layer
//!
//! The catalog is persisted as a single JSON array; this module only knows
//! how to move that array between disk and memory.

pub mod json_collection;
