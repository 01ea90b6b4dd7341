//! Repository layer: persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the key-value slot contract used by the state store.
//! - Isolate SQLite query details from service orchestration.

pub mod kv_repo;
