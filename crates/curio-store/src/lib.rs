//! # curio-store
//!
//! Durable local persistence for entity collections and the mutation
//! queue. Collections are read-modify-written as whole JSON documents;
//! the file store replaces them atomically so a concurrent reader never
//! observes a partial write.

pub mod file_store;
pub mod memory_store;

pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

use curio_core::{CollectionKey, CollectionStore, CurioResult};

/// Load a typed collection, defaulting to empty when never written.
pub fn load_collection<T: DeserializeOwned>(
    store: &dyn CollectionStore,
    key: CollectionKey,
) -> CurioResult<Vec<T>> {
    match store.read_raw(key)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

/// Persist a typed collection, replacing whatever was there.
pub fn save_collection<T: Serialize>(
    store: &dyn CollectionStore,
    key: CollectionKey,
    rows: &[T],
) -> CurioResult<()> {
    let json = serde_json::to_string(rows)?;
    store.write_raw(key, &json)
}

/// Load a single persisted value (e.g. the status snapshot).
pub fn load_value<T: DeserializeOwned>(
    store: &dyn CollectionStore,
    key: CollectionKey,
) -> CurioResult<Option<T>> {
    match store.read_raw(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Persist a single value.
pub fn save_value<T: Serialize>(
    store: &dyn CollectionStore,
    key: CollectionKey,
    value: &T,
) -> CurioResult<()> {
    let json = serde_json::to_string(value)?;
    store.write_raw(key, &json)
}
