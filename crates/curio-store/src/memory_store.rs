//! In-memory collection store, for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use curio_core::{CollectionKey, CollectionStore, CurioResult};

/// A `CollectionStore` backed by a map. Same atomicity contract as the
/// file store: each write replaces the whole document.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<CollectionKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CollectionStore for MemoryStore {
    fn read_raw(&self, key: CollectionKey) -> CurioResult<Option<String>> {
        let map = self
            .collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(map.get(&key).cloned())
    }

    fn write_raw(&self, key: CollectionKey, json: &str) -> CurioResult<()> {
        let mut map = self
            .collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        map.insert(key, json.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let store = MemoryStore::new();
        store.write_raw(CollectionKey::MutationQueue, "[]").unwrap();
        assert_eq!(
            store
                .read_raw(CollectionKey::MutationQueue)
                .unwrap()
                .as_deref(),
            Some("[]")
        );
    }
}
