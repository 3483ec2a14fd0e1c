//! Local hygiene: remove child rows whose parent item the remote has
//! never known.
//!
//! The remote id set includes tombstoned items, since a tombstoned
//! parent is still "known"; only children of items absent from the set
//! entirely are orphans. Never touches the remote.

use std::collections::HashSet;
use std::sync::Arc;

use curio_core::{
    CleanupReport, CollectionKey, CollectionStore, CurioResult, ItemMetadata, ItemSpace,
    ItemTypeMetadata, RemoteStore, VideoTranscript,
};
use curio_store::{load_collection, save_collection};

pub struct OrphanCleaner {
    store: Arc<dyn CollectionStore>,
    remote: Arc<dyn RemoteStore>,
}

impl OrphanCleaner {
    pub fn new(store: Arc<dyn CollectionStore>, remote: Arc<dyn RemoteStore>) -> Self {
        Self { store, remote }
    }

    /// Remove orphaned local child rows across all four child
    /// collections and report per-collection counts.
    pub fn cleanup(&self, user_id: &str) -> CurioResult<CleanupReport> {
        let known = self.remote.item_id_set(user_id)?;
        let mut report = CleanupReport::default();

        self.filter::<ItemSpace>(CollectionKey::ItemSpaces, &known, &mut report, |r| {
            r.item_id.clone()
        })?;
        self.filter::<ItemMetadata>(CollectionKey::ItemMetadata, &known, &mut report, |r| {
            r.item_id.clone()
        })?;
        self.filter::<ItemTypeMetadata>(
            CollectionKey::ItemTypeMetadata,
            &known,
            &mut report,
            |r| r.item_id.clone(),
        )?;
        self.filter::<VideoTranscript>(
            CollectionKey::VideoTranscripts,
            &known,
            &mut report,
            |r| r.item_id.clone(),
        )?;

        if report.records_removed > 0 {
            tracing::info!("cleanup: removed {} orphaned rows", report.records_removed);
        }
        Ok(report)
    }

    fn filter<T>(
        &self,
        key: CollectionKey,
        known: &HashSet<String>,
        report: &mut CleanupReport,
        parent_id: impl Fn(&T) -> String,
    ) -> CurioResult<()>
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
    {
        let mut rows: Vec<T> = load_collection(self.store.as_ref(), key)?;
        let before = rows.len();
        rows.retain(|r| known.contains(&parent_id(r)));
        let removed = before - rows.len();
        if removed > 0 {
            save_collection(self.store.as_ref(), key, &rows)?;
        }
        report.records_removed += removed;
        report.details.push(format!("{key}: removed {removed}"));
        Ok(())
    }
}
