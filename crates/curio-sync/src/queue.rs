//! Durable mutation queue with deduplication and FIFO replay.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use curio_core::{
    CollectionKey, CollectionStore, CurioResult, ItemSpace, QueueAction, QueueEntry, QueueStatus,
    RemoteStore,
};
use curio_store::{load_collection, save_collection};

/// Summary of one drain pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DrainReport {
    /// Entries dispatched successfully (including already-applied).
    pub dispatched: usize,
    /// Entries discarded for failing id validation.
    pub discarded: usize,
    /// Entries left pending for the next drain.
    pub remaining: usize,
}

/// Append-only queue of pending local mutations.
///
/// Safe for concurrent enqueue while a drain is in progress: entries
/// live behind a mutex and the drain snapshots the pending set before
/// dispatching, so no entry is ever dispatched twice concurrently.
/// Every change is persisted under `CollectionKey::MutationQueue`.
pub struct MutationQueue {
    store: Arc<dyn CollectionStore>,
    entries: Mutex<Vec<QueueEntry>>,
    draining: AtomicBool,
}

impl MutationQueue {
    /// Load the queue from the local store, restoring entries persisted
    /// by a previous session.
    pub fn load(store: Arc<dyn CollectionStore>) -> CurioResult<Self> {
        let entries: Vec<QueueEntry> = load_collection(store.as_ref(), CollectionKey::MutationQueue)?;
        Ok(Self {
            store,
            entries: Mutex::new(entries),
            draining: AtomicBool::new(false),
        })
    }

    /// Append a mutation unless an equivalent one is already pending.
    ///
    /// Dedup key is (action kind, subject identity). Returns whether the
    /// mutation was actually queued; last-intent-wins is achieved by the
    /// eventual full reconciliation, not by queue compaction.
    pub fn enqueue(&self, action: QueueAction) -> CurioResult<bool> {
        let mut entries = self.lock_entries();
        let duplicate = entries.iter().any(|e| {
            e.is_pending()
                && e.action.kind() == action.kind()
                && e.action.subject() == action.subject()
        });
        if duplicate {
            tracing::debug!(
                "queue: dropped duplicate {} for {}",
                action.kind(),
                action.subject()
            );
            return Ok(false);
        }
        entries.push(QueueEntry::new(action));
        self.persist(&entries)?;
        Ok(true)
    }

    /// Number of pending entries.
    pub fn pending_count(&self) -> usize {
        self.lock_entries().iter().filter(|e| e.is_pending()).count()
    }

    /// All pending entries in queue order.
    pub fn pending(&self) -> Vec<QueueEntry> {
        self.lock_entries()
            .iter()
            .filter(|e| e.is_pending())
            .cloned()
            .collect()
    }

    pub fn mark_synced(&self, id: &str) -> CurioResult<()> {
        self.set_status(id, QueueStatus::Synced)
    }

    pub fn mark_failed(&self, id: &str) -> CurioResult<()> {
        self.set_status(id, QueueStatus::Failed)
    }

    /// Remove an entry outright.
    pub fn remove(&self, id: &str) -> CurioResult<()> {
        let mut entries = self.lock_entries();
        entries.retain(|e| e.id != id);
        self.persist(&entries)
    }

    /// Replay pending entries against the remote store, in queue order.
    ///
    /// Entries referencing malformed ids are discarded. A unique
    /// violation means the write already happened, so the entry is
    /// removed as a success. Any other failure leaves the entry pending
    /// for the next drain. A concurrent drain is a no-op.
    pub fn drain(&self, remote: &dyn RemoteStore, user_id: &str) -> CurioResult<DrainReport> {
        if self
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(DrainReport::default());
        }
        let result = self.drain_inner(remote, user_id);
        self.draining.store(false, Ordering::Release);
        result
    }

    fn drain_inner(&self, remote: &dyn RemoteStore, user_id: &str) -> CurioResult<DrainReport> {
        // Snapshot pending entries, then dispatch without holding the
        // lock so optimistic writes can keep enqueueing.
        let snapshot = self.pending();
        let mut report = DrainReport::default();
        let mut done: Vec<String> = Vec::new();

        for entry in &snapshot {
            if !entry.action.has_valid_ids() {
                tracing::warn!(
                    "queue: discarding {} with invalid id ({})",
                    entry.action.kind(),
                    entry.action.subject()
                );
                done.push(entry.id.clone());
                report.discarded += 1;
                continue;
            }
            match dispatch(remote, &entry.action, user_id, entry.created_at) {
                Ok(()) => {
                    done.push(entry.id.clone());
                    report.dispatched += 1;
                }
                Err(e) if e.is_already_applied() => {
                    tracing::debug!(
                        "queue: {} for {} already applied remotely",
                        entry.action.kind(),
                        entry.action.subject()
                    );
                    done.push(entry.id.clone());
                    report.dispatched += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        "queue: {} for {} failed, leaving pending: {e}",
                        entry.action.kind(),
                        entry.action.subject()
                    );
                    report.remaining += 1;
                }
            }
        }

        if !done.is_empty() {
            let mut entries = self.lock_entries();
            entries.retain(|e| !done.contains(&e.id));
            self.persist(&entries)?;
        }
        if report.dispatched > 0 || report.discarded > 0 {
            tracing::info!(
                "queue: drained {} entries ({} discarded, {} remaining)",
                report.dispatched,
                report.discarded,
                report.remaining
            );
        }
        Ok(report)
    }

    fn set_status(&self, id: &str, status: QueueStatus) -> CurioResult<()> {
        let mut entries = self.lock_entries();
        if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
            entry.status = status;
        }
        self.persist(&entries)
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, Vec<QueueEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, entries: &[QueueEntry]) -> CurioResult<()> {
        save_collection(self.store.as_ref(), CollectionKey::MutationQueue, entries)
    }
}

/// Dispatch one queued action against the remote store.
pub(crate) fn dispatch(
    remote: &dyn RemoteStore,
    action: &QueueAction,
    user_id: &str,
    created_at: chrono::DateTime<Utc>,
) -> CurioResult<()> {
    match action {
        QueueAction::CreateItem { item } => remote.insert_item(item),
        QueueAction::UpdateItem { item } => remote.update_item(item),
        QueueAction::DeleteItem { item_id } => remote.soft_delete_item(item_id, Utc::now()),
        QueueAction::AddItemToSpace { item_id, space_id } => {
            let relation = ItemSpace {
                item_id: item_id.clone(),
                space_id: space_id.clone(),
                user_id: user_id.to_string(),
                created_at,
            };
            remote.insert_item_space(&relation)
        }
        QueueAction::RemoveItemFromSpace { item_id, space_id } => {
            remote.delete_item_space(item_id, space_id)
        }
        QueueAction::SaveVideoTranscript { transcript } => {
            // Upsert: a save may be a fresh transcript or an edit to one
            // the remote already holds.
            match remote.insert_video_transcript(transcript) {
                Err(e) if e.is_already_applied() => remote.update_video_transcript(transcript),
                other => other,
            }
        }
        QueueAction::DeleteVideoTranscript { item_id } => {
            remote.soft_delete_video_transcript(item_id, Utc::now())
        }
    }
}
