//! SyncEngine: orchestrates the mutation queue drain and the per-entity
//! reconciliation passes in dependency order, behind a single-flight
//! guard, publishing status to listeners.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use curio_core::{
    CollectionKey, CollectionStore, CurioError, CurioResult, Item, ItemMetadata, ItemSpace,
    ItemTypeMetadata, QueueAction, RemoteStore, Space, SyncConfig, SyncRecord, SyncResult,
    SyncStatus, Versioned, VideoTranscript,
};
use curio_store::{load_collection, save_collection, save_value};

use crate::queue::{self, MutationQueue};
use crate::reconcile::{self, relations, versioned};

/// Callback invoked with every status change. Must not block on
/// further network I/O; notification is synchronous.
pub type StatusListener = Box<dyn Fn(&SyncStatus) + Send + Sync>;

/// In-memory projection of all local collections, reloaded from the
/// store after each sync run so observers see final state.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    pub items: Vec<Item>,
    pub spaces: Vec<Space>,
    pub relations: Vec<ItemSpace>,
    pub item_metadata: Vec<ItemMetadata>,
    pub item_type_metadata: Vec<ItemTypeMetadata>,
    pub transcripts: Vec<VideoTranscript>,
}

/// Top-level sync orchestrator.
///
/// Entity passes run sequentially in dependency order because later
/// passes rely on identifiers established by earlier ones: Spaces,
/// Items, ItemSpace relations, ItemMetadata, ItemTypeMetadata,
/// VideoTranscripts. The single-flight guard serializes whole runs;
/// a concurrent call is a successful no-op.
pub struct SyncEngine {
    store: Arc<dyn CollectionStore>,
    remote: Arc<dyn RemoteStore>,
    queue: Arc<MutationQueue>,
    config: SyncConfig,
    user_id: Mutex<Option<String>>,
    syncing: AtomicBool,
    online: Arc<AtomicBool>,
    listeners: Mutex<Vec<StatusListener>>,
    status: Mutex<SyncStatus>,
    projection: Mutex<Projection>,
}

impl SyncEngine {
    pub fn new(
        store: Arc<dyn CollectionStore>,
        remote: Arc<dyn RemoteStore>,
        queue: Arc<MutationQueue>,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            remote,
            queue,
            config,
            user_id: Mutex::new(None),
            syncing: AtomicBool::new(false),
            online: Arc::new(AtomicBool::new(true)),
            listeners: Mutex::new(Vec::new()),
            status: Mutex::new(SyncStatus::default()),
            projection: Mutex::new(Projection::default()),
        }
    }

    /// Set the authenticated owner. Sync is a hard failure without one.
    pub fn set_user(&self, user_id: impl Into<String>) {
        *self.lock(&self.user_id) = Some(user_id.into());
    }

    pub fn clear_user(&self) {
        *self.lock(&self.user_id) = None;
    }

    /// The shared online flag, for wiring up a `ConnectivityMonitor`.
    pub fn online_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.online)
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Register a status listener. Called synchronously before and
    /// after every sync run.
    pub fn add_listener(&self, listener: StatusListener) {
        self.lock(&self.listeners).push(listener);
    }

    /// Current status snapshot.
    pub fn status(&self) -> SyncStatus {
        self.lock(&self.status).clone()
    }

    /// Current in-memory projection of the local collections.
    pub fn projection(&self) -> Projection {
        self.lock(&self.projection).clone()
    }

    // --- Optimistic local mutations -------------------------------------

    /// Create an item locally and push it to the remote, queueing the
    /// write when offline or when the direct call fails.
    pub fn create_item(&self, mut item: Item) -> CurioResult<()> {
        item.sanitize();
        self.upsert_local_item(&item)?;
        self.remote_or_queue(QueueAction::CreateItem { item })
    }

    pub fn update_item(&self, mut item: Item) -> CurioResult<()> {
        item.sanitize();
        item.touch();
        self.upsert_local_item(&item)?;
        self.remote_or_queue(QueueAction::UpdateItem { item })
    }

    /// Tombstone an item locally and propagate the deletion.
    pub fn delete_item(&self, item_id: &str) -> CurioResult<()> {
        let mut items: Vec<Item> = load_collection(self.store.as_ref(), CollectionKey::Items)?;
        let now = Utc::now();
        if let Some(item) = items.iter_mut().find(|i| i.id == item_id) {
            item.mark_deleted(now);
        }
        save_collection(self.store.as_ref(), CollectionKey::Items, &items)?;
        self.remote_or_queue(QueueAction::DeleteItem {
            item_id: item_id.to_string(),
        })
    }

    pub fn add_item_to_space(&self, item_id: &str, space_id: &str) -> CurioResult<()> {
        let user = self.require_user()?;
        let mut rows: Vec<ItemSpace> =
            load_collection(self.store.as_ref(), CollectionKey::ItemSpaces)?;
        if !rows
            .iter()
            .any(|r| r.item_id == item_id && r.space_id == space_id)
        {
            rows.push(ItemSpace::new(user, item_id, space_id));
            save_collection(self.store.as_ref(), CollectionKey::ItemSpaces, &rows)?;
        }
        self.remote_or_queue(QueueAction::AddItemToSpace {
            item_id: item_id.to_string(),
            space_id: space_id.to_string(),
        })
    }

    pub fn remove_item_from_space(&self, item_id: &str, space_id: &str) -> CurioResult<()> {
        let mut rows: Vec<ItemSpace> =
            load_collection(self.store.as_ref(), CollectionKey::ItemSpaces)?;
        rows.retain(|r| !(r.item_id == item_id && r.space_id == space_id));
        save_collection(self.store.as_ref(), CollectionKey::ItemSpaces, &rows)?;
        self.remote_or_queue(QueueAction::RemoveItemFromSpace {
            item_id: item_id.to_string(),
            space_id: space_id.to_string(),
        })
    }

    pub fn save_video_transcript(&self, transcript: VideoTranscript) -> CurioResult<()> {
        let mut rows: Vec<VideoTranscript> =
            load_collection(self.store.as_ref(), CollectionKey::VideoTranscripts)?;
        match rows.iter_mut().find(|t| t.item_id == transcript.item_id) {
            Some(existing) => *existing = transcript.clone(),
            None => rows.push(transcript.clone()),
        }
        save_collection(self.store.as_ref(), CollectionKey::VideoTranscripts, &rows)?;
        self.remote_or_queue(QueueAction::SaveVideoTranscript { transcript })
    }

    pub fn delete_video_transcript(&self, item_id: &str) -> CurioResult<()> {
        let mut rows: Vec<VideoTranscript> =
            load_collection(self.store.as_ref(), CollectionKey::VideoTranscripts)?;
        let now = Utc::now();
        if let Some(t) = rows.iter_mut().find(|t| t.item_id == item_id) {
            t.mark_deleted(now);
        }
        save_collection(self.store.as_ref(), CollectionKey::VideoTranscripts, &rows)?;
        self.remote_or_queue(QueueAction::DeleteVideoTranscript {
            item_id: item_id.to_string(),
        })
    }

    // --- The sync run ----------------------------------------------------

    /// Run a full sync. Never returns an error and never panics; every
    /// failure is reported inside the result.
    pub fn sync_to_cloud(&self) -> SyncResult {
        // Single-flight: a concurrent call does no work.
        if self
            .syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("sync: already in flight, returning no-op");
            return SyncResult::noop();
        }

        let result = self.run_sync();

        self.update_status(|s| {
            s.is_syncing = false;
            s.last_sync_time = Some(result.timestamp);
            s.total_synced += result.records_synced;
            s.last_error = result.errors.last().cloned();
        });
        self.persist_status();
        self.notify_listeners();
        self.syncing.store(false, Ordering::Release);
        result
    }

    fn run_sync(&self) -> SyncResult {
        let started = Utc::now();

        let user = match self.require_user() {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("sync: aborted: {e}");
                return SyncResult {
                    success: false,
                    records_synced: 0,
                    errors: vec![e.to_string()],
                    timestamp: started,
                };
            }
        };

        self.update_status(|s| {
            s.is_syncing = true;
            s.pending_items = self.queue.pending_count();
        });
        self.notify_listeners();

        let mut records_synced = 0usize;
        let mut errors: Vec<String> = Vec::new();

        // Offline-queued mutations replay first so reconciliation sees
        // the latest local intent.
        if let Err(e) = self.queue.drain(self.remote.as_ref(), &user) {
            errors.push(format!("queue drain: {e}"));
        }

        // Entity passes in dependency order. A failing pass records its
        // error and later passes still run; completed work is kept.
        let mut record_pass = |name: &str, result: CurioResult<usize>| match result {
            Ok(new_local) => {
                records_synced += new_local;
                tracing::info!("sync: {name} pass done, {new_local} new local records");
            }
            Err(e) => {
                tracing::warn!("sync: {name} pass failed: {e}");
                errors.push(format!("{name}: {e}"));
            }
        };
        record_pass("spaces", self.sync_spaces(&user));
        record_pass("items", self.sync_items(&user));
        record_pass("item_spaces", self.sync_relations(&user));
        record_pass("item_metadata", self.sync_item_metadata(&user));
        record_pass("item_type_metadata", self.sync_item_type_metadata(&user));
        record_pass("video_transcripts", self.sync_transcripts(&user));

        if let Err(e) = self.recount_space_items() {
            errors.push(format!("space recount: {e}"));
        }
        if let Err(e) = self.reload_projection() {
            errors.push(format!("projection reload: {e}"));
        }

        self.update_status(|s| s.pending_items = self.queue.pending_count());

        SyncResult {
            success: errors.is_empty(),
            records_synced,
            errors,
            timestamp: started,
        }
    }

    // --- Entity passes ---------------------------------------------------

    fn sync_spaces(&self, user: &str) -> CurioResult<usize> {
        let mut local: Vec<Space> = load_collection(self.store.as_ref(), CollectionKey::Spaces)?;
        let remote = self.remote.fetch_spaces(user)?;
        let outcome = reconcile::merge_collections(
            &mut local,
            remote,
            |_| true,
            |s| self.remote.insert_space(s),
            |s| self.remote.update_space(s),
        )?;
        save_collection(self.store.as_ref(), CollectionKey::Spaces, &local)?;
        Ok(outcome.new_local)
    }

    fn sync_items(&self, user: &str) -> CurioResult<usize> {
        let mut local: Vec<Item> = load_collection(self.store.as_ref(), CollectionKey::Items)?;
        let remote = self.remote.fetch_items(user)?;
        let outcome = reconcile::merge_collections(
            &mut local,
            remote,
            |_| true,
            |i| self.remote.insert_item(i),
            |i| {
                self.remote
                    .soft_delete_item(&i.id, i.deleted_at().unwrap_or_else(Utc::now))
            },
        )?;
        save_collection(self.store.as_ref(), CollectionKey::Items, &local)?;
        Ok(outcome.new_local)
    }

    fn sync_relations(&self, user: &str) -> CurioResult<usize> {
        let mut local: Vec<ItemSpace> =
            load_collection(self.store.as_ref(), CollectionKey::ItemSpaces)?;
        let remote = self.remote.fetch_item_spaces(user)?;
        let remote_items = self.remote.item_id_set(user)?;
        let remote_spaces = self.remote.space_id_set(user)?;
        let outcome = relations::reconcile_item_spaces(
            &mut local,
            remote,
            &remote_items,
            &remote_spaces,
            |r| self.remote.insert_item_space(r),
        )?;
        save_collection(self.store.as_ref(), CollectionKey::ItemSpaces, &local)?;
        Ok(outcome.new_local)
    }

    fn sync_item_metadata(&self, user: &str) -> CurioResult<usize> {
        let mut local: Vec<ItemMetadata> =
            load_collection(self.store.as_ref(), CollectionKey::ItemMetadata)?;
        let remote = self.remote.fetch_item_metadata(user)?;
        let outcome = versioned::reconcile_versioned(&mut local, remote, |m| {
            self.remote.upsert_item_metadata(m)
        })?;
        save_collection(self.store.as_ref(), CollectionKey::ItemMetadata, &local)?;
        Ok(outcome.new_local)
    }

    fn sync_item_type_metadata(&self, user: &str) -> CurioResult<usize> {
        let mut local: Vec<ItemTypeMetadata> =
            load_collection(self.store.as_ref(), CollectionKey::ItemTypeMetadata)?;
        let remote = self.remote.fetch_item_type_metadata(user)?;
        let outcome = versioned::reconcile_versioned(&mut local, remote, |m| {
            self.remote.upsert_item_type_metadata(m)
        })?;
        save_collection(self.store.as_ref(), CollectionKey::ItemTypeMetadata, &local)?;
        Ok(outcome.new_local)
    }

    fn sync_transcripts(&self, user: &str) -> CurioResult<usize> {
        let mut local: Vec<VideoTranscript> =
            load_collection(self.store.as_ref(), CollectionKey::VideoTranscripts)?;
        let remote = self.remote.fetch_video_transcripts(user)?;
        let remote_items = self.remote.item_id_set(user)?;
        let outcome = reconcile::merge_collections(
            &mut local,
            remote,
            |t| remote_items.contains(&t.item_id),
            |t| self.remote.insert_video_transcript(t),
            |t| {
                self.remote.soft_delete_video_transcript(
                    &t.item_id,
                    t.deleted_at().unwrap_or_else(Utc::now),
                )
            },
        )?;
        save_collection(self.store.as_ref(), CollectionKey::VideoTranscripts, &local)?;
        Ok(outcome.new_local)
    }

    /// Recompute the derived `Space.item_count` cache from relations.
    fn recount_space_items(&self) -> CurioResult<()> {
        let relations: Vec<ItemSpace> =
            load_collection(self.store.as_ref(), CollectionKey::ItemSpaces)?;
        let mut spaces: Vec<Space> = load_collection(self.store.as_ref(), CollectionKey::Spaces)?;
        let mut changed = false;
        for space in spaces.iter_mut() {
            let count = relations.iter().filter(|r| r.space_id == space.id).count() as u32;
            if space.item_count != count {
                space.item_count = count;
                changed = true;
            }
        }
        if changed {
            save_collection(self.store.as_ref(), CollectionKey::Spaces, &spaces)?;
        }
        Ok(())
    }

    fn reload_projection(&self) -> CurioResult<()> {
        let fresh = Projection {
            items: load_collection(self.store.as_ref(), CollectionKey::Items)?,
            spaces: load_collection(self.store.as_ref(), CollectionKey::Spaces)?,
            relations: load_collection(self.store.as_ref(), CollectionKey::ItemSpaces)?,
            item_metadata: load_collection(self.store.as_ref(), CollectionKey::ItemMetadata)?,
            item_type_metadata: load_collection(
                self.store.as_ref(),
                CollectionKey::ItemTypeMetadata,
            )?,
            transcripts: load_collection(self.store.as_ref(), CollectionKey::VideoTranscripts)?,
        };
        *self.lock(&self.projection) = fresh;
        Ok(())
    }

    // --- Plumbing --------------------------------------------------------

    fn upsert_local_item(&self, item: &Item) -> CurioResult<()> {
        let mut items: Vec<Item> = load_collection(self.store.as_ref(), CollectionKey::Items)?;
        match items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }
        save_collection(self.store.as_ref(), CollectionKey::Items, &items)
    }

    /// Try the remote write directly when online; fall back to the
    /// queue on failure or when offline.
    fn remote_or_queue(&self, action: QueueAction) -> CurioResult<()> {
        if self.config.direct_writes && self.is_online() {
            if let Ok(user) = self.require_user() {
                match queue::dispatch(self.remote.as_ref(), &action, &user, Utc::now()) {
                    Ok(()) => return Ok(()),
                    Err(e) if e.is_already_applied() => return Ok(()),
                    Err(e) => {
                        tracing::warn!("sync: direct {} failed, queueing: {e}", action.kind());
                    }
                }
            }
        }
        self.queue.enqueue(action)?;
        self.update_status(|s| s.pending_items = self.queue.pending_count());
        Ok(())
    }

    fn require_user(&self) -> CurioResult<String> {
        self.lock(&self.user_id)
            .clone()
            .ok_or(CurioError::NotAuthenticated {
                reason: "no user id set; call set_user before syncing".to_string(),
            })
    }

    fn update_status(&self, f: impl FnOnce(&mut SyncStatus)) {
        let mut status = self.lock(&self.status);
        status.is_online = self.is_online();
        f(&mut status);
    }

    fn persist_status(&self) {
        let status = self.status();
        if let Err(e) = save_value(self.store.as_ref(), CollectionKey::SyncStatus, &status) {
            tracing::warn!("sync: failed to persist status: {e}");
        }
    }

    // Clone the snapshot before calling out so a listener can query the
    // engine without deadlocking.
    fn notify_listeners(&self) {
        let snapshot = self.status();
        let listeners = self.lock(&self.listeners);
        for listener in listeners.iter() {
            listener(&snapshot);
        }
    }

    fn lock<'a, T>(&self, mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
        mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
