//! Remote API seam.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::entity::{Item, ItemMetadata, ItemSpace, ItemTypeMetadata, Space, VideoTranscript};
use crate::errors::CurioResult;

/// The authoritative remote store, one method per table operation.
///
/// Every query is scoped by owner id. Fetches include tombstoned rows
/// where the entity supports tombstones, so deletions can propagate.
/// Implementations own transport concerns (timeouts, retries at the
/// HTTP level); the sync engine only distinguishes the error taxonomy
/// in `RemoteError`.
pub trait RemoteStore: Send + Sync {
    /// Cheap reachability check. Must not panic or block indefinitely.
    fn probe(&self) -> bool;

    // --- Items ---
    fn fetch_items(&self, user_id: &str) -> CurioResult<Vec<Item>>;
    fn insert_item(&self, item: &Item) -> CurioResult<()>;
    fn update_item(&self, item: &Item) -> CurioResult<()>;
    fn soft_delete_item(&self, id: &str, deleted_at: DateTime<Utc>) -> CurioResult<()>;

    // --- Spaces ---
    fn fetch_spaces(&self, user_id: &str) -> CurioResult<Vec<Space>>;
    fn insert_space(&self, space: &Space) -> CurioResult<()>;
    fn update_space(&self, space: &Space) -> CurioResult<()>;

    // --- ItemSpace relations ---
    fn fetch_item_spaces(&self, user_id: &str) -> CurioResult<Vec<ItemSpace>>;
    fn insert_item_space(&self, relation: &ItemSpace) -> CurioResult<()>;
    fn delete_item_space(&self, item_id: &str, space_id: &str) -> CurioResult<()>;

    // --- ItemMetadata ---
    fn fetch_item_metadata(&self, user_id: &str) -> CurioResult<Vec<ItemMetadata>>;
    fn upsert_item_metadata(&self, meta: &ItemMetadata) -> CurioResult<()>;

    // --- ItemTypeMetadata ---
    fn fetch_item_type_metadata(&self, user_id: &str) -> CurioResult<Vec<ItemTypeMetadata>>;
    fn upsert_item_type_metadata(&self, meta: &ItemTypeMetadata) -> CurioResult<()>;

    // --- VideoTranscripts ---
    fn fetch_video_transcripts(&self, user_id: &str) -> CurioResult<Vec<VideoTranscript>>;
    fn insert_video_transcript(&self, transcript: &VideoTranscript) -> CurioResult<()>;
    fn update_video_transcript(&self, transcript: &VideoTranscript) -> CurioResult<()>;
    fn soft_delete_video_transcript(
        &self,
        item_id: &str,
        deleted_at: DateTime<Utc>,
    ) -> CurioResult<()>;

    // --- Id sets (orphan handling) ---
    /// All item ids known remotely for this owner, tombstoned included.
    /// A child referencing an id outside this set is an orphan.
    fn item_id_set(&self, user_id: &str) -> CurioResult<HashSet<String>>;

    /// All space ids known remotely for this owner, tombstoned included.
    fn space_id_set(&self, user_id: &str) -> CurioResult<HashSet<String>>;
}
