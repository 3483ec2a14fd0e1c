//! Collection keys and default tunables.

use serde::{Deserialize, Serialize};

/// Default interval between connectivity probes, in seconds.
pub const DEFAULT_PROBE_INTERVAL_SECS: u64 = 30;

/// Keys under which collections are persisted in the local store.
///
/// Each key maps to one JSON-serialized ordered list (or, for
/// `SyncStatus`, a single JSON object).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKey {
    Items,
    Spaces,
    ItemSpaces,
    ItemMetadata,
    ItemTypeMetadata,
    VideoTranscripts,
    MutationQueue,
    SyncStatus,
}

impl CollectionKey {
    /// All keys, in no particular order.
    pub const ALL: [CollectionKey; 8] = [
        CollectionKey::Items,
        CollectionKey::Spaces,
        CollectionKey::ItemSpaces,
        CollectionKey::ItemMetadata,
        CollectionKey::ItemTypeMetadata,
        CollectionKey::VideoTranscripts,
        CollectionKey::MutationQueue,
        CollectionKey::SyncStatus,
    ];

    /// Stable string form, used as the storage key / file stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKey::Items => "items",
            CollectionKey::Spaces => "spaces",
            CollectionKey::ItemSpaces => "item_spaces",
            CollectionKey::ItemMetadata => "item_metadata",
            CollectionKey::ItemTypeMetadata => "item_type_metadata",
            CollectionKey::VideoTranscripts => "video_transcripts",
            CollectionKey::MutationQueue => "mutation_queue",
            CollectionKey::SyncStatus => "sync_status",
        }
    }
}

impl std::fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
