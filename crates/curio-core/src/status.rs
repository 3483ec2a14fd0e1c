//! Sync results and the status snapshot broadcast to listeners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of one `sync_to_cloud` run. Always returned; the engine never
/// propagates an error past its top-level entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResult {
    pub success: bool,
    /// Count of brand-new local records created by download passes.
    pub records_synced: usize,
    /// Human-readable error strings, one per failed step.
    pub errors: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl SyncResult {
    /// A successful run that did no work (e.g. a concurrent call hitting
    /// the single-flight guard).
    pub fn noop() -> Self {
        Self {
            success: true,
            records_synced: 0,
            errors: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

/// Snapshot pushed to status listeners and persisted under the
/// `SyncStatus` collection key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStatus {
    pub last_sync_time: Option<DateTime<Utc>>,
    /// Pending entries in the mutation queue.
    pub pending_items: usize,
    /// Running total of records synced across runs.
    pub total_synced: usize,
    pub is_online: bool,
    pub is_syncing: bool,
    pub last_error: Option<String>,
}

/// Result of an orphan cleanup pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupReport {
    pub records_removed: usize,
    /// One line per collection, e.g. `"item_metadata: removed 2"`.
    pub details: Vec<String>,
}
