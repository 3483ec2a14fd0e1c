//! Envelope accessors shared by all syncable records.

use chrono::{DateTime, Utc};

/// A record with a stable sync key and a mutation timestamp.
///
/// Implemented by every entity that participates in reconciliation.
/// For 1:1 child entities the sync key is the parent item id.
pub trait Versioned: Clone {
    /// The stable sync key. Never reassigned.
    fn record_id(&self) -> &str;

    /// Mutation timestamp, authoritative for newest-wins resolution.
    fn updated_at(&self) -> Option<DateTime<Utc>>;

    /// Coerce invalid enum values to safe defaults in place.
    /// Records are sanitized, never rejected.
    fn sanitize(&mut self) {}
}

/// A record that supports soft deletion and the directional
/// upload/tombstone/download reconciliation passes.
pub trait SyncRecord: Versioned {
    /// Whether this record is tombstoned. Tombstones are terminal.
    fn is_deleted(&self) -> bool;

    /// When the tombstone was set, if known.
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    /// Tombstone this record, setting `updated_at` to the same instant
    /// so the deletion wins future timestamp comparisons.
    fn mark_deleted(&mut self, at: DateTime<Utc>);

    /// A field tracked by the change-detection pass in addition to
    /// `updated_at` (e.g. an item's space assignment). A difference in
    /// this value forces a re-fetch even when timestamps agree.
    fn tracked_field(&self) -> Option<String> {
        None
    }
}
