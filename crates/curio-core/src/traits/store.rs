//! Local persistence seam.

use crate::constants::CollectionKey;
use crate::errors::CurioResult;

/// Durable key/value persistence for whole collections.
///
/// Each key maps to one JSON document (an ordered list for entity
/// collections and the queue, a single object for the status snapshot).
/// Writes replace the whole document atomically: a concurrent reader
/// sees either the old or the new collection, never a partial one.
pub trait CollectionStore: Send + Sync {
    /// Read the raw JSON for a collection. `None` if never written.
    fn read_raw(&self, key: CollectionKey) -> CurioResult<Option<String>>;

    /// Atomically replace the raw JSON for a collection.
    fn write_raw(&self, key: CollectionKey, json: &str) -> CurioResult<()>;
}
