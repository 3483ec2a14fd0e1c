//! Record id generation and shape validation.
//!
//! Every syncable record carries a UUID string id. Values that fail the
//! shape check are local-only scratch data and must never reach the
//! remote store; callers purge them instead of syncing them.

use uuid::Uuid;

/// Generate a fresh record id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Whether `id` has a valid UUID shape.
pub fn is_valid_id(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}
