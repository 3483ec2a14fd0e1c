//! The ItemSpace relation: membership of an item in a space.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Membership of an item in a space. Composite identity
/// `(item_id, space_id)`; presence means membership, so removal is a
/// hard delete rather than a tombstone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpace {
    pub item_id: String,
    pub space_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl ItemSpace {
    pub fn new(
        user_id: impl Into<String>,
        item_id: impl Into<String>,
        space_id: impl Into<String>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            space_id: space_id.into(),
            user_id: user_id.into(),
            created_at: Utc::now(),
        }
    }

    /// Composite key used for map lookups and queue dedup.
    pub fn key(&self) -> (String, String) {
        (self.item_id.clone(), self.space_id.clone())
    }
}
