//! The Space entity: a user-defined grouping of items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids;
use crate::traits::{SyncRecord, Versioned};

/// A user-defined grouping of items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Space {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    /// Derived cache, recomputed by counting `ItemSpace` relations.
    /// Not authoritative; may go stale between recounts.
    #[serde(default)]
    pub item_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Space {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ids::new_id(),
            user_id: user_id.into(),
            name: name.into(),
            description: None,
            color: None,
            item_count: 0,
            created_at: now,
            updated_at: Some(now),
            is_deleted: false,
            deleted_at: None,
        }
    }
}

impl Versioned for Space {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl SyncRecord for Space {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(at);
        self.updated_at = Some(at);
    }
}
