//! Video transcripts, at most one per item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::{SyncRecord, Versioned};

/// Transcript text for a video item. Keyed by the parent item id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTranscript {
    pub item_id: String,
    pub user_id: String,
    pub transcript: String,
    pub platform: Option<String>,
    pub language: Option<String>,
    pub duration_seconds: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Versioned for VideoTranscript {
    fn record_id(&self) -> &str {
        &self.item_id
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl SyncRecord for VideoTranscript {
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
