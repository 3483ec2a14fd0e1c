//! The Item entity: one saved piece of content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids;
use crate::traits::{SyncRecord, Versioned};

use super::content_type::ContentType;

/// One saved piece of content. Owns zero-or-more `ItemSpace` relations,
/// at most one `ItemMetadata`, at most one `ItemTypeMetadata`, and at
/// most one `VideoTranscript`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// UUID, stable across replicas. Primary sync key.
    pub id: String,
    /// Owner. Never changes.
    pub user_id: String,
    pub title: String,
    pub url: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_archived: bool,
    /// Denormalized primary-space pointer, tracked by change detection.
    pub space_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Create a fresh local item with a generated id.
    pub fn new(user_id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ids::new_id(),
            user_id: user_id.into(),
            title: title.into(),
            url: None,
            content: None,
            description: None,
            thumbnail_url: None,
            content_type: ContentType::default(),
            tags: Vec::new(),
            is_archived: false,
            space_id: None,
            created_at: now,
            updated_at: Some(now),
            is_deleted: false,
            deleted_at: None,
        }
    }

    /// Bump the mutation timestamp after a local edit.
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

impl Versioned for Item {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    fn sanitize(&mut self) {
        self.content_type = self.content_type.sanitized();
    }
}

impl SyncRecord for Item {
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

    fn tracked_field(&self) -> Option<String> {
        self.space_id.clone()
    }
}
