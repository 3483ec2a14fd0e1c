//! 1:1 item child records: scraped metadata and type-specific payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::Versioned;

use super::content_type::ContentType;

/// Scraped page metadata, at most one per item. Keyed by the parent
/// item id; mutable on both replicas and resolved newest-wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    pub item_id: String,
    pub user_id: String,
    pub domain: Option<String>,
    pub author: Option<String>,
    pub username: Option<String>,
    pub profile_image: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Versioned for ItemMetadata {
    fn record_id(&self) -> &str {
        &self.item_id
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Type-specific payload, at most one per item. The `data` value is an
/// open-ended JSON object (video urls, image urls, platform fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTypeMetadata {
    pub item_id: String,
    pub user_id: String,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Versioned for ItemTypeMetadata {
    fn record_id(&self) -> &str {
        &self.item_id
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    fn sanitize(&mut self) {
        self.content_type = self.content_type.sanitized();
    }
}
