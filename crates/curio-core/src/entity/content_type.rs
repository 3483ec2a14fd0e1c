//! Content type classification for items.

use serde::{Deserialize, Serialize};

/// The kind of content an item holds.
///
/// Deserialization never fails on an unrecognized value: anything
/// outside the closed set maps to `Unknown`, and sanitization coerces
/// `Unknown` to the default before the record is persisted or uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Article,
    Video,
    Image,
    Audio,
    Note,
    #[default]
    Link,
    #[serde(other)]
    Unknown,
}

impl ContentType {
    /// Coerce `Unknown` to the safe default. Known values pass through.
    pub fn sanitized(self) -> Self {
        match self {
            ContentType::Unknown => ContentType::default(),
            known => known,
        }
    }
}
