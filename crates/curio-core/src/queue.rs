//! Mutation queue entry model.
//!
//! Persisted shape: `{id, action_type, data, created_at, status}`.
//! The payload is a tagged union per action type, so dispatch never
//! needs unchecked casts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Item, VideoTranscript};
use crate::ids;

/// A pending local mutation, tagged by action type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action_type", content = "data", rename_all = "snake_case")]
pub enum QueueAction {
    CreateItem { item: Item },
    UpdateItem { item: Item },
    DeleteItem { item_id: String },
    AddItemToSpace { item_id: String, space_id: String },
    RemoveItemFromSpace { item_id: String, space_id: String },
    SaveVideoTranscript { transcript: VideoTranscript },
    DeleteVideoTranscript { item_id: String },
}

impl QueueAction {
    /// Stable action name, matching the persisted `action_type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            QueueAction::CreateItem { .. } => "create_item",
            QueueAction::UpdateItem { .. } => "update_item",
            QueueAction::DeleteItem { .. } => "delete_item",
            QueueAction::AddItemToSpace { .. } => "add_item_to_space",
            QueueAction::RemoveItemFromSpace { .. } => "remove_item_from_space",
            QueueAction::SaveVideoTranscript { .. } => "save_video_transcript",
            QueueAction::DeleteVideoTranscript { .. } => "delete_video_transcript",
        }
    }

    /// Subject identity for deduplication: the item id for item and
    /// transcript actions, the `(item_id, space_id)` pair for relation
    /// actions.
    pub fn subject(&self) -> String {
        match self {
            QueueAction::CreateItem { item } | QueueAction::UpdateItem { item } => item.id.clone(),
            QueueAction::DeleteItem { item_id }
            | QueueAction::DeleteVideoTranscript { item_id } => item_id.clone(),
            QueueAction::AddItemToSpace { item_id, space_id }
            | QueueAction::RemoveItemFromSpace { item_id, space_id } => {
                format!("{item_id}:{space_id}")
            }
            QueueAction::SaveVideoTranscript { transcript } => transcript.item_id.clone(),
        }
    }

    /// All ids this action references. Every one must pass the UUID
    /// shape check or the entry is discarded at drain time.
    pub fn subject_ids(&self) -> Vec<&str> {
        match self {
            QueueAction::CreateItem { item } | QueueAction::UpdateItem { item } => {
                vec![item.id.as_str()]
            }
            QueueAction::DeleteItem { item_id }
            | QueueAction::DeleteVideoTranscript { item_id } => vec![item_id.as_str()],
            QueueAction::AddItemToSpace { item_id, space_id }
            | QueueAction::RemoveItemFromSpace { item_id, space_id } => {
                vec![item_id.as_str(), space_id.as_str()]
            }
            QueueAction::SaveVideoTranscript { transcript } => vec![transcript.item_id.as_str()],
        }
    }

    /// Whether every referenced id has a valid shape.
    pub fn has_valid_ids(&self) -> bool {
        self.subject_ids().iter().all(|id| ids::is_valid_id(id))
    }
}

/// Replay status of a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    Pending,
    Synced,
    Failed,
}

/// One durable entry in the mutation queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: String,
    #[serde(flatten)]
    pub action: QueueAction,
    pub created_at: DateTime<Utc>,
    pub status: QueueStatus,
}

impl QueueEntry {
    pub fn new(action: QueueAction) -> Self {
        Self {
            id: ids::new_id(),
            action,
            created_at: Utc::now(),
            status: QueueStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == QueueStatus::Pending
    }
}
