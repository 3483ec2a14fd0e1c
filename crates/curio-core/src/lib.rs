//! # curio-core
//!
//! Foundation crate for the curio offline-first sync system.
//! Defines all entity types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod entity;
pub mod errors;
pub mod ids;
pub mod queue;
pub mod status;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::SyncConfig;
pub use constants::CollectionKey;
pub use entity::{
    ContentType, Item, ItemMetadata, ItemSpace, ItemTypeMetadata, Space, VideoTranscript,
};
pub use errors::{CurioError, CurioResult, RemoteError, StoreError};
pub use queue::{QueueAction, QueueEntry, QueueStatus};
pub use status::{CleanupReport, SyncResult, SyncStatus};
pub use traits::{CollectionStore, RemoteStore, SyncRecord, Versioned};
