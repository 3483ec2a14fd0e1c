//! Syncable entity models.
//!
//! Every entity shares the same envelope: immutable `id`, owner
//! `user_id`, `created_at`/`updated_at` timestamps, and (where the
//! entity supports soft deletion) the tombstone pair
//! `is_deleted`/`deleted_at`. `updated_at` is authoritative for
//! conflict resolution.

pub mod content_type;
pub mod item;
pub mod metadata;
pub mod relation;
pub mod space;
pub mod transcript;

pub use content_type::ContentType;
pub use item::Item;
pub use metadata::{ItemMetadata, ItemTypeMetadata};
pub use relation::ItemSpace;
pub use space::Space;
pub use transcript::VideoTranscript;
