//! Seam traits: local persistence, remote API, and record envelopes.

pub mod record;
pub mod remote;
pub mod store;

pub use record::{SyncRecord, Versioned};
pub use remote::RemoteStore;
pub use store::CollectionStore;
