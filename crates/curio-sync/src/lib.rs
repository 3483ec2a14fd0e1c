//! # curio-sync
//!
//! The synchronization core: keeps the device-resident replica of a
//! user's collection consistent with the authoritative remote store
//! while remaining fully functional offline.
//!
//! Components:
//! - [`MutationQueue`]: durable FIFO of writes made while offline.
//! - [`conflict`]: newest-wins resolution with deterministic tie-break.
//! - [`reconcile`]: per-entity upload/tombstone/download passes.
//! - [`SyncEngine`]: orchestrates passes in dependency order behind a
//!   single-flight guard and publishes status to listeners.
//! - [`OrphanCleaner`]: local hygiene for children of vanished items.
//! - [`ConnectivityMonitor`]: reachability probe with a start/stop
//!   lifecycle, triggering a queue drain on reconnect.

pub mod conflict;
pub mod connectivity;
pub mod engine;
pub mod orphan;
pub mod queue;
pub mod reconcile;
pub mod remote;

pub use connectivity::ConnectivityMonitor;
pub use engine::{Projection, StatusListener, SyncEngine};
pub use orphan::OrphanCleaner;
pub use queue::{DrainReport, MutationQueue};
