//! Cache/remote reconciliation.
//!
//! The [`SyncCoordinator`] decides, per resource, whether to serve the
//! cached snapshot or fetch fresh data, and keeps the [`SyncStatus`]
//! record current. Remote failures never propagate past this module;
//! they degrade to the best cached value available.

pub mod coordinator;
pub mod status;

pub use coordinator::SyncCoordinator;
pub use status::{StatusStore, SyncStatus};
