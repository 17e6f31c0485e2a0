//! Best-effort durable copy of the queue state.

mod sqlite;
mod types;

pub use sqlite::SqliteSnapshotStore;
pub use types::{QueueSnapshot, SnapshotError};

/// A keyed slot holding a serialized snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>, SnapshotError>;

    /// Replace the value stored under `key`.
    fn save(&self, key: &str, value: &str) -> Result<(), SnapshotError>;
}
