//! Testing utilities: a controllable clock and an in-memory snapshot slot.
//!
//! # Example
//!
//! ```rust,ignore
//! use fila_core::testing::{ManualClock, MemorySnapshotStore};
//!
//! let clock = Arc::new(ManualClock::default());
//! let snapshots = Arc::new(MemorySnapshotStore::new());
//! let store = QueueStore::new(QueueConfig::default())
//!     .with_clock(clock.clone())
//!     .with_snapshot_store(snapshots.clone(), "queue");
//! ```

mod manual_clock;
mod memory_snapshot;

pub use manual_clock::ManualClock;
pub use memory_snapshot::MemorySnapshotStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::ticket::{PatientInfo, PriorityClass, RegisterRequest};

    /// A patient with reasonable defaults.
    pub fn patient(name: &str) -> PatientInfo {
        PatientInfo::new(name, "consulta")
            .with_document("123.456.789-00")
            .with_age(40)
    }

    /// A registration request as a front end would submit it.
    pub fn register_request(name: &str, priority: PriorityClass) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.to_string()),
            document: None,
            age: None,
            category: None,
            notes: None,
            priority,
        }
    }
}
