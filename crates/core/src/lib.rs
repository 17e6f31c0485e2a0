pub mod clock;
pub mod config;
pub mod metrics;
pub mod snapshot;
pub mod testing;
pub mod ticket;

pub use clock::{Clock, SystemClock};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, QueueConfig,
    ServerConfig, SnapshotConfig, DEFAULT_SERVICE_MINUTES, DEFAULT_SNAPSHOT_KEY,
};
pub use snapshot::{QueueSnapshot, SnapshotError, SnapshotStore, SqliteSnapshotStore};
pub use ticket::{
    format_code, CodeStyle, PatientInfo, PriorityClass, QueueError, QueueEvent, QueueObserver,
    QueueStats, QueueStore, RegisterRequest, RegistrationError, Ticket, TicketStatus,
    WaitingEntry,
};
