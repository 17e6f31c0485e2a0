//! Ticket queue: model, display codes, dispatch order, store and statistics.

mod dispatch;
mod events;
mod format;
mod stats;
mod store;
mod types;

pub use dispatch::{compare, next_waiting, waiting_in_dispatch_order};
pub use events::{QueueEvent, QueueObserver};
pub use format::{format_code, CodeStyle};
pub use stats::{expected_service_minutes, QueueStats};
pub use store::{QueueError, QueueStore, WaitingEntry};
pub use types::{
    PatientInfo, PriorityClass, RegisterRequest, RegistrationError, Ticket, TicketStatus, MAX_AGE,
};
