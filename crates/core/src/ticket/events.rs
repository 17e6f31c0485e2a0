//! Queue change notifications.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{PriorityClass, TicketStatus};

/// A change to the queue, delivered to observers after each mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueueEvent {
    TicketRegistered {
        ticket_id: String,
        code: String,
        priority: PriorityClass,
        category: String,
    },
    TicketCalled {
        ticket_id: String,
        code: String,
        wait_minutes: f64,
    },
    TicketCompleted {
        ticket_id: String,
        code: String,
        service_minutes: f64,
    },
    TicketRemoved {
        ticket_id: String,
        code: String,
        /// Status at the time of removal.
        status: TicketStatus,
    },
}

impl QueueEvent {
    /// Returns the event type as a string.
    pub fn event_type(&self) -> &'static str {
        match self {
            QueueEvent::TicketRegistered { .. } => "ticket_registered",
            QueueEvent::TicketCalled { .. } => "ticket_called",
            QueueEvent::TicketCompleted { .. } => "ticket_completed",
            QueueEvent::TicketRemoved { .. } => "ticket_removed",
        }
    }

    /// Returns the ticket this event is about.
    pub fn ticket_id(&self) -> &str {
        match self {
            QueueEvent::TicketRegistered { ticket_id, .. }
            | QueueEvent::TicketCalled { ticket_id, .. }
            | QueueEvent::TicketCompleted { ticket_id, .. }
            | QueueEvent::TicketRemoved { ticket_id, .. } => ticket_id,
        }
    }
}

/// Callback invoked synchronously with every queue event.
pub type QueueObserver = Arc<dyn Fn(&QueueEvent) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = QueueEvent::TicketCalled {
            ticket_id: "abc".to_string(),
            code: "A-001".to_string(),
            wait_minutes: 2.5,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ticket_called");
        assert_eq!(json["code"], "A-001");
        assert_eq!(event.event_type(), "ticket_called");
        assert_eq!(event.ticket_id(), "abc");
    }

    #[test]
    fn test_removed_event_carries_status() {
        let event = QueueEvent::TicketRemoved {
            ticket_id: "abc".to_string(),
            code: "N004".to_string(),
            status: TicketStatus::InService,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["status"], "in_service");
    }
}
