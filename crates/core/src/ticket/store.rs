//! In-memory queue of tickets.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::dispatch;
use super::format::format_code;
use super::stats::{self, QueueStats};
use super::{
    PatientInfo, PriorityClass, QueueEvent, QueueObserver, RegisterRequest, RegistrationError,
    Ticket, TicketStatus,
};
use crate::clock::{Clock, SystemClock};
use crate::config::QueueConfig;
use crate::metrics;
use crate::snapshot::{QueueSnapshot, SnapshotStore};

/// Error type for queue operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// No ticket with this id.
    #[error("Ticket not found: {0}")]
    NotFound(String),

    /// Operation not allowed from the ticket's current status.
    #[error("Cannot {operation} ticket {ticket_id}: current status is {status}")]
    InvalidTransition {
        ticket_id: String,
        status: TicketStatus,
        operation: &'static str,
    },

    /// Every service slot is occupied.
    #[error("All {limit} service slots are busy")]
    NoFreeSlot { limit: usize },
}

/// A waiting ticket with its place in line.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WaitingEntry {
    /// 1-based position in dispatch order.
    pub position: usize,
    pub estimated_wait_minutes: f64,
    pub ticket: Ticket,
}

struct Persistence {
    store: Arc<dyn SnapshotStore>,
    key: String,
}

/// The queue: a sequence counter plus tickets in insertion order.
///
/// All operations run to completion on `&mut self`; share it behind a lock if
/// several callers need it.
pub struct QueueStore {
    config: QueueConfig,
    next_sequence: u64,
    tickets: Vec<Ticket>,
    clock: Arc<dyn Clock>,
    persistence: Option<Persistence>,
    observers: Vec<QueueObserver>,
}

impl QueueStore {
    /// Create an empty queue using the system clock and no persistence.
    pub fn new(config: QueueConfig) -> Self {
        Self {
            config,
            next_sequence: 0,
            tickets: Vec::new(),
            clock: Arc::new(SystemClock),
            persistence: None,
            observers: Vec::new(),
        }
    }

    /// Use a different time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Attach a snapshot slot and restore whatever it holds.
    ///
    /// A missing, unreadable or malformed snapshot yields an empty queue.
    pub fn with_snapshot_store(mut self, store: Arc<dyn SnapshotStore>, key: impl Into<String>) -> Self {
        let key = key.into();

        let snapshot = match store.load(&key) {
            Ok(Some(raw)) => QueueSnapshot::parse_or_default(&raw),
            Ok(None) => {
                debug!("No stored snapshot under key {}", key);
                QueueSnapshot::default()
            }
            Err(e) => {
                warn!("Failed to read queue snapshot: {}", e);
                metrics::SNAPSHOT_FAILURES.with_label_values(&["load"]).inc();
                QueueSnapshot::default()
            }
        };

        info!(
            "Restored queue: {} tickets, last sequence {}",
            snapshot.tickets.len(),
            snapshot.last_sequence
        );

        self.next_sequence = snapshot.last_sequence;
        self.tickets = snapshot.tickets;
        self.persistence = Some(Persistence { store, key });
        self
    }

    /// Register an observer called after every successful mutation.
    pub fn subscribe(&mut self, observer: QueueObserver) {
        self.observers.push(observer);
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Last sequence number handed out (0 before the first registration).
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Issue a new ticket at the back of the queue.
    pub fn register(&mut self, patient: PatientInfo, priority: PriorityClass) -> Ticket {
        let sequence = self.next_sequence + 1;
        self.next_sequence = sequence;

        let ticket = Ticket {
            id: uuid::Uuid::new_v4().to_string(),
            sequence,
            code: format_code(sequence, priority, self.config.code_style),
            priority,
            status: TicketStatus::Waiting,
            created_at: self.clock.now(),
            service_started_at: None,
            service_ended_at: None,
            patient,
        };
        self.tickets.push(ticket.clone());

        info!(
            "Registered ticket {} ({}, {})",
            ticket.code,
            ticket.priority.as_str(),
            ticket.patient.category
        );
        metrics::TICKETS_REGISTERED
            .with_label_values(&[priority.as_str()])
            .inc();

        self.persist();
        self.notify(&QueueEvent::TicketRegistered {
            ticket_id: ticket.id.clone(),
            code: ticket.code.clone(),
            priority,
            category: ticket.patient.category.clone(),
        });

        ticket
    }

    /// Validate raw input, then register it.
    pub fn register_request(&mut self, request: RegisterRequest) -> Result<Ticket, RegistrationError> {
        let priority = request.priority;
        let patient = request.into_patient(&self.config.default_category)?;
        Ok(self.register(patient, priority))
    }

    /// Call the next waiting ticket into service.
    ///
    /// `Ok(None)` means nobody is waiting.
    pub fn call_next(&mut self) -> Result<Option<Ticket>, QueueError> {
        let Some(next_id) = dispatch::next_waiting(&self.tickets).map(|t| t.id.clone()) else {
            debug!("Call next: queue is empty");
            metrics::EMPTY_QUEUE_CALLS.inc();
            return Ok(None);
        };

        if let Some(limit) = self.config.max_in_service {
            if self.count_with_status(TicketStatus::InService) >= limit {
                return Err(QueueError::NoFreeSlot { limit });
            }
        }

        let now = self.clock.now();
        let ticket = self
            .find_mut(&next_id)
            .ok_or_else(|| QueueError::NotFound(next_id.clone()))?;
        ticket.start_service(now);
        let ticket = ticket.clone();

        let wait_minutes = ticket.wait_minutes().unwrap_or(0.0);
        info!("Called ticket {} after {:.1} min", ticket.code, wait_minutes);
        metrics::TICKETS_CALLED.inc();
        metrics::WAIT_MINUTES.observe(wait_minutes);

        self.persist();
        self.notify(&QueueEvent::TicketCalled {
            ticket_id: ticket.id.clone(),
            code: ticket.code.clone(),
            wait_minutes,
        });

        Ok(Some(ticket))
    }

    /// Finish service for a ticket that is in service.
    pub fn complete(&mut self, id: &str) -> Result<Ticket, QueueError> {
        let now = self.clock.now();
        let ticket = self
            .find_mut(id)
            .ok_or_else(|| QueueError::NotFound(id.to_string()))?;

        if !ticket.finish_service(now) {
            return Err(QueueError::InvalidTransition {
                ticket_id: id.to_string(),
                status: ticket.status,
                operation: "complete",
            });
        }
        let ticket = ticket.clone();

        let service_minutes = ticket.service_minutes().unwrap_or(0.0);
        info!("Completed ticket {} after {:.1} min", ticket.code, service_minutes);
        metrics::TICKETS_COMPLETED.inc();
        metrics::SERVICE_MINUTES.observe(service_minutes);

        self.persist();
        self.notify(&QueueEvent::TicketCompleted {
            ticket_id: ticket.id.clone(),
            code: ticket.code.clone(),
            service_minutes,
        });

        Ok(ticket)
    }

    /// Delete a ticket whatever its status. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.tickets.iter().position(|t| t.id == id) else {
            return false;
        };
        let ticket = self.tickets.remove(index);

        info!("Removed ticket {} ({})", ticket.code, ticket.status);
        metrics::TICKETS_REMOVED
            .with_label_values(&[ticket.status.as_str()])
            .inc();

        self.persist();
        self.notify(&QueueEvent::TicketRemoved {
            ticket_id: ticket.id,
            code: ticket.code,
            status: ticket.status,
        });

        true
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// All tickets in insertion order.
    pub fn snapshot(&self) -> Vec<Ticket> {
        self.tickets.clone()
    }

    /// Tickets with the given status, in insertion order.
    pub fn tickets_with_status(&self, status: TicketStatus) -> Vec<Ticket> {
        self.tickets
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<Ticket> {
        self.tickets.iter().find(|t| t.id == id).cloned()
    }

    /// Code the next registration of this class would receive.
    pub fn next_code(&self, priority: PriorityClass) -> String {
        format_code(self.next_sequence + 1, priority, self.config.code_style)
    }

    /// Waiting tickets in dispatch order.
    pub fn waiting(&self) -> Vec<Ticket> {
        dispatch::waiting_in_dispatch_order(&self.tickets)
            .into_iter()
            .cloned()
            .collect()
    }

    /// 1-based position of a waiting ticket in dispatch order.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        dispatch::waiting_in_dispatch_order(&self.tickets)
            .iter()
            .position(|t| t.id == id)
            .map(|idx| idx + 1)
    }

    /// The first `limit` waiting tickets with position and estimated wait.
    pub fn waiting_board(&self, limit: usize) -> Vec<WaitingEntry> {
        let stats = self.stats();
        dispatch::waiting_in_dispatch_order(&self.tickets)
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(idx, ticket)| {
                let position = idx + 1;
                WaitingEntry {
                    position,
                    estimated_wait_minutes: stats.estimated_wait_for_position(
                        position,
                        Some(ticket.patient.category.as_str()),
                        &self.config,
                    ),
                    ticket: ticket.clone(),
                }
            })
            .collect()
    }

    /// The most recently called ticket still in the queue.
    pub fn last_called(&self) -> Option<Ticket> {
        self.tickets
            .iter()
            .filter(|t| t.service_started_at.is_some())
            .max_by_key(|t| (t.service_started_at, t.sequence))
            .cloned()
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats::compute(&self.tickets)
    }

    /// Estimated minutes until position `position` is called.
    pub fn estimated_wait_for_position(&self, position: usize, category: Option<&str>) -> f64 {
        self.stats()
            .estimated_wait_for_position(position, category, &self.config)
    }

    /// Mean configured service minutes over waiting tickets.
    pub fn expected_service_minutes(&self) -> f64 {
        stats::expected_service_minutes(&self.tickets, &self.config)
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn find_mut(&mut self, id: &str) -> Option<&mut Ticket> {
        self.tickets.iter_mut().find(|t| t.id == id)
    }

    fn count_with_status(&self, status: TicketStatus) -> usize {
        self.tickets.iter().filter(|t| t.status == status).count()
    }

    /// Write the current state to the snapshot slot, if any. Failures are
    /// logged and otherwise ignored.
    fn persist(&self) {
        let Some(persistence) = &self.persistence else {
            return;
        };

        let snapshot = QueueSnapshot {
            last_sequence: self.next_sequence,
            tickets: self.tickets.clone(),
        };

        let json = match snapshot.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize queue snapshot: {}", e);
                metrics::SNAPSHOT_FAILURES
                    .with_label_values(&["serialize"])
                    .inc();
                return;
            }
        };

        if let Err(e) = persistence.store.save(&persistence.key, &json) {
            warn!("Failed to save queue snapshot: {}", e);
            metrics::SNAPSHOT_FAILURES.with_label_values(&["save"]).inc();
        }
    }

    fn notify(&self, event: &QueueEvent) {
        for observer in &self.observers {
            observer(event);
        }
    }
}
