//! Core ticket data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Classification
// ============================================================================

/// Priority class of a ticket. Priority tickets are always dispatched before
/// normal ones.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriorityClass {
    #[default]
    Normal,
    Priority,
}

impl PriorityClass {
    /// Returns the class name as used in JSON and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityClass::Normal => "normal",
            PriorityClass::Priority => "priority",
        }
    }
}

/// Service status of a ticket.
///
/// Advances only `Waiting -> InService -> Done`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Waiting,
    InService,
    Done,
}

impl TicketStatus {
    /// Returns the status name as used in JSON and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Waiting => "waiting",
            TicketStatus::InService => "in_service",
            TicketStatus::Done => "done",
        }
    }

    /// Parse a status name, as accepted in query filters.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "waiting" => Some(TicketStatus::Waiting),
            "in_service" => Some(TicketStatus::InService),
            "done" => Some(TicketStatus::Done),
            _ => None,
        }
    }

    /// Returns true once the ticket has been called.
    pub fn has_left_waiting(&self) -> bool {
        !matches!(self, TicketStatus::Waiting)
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Payload
// ============================================================================

/// Oldest age accepted at registration.
pub const MAX_AGE: u8 = 150;

/// Person the ticket was issued for. Opaque to the queue logic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    /// Requested service (e.g. "consulta", "vacina").
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PatientInfo {
    /// Create a payload with only the required fields.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document: None,
            age: None,
            category: category.into(),
            notes: None,
        }
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn with_age(mut self, age: u8) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Error raised when registration input is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("name is required")]
    MissingName,

    #[error("age must be between 0 and 150, got {0}")]
    InvalidAge(i64),
}

/// Raw registration input as submitted by a front end.
///
/// Everything is optional here; [`RegisterRequest::into_patient`] decides what
/// is required and normalizes the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub priority: PriorityClass,
}

impl RegisterRequest {
    /// Validate and normalize into a payload.
    ///
    /// Blank strings become `None`; a missing category takes `default_category`.
    pub fn into_patient(self, default_category: &str) -> Result<PatientInfo, RegistrationError> {
        let name = non_blank(self.name).ok_or(RegistrationError::MissingName)?;

        let age = match self.age {
            Some(age) if (0..=i64::from(MAX_AGE)).contains(&age) => Some(age as u8),
            Some(age) => return Err(RegistrationError::InvalidAge(age)),
            None => None,
        };

        Ok(PatientInfo {
            name,
            document: non_blank(self.document),
            age,
            category: non_blank(self.category).unwrap_or_else(|| default_category.to_string()),
            notes: non_blank(self.notes),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ============================================================================
// Ticket
// ============================================================================

/// One registered request for service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Sequence number assigned at creation.
    pub sequence: u64,
    /// Display code derived from sequence and priority at creation.
    pub code: String,
    pub priority: PriorityClass,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_ended_at: Option<DateTime<Utc>>,
    pub patient: PatientInfo,
}

impl Ticket {
    /// Minutes between registration and being called, once called.
    pub fn wait_minutes(&self) -> Option<f64> {
        self.service_started_at
            .map(|started| minutes_between(self.created_at, started))
    }

    /// Minutes between being called and completion, once done.
    pub fn service_minutes(&self) -> Option<f64> {
        match (self.service_started_at, self.service_ended_at) {
            (Some(started), Some(ended)) => Some(minutes_between(started, ended)),
            _ => None,
        }
    }

    /// Move to `InService`. Returns false if the ticket is not waiting.
    pub(crate) fn start_service(&mut self, now: DateTime<Utc>) -> bool {
        if self.status != TicketStatus::Waiting {
            return false;
        }
        self.status = TicketStatus::InService;
        self.service_started_at = Some(now);
        true
    }

    /// Move to `Done`. Returns false if the ticket is not in service.
    pub(crate) fn finish_service(&mut self, now: DateTime<Utc>) -> bool {
        if self.status != TicketStatus::InService {
            return false;
        }
        self.status = TicketStatus::Done;
        self.service_ended_at = Some(now);
        true
    }

    /// Checks that status and timestamps agree.
    pub(crate) fn is_consistent(&self) -> bool {
        match self.status {
            TicketStatus::Waiting => {
                self.service_started_at.is_none() && self.service_ended_at.is_none()
            }
            TicketStatus::InService => {
                self.service_started_at.is_some() && self.service_ended_at.is_none()
            }
            TicketStatus::Done => {
                self.service_started_at.is_some() && self.service_ended_at.is_some()
            }
        }
    }
}

fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds().max(0) as f64 / 60_000.0
}
