//! Stored form of the queue and the checks applied when reading it back.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ticket::Ticket;

/// Errors from reading or writing the snapshot slot.
///
/// These never reach queue callers; the store logs them and carries on with
/// its in-memory state.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot storage error: {0}")]
    Storage(String),

    #[error("Malformed snapshot: {0}")]
    Malformed(String),

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(String),
}

/// Durable copy of the queue: the sequence counter plus every ticket, in
/// insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    pub last_sequence: u64,
    pub tickets: Vec<Ticket>,
}

impl QueueSnapshot {
    /// Parse and check a stored snapshot.
    ///
    /// Rejects wrong types, missing fields, tickets whose status and
    /// timestamps disagree, duplicate ids or sequences, and tickets numbered
    /// past `lastSequence`.
    pub fn parse(raw: &str) -> Result<Self, SnapshotError> {
        let snapshot: QueueSnapshot =
            serde_json::from_str(raw).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
        snapshot.check()?;
        Ok(snapshot)
    }

    /// Parse a stored snapshot, falling back to an empty queue on any problem.
    pub fn parse_or_default(raw: &str) -> Self {
        match Self::parse(raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Discarding stored queue snapshot: {}", e);
                crate::metrics::SNAPSHOT_FAILURES
                    .with_label_values(&["parse"])
                    .inc();
                Self::default()
            }
        }
    }

    /// Serialize to the stored JSON form.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::Serialize(e.to_string()))
    }

    fn check(&self) -> Result<(), SnapshotError> {
        // The next registration must still have a sequence number to take
        if self.last_sequence == u64::MAX {
            return Err(SnapshotError::Malformed(
                "lastSequence leaves no room for another ticket".to_string(),
            ));
        }

        let mut ids = HashSet::new();
        let mut sequences = HashSet::new();

        for ticket in &self.tickets {
            if !ids.insert(ticket.id.as_str()) {
                return Err(SnapshotError::Malformed(format!(
                    "duplicate ticket id {}",
                    ticket.id
                )));
            }
            if !sequences.insert(ticket.sequence) {
                return Err(SnapshotError::Malformed(format!(
                    "duplicate sequence {}",
                    ticket.sequence
                )));
            }
            if ticket.sequence > self.last_sequence {
                return Err(SnapshotError::Malformed(format!(
                    "ticket sequence {} exceeds lastSequence {}",
                    ticket.sequence, self.last_sequence
                )));
            }
            if !ticket.is_consistent() {
                return Err(SnapshotError::Malformed(format!(
                    "ticket {} is {} but its timestamps disagree",
                    ticket.id, ticket.status
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::{PatientInfo, PriorityClass, TicketStatus};
    use chrono::{TimeZone, Utc};

    fn ticket(id: &str, sequence: u64) -> Ticket {
        Ticket {
            id: id.to_string(),
            sequence,
            code: format!("A-{:03}", sequence),
            priority: PriorityClass::Normal,
            status: TicketStatus::Waiting,
            created_at: Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap(),
            service_started_at: None,
            service_ended_at: None,
            patient: PatientInfo::new("Ana", "consulta"),
        }
    }

    #[test]
    fn test_parse_valid_snapshot() {
        let snapshot = QueueSnapshot {
            last_sequence: 2,
            tickets: vec![ticket("a", 1), ticket("b", 2)],
        };
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"lastSequence\":2"));

        let parsed = QueueSnapshot::parse(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_parse_wrong_type_fails() {
        let result = QueueSnapshot::parse(r#"{"lastSequence": "abc"}"#);
        assert!(matches!(result, Err(SnapshotError::Malformed(_))));
    }

    #[test]
    fn test_parse_or_default_on_garbage() {
        for raw in [
            r#"{"lastSequence": "abc"}"#,
            r#"{"tickets": []}"#,
            r#"{"lastSequence": 3, "tickets": {}}"#,
            "[1, 2, 3]",
            "not json at all",
            "",
        ] {
            let snapshot = QueueSnapshot::parse_or_default(raw);
            assert_eq!(snapshot.last_sequence, 0, "input: {}", raw);
            assert!(snapshot.tickets.is_empty(), "input: {}", raw);
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let snapshot = QueueSnapshot {
            last_sequence: 2,
            tickets: vec![ticket("a", 1), ticket("a", 2)],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(QueueSnapshot::parse(&json).is_err());
    }

    #[test]
    fn test_duplicate_sequences_rejected() {
        let snapshot = QueueSnapshot {
            last_sequence: 2,
            tickets: vec![ticket("a", 2), ticket("b", 2)],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(QueueSnapshot::parse(&json).is_err());
    }

    #[test]
    fn test_sequence_past_counter_rejected() {
        let snapshot = QueueSnapshot {
            last_sequence: 1,
            tickets: vec![ticket("a", 5)],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(QueueSnapshot::parse(&json).is_err());
    }

    #[test]
    fn test_inconsistent_status_rejected() {
        let mut bad = ticket("a", 1);
        bad.status = TicketStatus::InService;
        let snapshot = QueueSnapshot {
            last_sequence: 1,
            tickets: vec![bad],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(QueueSnapshot::parse(&json).is_err());
    }

    #[test]
    fn test_counter_may_exceed_tickets() {
        // Removed tickets leave gaps below the counter
        let snapshot = QueueSnapshot {
            last_sequence: 9,
            tickets: vec![ticket("a", 4)],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(QueueSnapshot::parse(&json).unwrap().last_sequence, 9);
    }

    #[test]
    fn test_exhausted_counter_rejected() {
        let raw = format!(r#"{{"lastSequence": {}, "tickets": []}}"#, u64::MAX);
        assert!(matches!(
            QueueSnapshot::parse(&raw),
            Err(SnapshotError::Malformed(_))
        ));
        assert_eq!(QueueSnapshot::parse_or_default(&raw), QueueSnapshot::default());
    }
}
