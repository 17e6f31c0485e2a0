//! Aggregate figures derived from the current queue contents.
//!
//! Everything here is recomputed from scratch on each call.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{Ticket, TicketStatus};
use crate::config::QueueConfig;

/// Point-in-time statistics over a set of tickets.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct QueueStats {
    pub total: usize,
    pub waiting: usize,
    pub in_service: usize,
    pub done: usize,
    /// Mean minutes from registration to call, over called tickets.
    pub average_wait_minutes: f64,
    /// Mean minutes from call to completion, over done tickets.
    pub average_service_minutes: f64,
    /// Ticket count per requested service.
    pub by_category: BTreeMap<String, usize>,
    /// Ticket count per priority class.
    pub by_priority: BTreeMap<String, usize>,
}

impl QueueStats {
    /// Compute statistics over `tickets`.
    pub fn compute(tickets: &[Ticket]) -> Self {
        let mut stats = QueueStats {
            total: tickets.len(),
            ..Default::default()
        };

        let mut waits = Vec::new();
        let mut services = Vec::new();

        for ticket in tickets {
            match ticket.status {
                TicketStatus::Waiting => stats.waiting += 1,
                TicketStatus::InService => stats.in_service += 1,
                TicketStatus::Done => stats.done += 1,
            }

            if ticket.status.has_left_waiting() {
                waits.push(ticket.wait_minutes().unwrap_or(0.0));
            }
            if ticket.status == TicketStatus::Done {
                services.push(ticket.service_minutes().unwrap_or(0.0));
            }

            *stats
                .by_category
                .entry(ticket.patient.category.clone())
                .or_insert(0) += 1;
            *stats
                .by_priority
                .entry(ticket.priority.as_str().to_string())
                .or_insert(0) += 1;
        }

        stats.average_wait_minutes = mean(&waits);
        stats.average_service_minutes = mean(&services);
        stats
    }

    /// Estimated minutes until the ticket at `position` (1-based) is called.
    ///
    /// Uses the observed mean service time once any ticket is done; before that,
    /// the configured minutes for `category`, or the default per-ticket figure.
    pub fn estimated_wait_for_position(
        &self,
        position: usize,
        category: Option<&str>,
        config: &QueueConfig,
    ) -> f64 {
        let per_ticket = if self.done > 0 {
            self.average_service_minutes
        } else {
            let minutes = match category {
                Some(category) => config.minutes_for(category),
                None => config.default_service_minutes,
            };
            f64::from(minutes)
        };
        position as f64 * per_ticket
    }
}

/// Mean configured service minutes across waiting tickets, 0 when none wait.
pub fn expected_service_minutes(tickets: &[Ticket], config: &QueueConfig) -> f64 {
    let expected: Vec<f64> = tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Waiting)
        .map(|t| f64::from(config.minutes_for(&t.patient.category)))
        .collect();
    mean(&expected)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
