//! Ordering of waiting tickets for dispatch.
//!
//! Priority class first, then arrival time. Sorting is always done on a
//! borrowed view; the store's insertion order is never touched.

use std::cmp::Ordering;

use super::{PriorityClass, Ticket, TicketStatus};

/// Compare two tickets for dispatch. `Less` means `a` is served first.
pub fn compare(a: &Ticket, b: &Ticket) -> Ordering {
    class_rank(a.priority)
        .cmp(&class_rank(b.priority))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.sequence.cmp(&b.sequence))
}

fn class_rank(priority: PriorityClass) -> u8 {
    match priority {
        PriorityClass::Priority => 0,
        PriorityClass::Normal => 1,
    }
}

/// Waiting tickets in the order they would be called.
pub fn waiting_in_dispatch_order(tickets: &[Ticket]) -> Vec<&Ticket> {
    let mut waiting: Vec<&Ticket> = tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Waiting)
        .collect();
    waiting.sort_by(|a, b| compare(a, b));
    waiting
}

/// The ticket `call_next` would pick, if any.
pub fn next_waiting(tickets: &[Ticket]) -> Option<&Ticket> {
    tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Waiting)
        .min_by(|a, b| compare(a, b))
}
