//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Queue operations (registrations, dispatches, completions, removals)
//! - Wait and service durations
//! - Snapshot persistence failures

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Queue Operations
// =============================================================================

/// Tickets registered by priority class.
pub static TICKETS_REGISTERED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("fila_tickets_registered_total", "Total tickets registered"),
        &["priority"], // "normal", "priority"
    )
    .unwrap()
});

/// Tickets called into service.
pub static TICKETS_CALLED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("fila_tickets_called_total", "Total tickets called into service").unwrap()
});

/// Tickets whose service was completed.
pub static TICKETS_COMPLETED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("fila_tickets_completed_total", "Total tickets completed").unwrap()
});

/// Tickets removed, by status at removal.
pub static TICKETS_REMOVED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("fila_tickets_removed_total", "Total tickets removed"),
        &["status"],
    )
    .unwrap()
});

/// Call-next requests that found nobody waiting.
pub static EMPTY_QUEUE_CALLS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "fila_empty_queue_calls_total",
        "Call-next requests with no waiting ticket",
    )
    .unwrap()
});

// =============================================================================
// Durations
// =============================================================================

/// Minutes from registration to call.
pub static WAIT_MINUTES: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("fila_wait_minutes", "Minutes waited before being called")
            .buckets(vec![1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 240.0]),
    )
    .unwrap()
});

/// Minutes from call to completion.
pub static SERVICE_MINUTES: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("fila_service_minutes", "Minutes spent in service")
            .buckets(vec![1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0]),
    )
    .unwrap()
});

// =============================================================================
// Persistence
// =============================================================================

/// Snapshot failures by operation.
pub static SNAPSHOT_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "fila_snapshot_failures_total",
            "Snapshot read/write failures (recovered locally)",
        ),
        &["operation"], // "load", "save", "parse", "serialize"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Queue operations
        Box::new(TICKETS_REGISTERED.clone()),
        Box::new(TICKETS_CALLED.clone()),
        Box::new(TICKETS_COMPLETED.clone()),
        Box::new(TICKETS_REMOVED.clone()),
        Box::new(EMPTY_QUEUE_CALLS.clone()),
        // Durations
        Box::new(WAIT_MINUTES.clone()),
        Box::new(SERVICE_MINUTES.clone()),
        // Persistence
        Box::new(SNAPSHOT_FAILURES.clone()),
    ]
}
