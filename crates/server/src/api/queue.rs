//! Queue-wide handlers: dispatch, boards and statistics.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use fila_core::{PriorityClass, QueueStats, Ticket, WaitingEntry};

use super::error::ApiError;
use crate::state::AppState;

/// Board size when no limit is given (the admin panel shows five).
const DEFAULT_BOARD_LIMIT: usize = 5;

/// Response for call-next and last-called; `ticket` is null when there is none.
#[derive(Debug, Serialize)]
pub struct CalledResponse {
    pub ticket: Option<Ticket>,
}

#[derive(Debug, Deserialize)]
pub struct WaitingParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct WaitingResponse {
    pub entries: Vec<WaitingEntry>,
    /// Total waiting, regardless of limit.
    pub total_waiting: usize,
}

#[derive(Debug, Deserialize)]
pub struct NextCodeParams {
    #[serde(default)]
    pub priority: PriorityClass,
}

#[derive(Debug, Serialize)]
pub struct NextCodeResponse {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: QueueStats,
    pub expected_service_minutes: f64,
}

/// Move the next waiting ticket into service.
pub async fn call_next(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CalledResponse>, ApiError> {
    let ticket = state.queue().call_next()?;
    match &ticket {
        Some(t) => info!(ticket_id = %t.id, code = %t.code, "Ticket called"),
        None => debug!("Call-next on empty queue"),
    }
    Ok(Json(CalledResponse { ticket }))
}

pub async fn waiting(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WaitingParams>,
) -> Json<WaitingResponse> {
    let queue = state.queue();
    let limit = params.limit.unwrap_or(DEFAULT_BOARD_LIMIT);
    Json(WaitingResponse {
        entries: queue.waiting_board(limit),
        total_waiting: queue.stats().waiting,
    })
}

pub async fn next_code(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NextCodeParams>,
) -> Json<NextCodeResponse> {
    Json(NextCodeResponse {
        code: state.queue().next_code(params.priority),
    })
}

pub async fn last_called(State(state): State<Arc<AppState>>) -> Json<CalledResponse> {
    Json(CalledResponse {
        ticket: state.queue().last_called(),
    })
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    let queue = state.queue();
    Json(StatsResponse {
        stats: queue.stats(),
        expected_service_minutes: queue.expected_service_minutes(),
    })
}
