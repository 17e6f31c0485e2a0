//! Ticket API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use fila_core::{QueueStore, RegisterRequest, Ticket, TicketStatus};

use super::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing tickets
#[derive(Debug, Deserialize)]
pub struct ListTicketsParams {
    /// Filter by status (`waiting`, `in_service`, `done`)
    pub status: Option<String>,
}

/// A ticket plus where it stands in line, for waiting tickets.
#[derive(Debug, Serialize)]
pub struct TicketResponse {
    #[serde(flatten)]
    pub ticket: Ticket,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_wait_minutes: Option<f64>,
}

impl TicketResponse {
    fn build(queue: &QueueStore, ticket: Ticket) -> Self {
        let position = queue.position_of(&ticket.id);
        let estimated_wait_minutes = position.map(|p| {
            queue.estimated_wait_for_position(p, Some(ticket.patient.category.as_str()))
        });
        Self {
            ticket,
            position,
            estimated_wait_minutes,
        }
    }
}

/// Response for listing tickets
#[derive(Debug, Serialize)]
pub struct ListTicketsResponse {
    pub tickets: Vec<Ticket>,
    pub total: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// Register a new ticket
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TicketResponse>), ApiError> {
    let mut queue = state.queue();
    let ticket = queue.register_request(body)?;
    info!(ticket_id = %ticket.id, code = %ticket.code, "Ticket registered");
    Ok((StatusCode::CREATED, Json(TicketResponse::build(&queue, ticket))))
}

/// List tickets in registration order, optionally filtered by status
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTicketsParams>,
) -> Result<Json<ListTicketsResponse>, ApiError> {
    let queue = state.queue();
    let tickets = match params.status.as_deref() {
        Some(raw) => {
            let status = TicketStatus::parse(raw)
                .ok_or_else(|| ApiError::bad_request(format!("Unknown status: {}", raw)))?;
            queue.tickets_with_status(status)
        }
        None => queue.snapshot(),
    };

    Ok(Json(ListTicketsResponse {
        total: tickets.len(),
        tickets,
    }))
}

/// Get a ticket by ID
pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TicketResponse>, ApiError> {
    let queue = state.queue();
    let ticket = queue.get(&id).ok_or_else(|| ApiError::not_found(&id))?;
    Ok(Json(TicketResponse::build(&queue, ticket)))
}

/// Remove a ticket regardless of status
pub async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.queue().remove(&id) {
        info!(ticket_id = %id, "Ticket removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(&id))
    }
}

/// Finish service for an in-service ticket
pub async fn complete_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Ticket>, ApiError> {
    let ticket = state.queue().complete(&id)?;
    info!(ticket_id = %ticket.id, code = %ticket.code, "Ticket completed");
    Ok(Json(ticket))
}
