use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, middleware::metrics_middleware, queue, tickets, ws};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Tickets
        .route(
            "/tickets",
            post(tickets::create_ticket).get(tickets::list_tickets),
        )
        .route(
            "/tickets/{id}",
            get(tickets::get_ticket).delete(tickets::delete_ticket),
        )
        .route("/tickets/{id}/complete", post(tickets::complete_ticket))
        // Queue
        .route("/queue/call-next", post(queue::call_next))
        .route("/queue/waiting", get(queue::waiting))
        .route("/queue/next-code", get(queue::next_code))
        .route("/queue/last-called", get(queue::last_called))
        .route("/stats", get(queue::stats))
        // Live updates
        .route("/ws", get(ws::ws_handler));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
