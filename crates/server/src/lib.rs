//! HTTP and WebSocket front end for the fila queue.

pub mod api;
pub mod metrics;
pub mod state;
