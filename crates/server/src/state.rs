use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fila_core::{Config, QueueEvent, QueueStore};

use crate::api::WsBroadcaster;

/// Shared application state
pub struct AppState {
    config: Config,
    queue: Mutex<QueueStore>,
    ws_broadcaster: WsBroadcaster,
}

impl AppState {
    /// Wrap a queue store, forwarding its events to WebSocket clients.
    pub fn new(config: Config, mut queue: QueueStore, ws_broadcaster: WsBroadcaster) -> Self {
        let broadcaster = ws_broadcaster.clone();
        queue.subscribe(Arc::new(move |event: &QueueEvent| {
            broadcaster.queue_event(event);
        }));

        Self {
            config,
            queue: Mutex::new(queue),
            ws_broadcaster,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lock the queue for one operation.
    ///
    /// Queue operations leave the store consistent even if a handler panics
    /// mid-request, so a poisoned lock is recovered rather than propagated.
    pub fn queue(&self) -> MutexGuard<'_, QueueStore> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ws_broadcaster(&self) -> &WsBroadcaster {
        &self.ws_broadcaster
    }
}
