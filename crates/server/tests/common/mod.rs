//! Common test utilities for in-process API testing.
//!
//! The fixture builds the real router over a queue wired to a manual clock and
//! an in-memory snapshot slot, so tests control time and can inspect what was
//! persisted without touching disk.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use fila_core::{
    testing::{ManualClock, MemorySnapshotStore},
    Config, QueueConfig, QueueStore, DEFAULT_SNAPSHOT_KEY,
};
use fila_server::api::WsBroadcaster;
use fila_server::state::AppState;

/// Re-export fixtures for test convenience
pub use fila_core::testing::fixtures;

/// Test fixture with a controllable clock and snapshot slot.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_register() {
///     let fixture = TestFixture::new();
///     let response = fixture.post("/api/v1/tickets", json!({"name": "Ana"})).await;
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    pub router: Router,
    pub clock: Arc<ManualClock>,
    pub snapshots: Arc<MemorySnapshotStore>,
    pub state: Arc<AppState>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    pub fn new() -> Self {
        Self::with_queue_config(QueueConfig::default())
    }

    pub fn with_queue_config(queue_config: QueueConfig) -> Self {
        Self::with_snapshots(queue_config, Arc::new(MemorySnapshotStore::new()))
    }

    /// Build over an existing snapshot slot, e.g. one seeded with prior state.
    pub fn with_snapshots(queue_config: QueueConfig, snapshots: Arc<MemorySnapshotStore>) -> Self {
        let clock = Arc::new(ManualClock::default());
        let config = Config {
            queue: queue_config.clone(),
            ..Default::default()
        };

        let queue = QueueStore::new(queue_config)
            .with_clock(clock.clone())
            .with_snapshot_store(snapshots.clone(), DEFAULT_SNAPSHOT_KEY);

        let state = Arc::new(AppState::new(config, queue, WsBroadcaster::default()));
        let router = fila_server::api::create_router(Arc::clone(&state));

        Self {
            router,
            clock,
            snapshots,
            state,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// POST with no body, for action endpoints.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// POST a raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// GET returning the raw body text (for non-JSON endpoints).
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    /// Register a ticket and return its JSON.
    pub async fn register(&self, name: &str, priority: &str) -> Value {
        let response = self
            .post(
                "/api/v1/tickets",
                serde_json::json!({ "name": name, "priority": priority }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
