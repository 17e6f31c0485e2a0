//! Metrics middleware for API routes.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::metrics::{HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION};

/// Path label for requests no route matched.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Records duration, count and in-flight requests, labelled by method,
/// route template and status.
///
/// The route template (`/api/v1/tickets/{id}`) keeps the label set bounded no
/// matter what ids or junk paths clients send.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string());

    HTTP_REQUESTS_IN_FLIGHT.inc();
    let response = next.run(request).await;
    HTTP_REQUESTS_IN_FLIGHT.dec();

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &path, &status])
        .observe(duration);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn dummy_handler() -> &'static str {
        "OK"
    }

    #[tokio::test]
    async fn test_middleware_counts_requests() {
        let app = Router::new()
            .route("/counted", get(dummy_handler))
            .layer(middleware::from_fn(metrics_middleware));

        let before = HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/counted", "200"])
            .get();

        let request = Request::builder()
            .uri("/counted")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let after = HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/counted", "200"])
            .get();
        assert_eq!(after, before + 1);
    }

    #[tokio::test]
    async fn test_ids_share_route_label() {
        async fn thing() -> &'static str {
            "OK"
        }

        let app = Router::new()
            .route("/things/{id}", get(thing))
            .layer(middleware::from_fn(metrics_middleware));

        let before = HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/things/{id}", "200"])
            .get();

        for id in ["alpha-1", "beta-2", "gamma-3"] {
            let request = Request::builder()
                .uri(format!("/things/{}", id))
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let after = HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/things/{id}", "200"])
            .get();
        assert_eq!(after, before + 3);

        let output = crate::metrics::encode_metrics();
        assert!(!output.contains("alpha-1"));
        assert!(!output.contains("gamma-3"));
    }

    #[tokio::test]
    async fn test_unknown_paths_share_unmatched_label() {
        let app = Router::new()
            .route("/known", get(dummy_handler))
            .layer(middleware::from_fn(metrics_middleware));

        for path in ["/nowhere/one", "/nowhere/two"] {
            let request = Request::builder().uri(path).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }

        let unmatched = HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", UNMATCHED_PATH, "404"])
            .get();
        assert!(unmatched >= 2);
        assert!(!crate::metrics::encode_metrics().contains("/nowhere/"));
    }
}
