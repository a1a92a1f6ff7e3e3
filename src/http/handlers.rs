//! Handlers for the `/echo` recording endpoint.
//!
//! # Responsibilities
//! - GET: list recorded requests as JSON, newest first
//! - POST: read the full body, capture headers, append to the store
//! - Map failures to status codes (unreadable body → 400, storage or
//!   serialization failure → 500) without leaking internal detail
//!
//! Method dispatch itself lives in the router: anything other than GET or
//! POST on `/echo` gets the method router's 405.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::server::AppState;
use crate::store::RecordedHeaders;

/// GET /echo — the full request history, newest first. An empty history is
/// `[]`, not an error.
pub async fn list_requests(State(state): State<AppState>) -> Response {
    let records = match state.store.list().await {
        Ok(records) => records,
        Err(error) => {
            tracing::error!(operation = "list", %error, "request store failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "storage error").into_response();
        }
    };

    match serde_json::to_vec(&records) {
        Ok(body) => (
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(operation = "list", %error, "response serialization failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "serialization error").into_response()
        }
    }
}

/// POST /echo — record body and headers. 200 with an empty body on
/// success; the recorded entry is visible to any GET that starts after
/// this response.
pub async fn record_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    // Read the entire payload up front; a body that cannot be fully read
    // creates no record.
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(%error, "request body could not be read");
            return (StatusCode::BAD_REQUEST, "body couldn't be read").into_response();
        }
    };

    let data = String::from_utf8_lossy(&bytes).into_owned();
    let headers = canonicalize_headers(&headers);

    match state.store.append(data, headers).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!(operation = "append", %error, "request store failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "storage error").into_response()
        }
    }
}

/// Convert the wire header map into the recorded form: conventional
/// `X-Header-Case` names (header names are case-insensitive; axum hands
/// them over lowercased), values in received order.
fn canonicalize_headers(headers: &HeaderMap) -> RecordedHeaders {
    let mut recorded = RecordedHeaders::new();
    for name in headers.keys() {
        let values = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();
        recorded.insert(canonical_name(name.as_str()), values);
    }
    recorded
}

/// `x-test-header` → `X-Test-Header`.
fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if c == '-' {
            out.push('-');
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use super::*;
    use crate::store::{MemoryStore, RecordedRequest, RequestStore};

    fn echo_router(store: Arc<dyn RequestStore>) -> Router {
        Router::new()
            .route("/echo", get(list_requests).post(record_request))
            .with_state(AppState { store })
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn canonical_name_matches_conventional_case() {
        assert_eq!(canonical_name("x-test-header"), "X-Test-Header");
        assert_eq!(canonical_name("content-type"), "Content-Type");
        assert_eq!(canonical_name("ACCEPT"), "Accept");
        assert_eq!(canonical_name("etag"), "Etag");
    }

    #[tokio::test]
    async fn get_on_empty_store_returns_empty_array() {
        let router = echo_router(Arc::new(MemoryStore::new()));

        let response = router
            .oneshot(Request::get("/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn post_then_get_round_trips() {
        let store: Arc<dyn RequestStore> = Arc::new(MemoryStore::new());
        let router = echo_router(store);

        let response = router
            .clone()
            .oneshot(
                Request::post("/echo")
                    .header("Content-Type", "text/plain")
                    .header("X-Test-Header", "test-value")
                    .body(Body::from("test data"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(Request::get("/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let records: Vec<RecordedRequest> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, "test data");
        assert_eq!(
            records[0].headers.get("X-Test-Header"),
            Some(&vec!["test-value".to_string()])
        );
        assert_eq!(
            records[0].headers.get("Content-Type"),
            Some(&vec!["text/plain".to_string()])
        );
    }

    #[tokio::test]
    async fn other_methods_get_405() {
        for method in ["PUT", "DELETE", "PATCH"] {
            let router = echo_router(Arc::new(MemoryStore::new()));
            let response = router
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri("/echo")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(
                response.status(),
                StatusCode::METHOD_NOT_ALLOWED,
                "method {method}"
            );
        }
    }

    #[tokio::test]
    async fn unreadable_body_is_400_and_records_nothing() {
        let store: Arc<dyn RequestStore> = Arc::new(MemoryStore::new());
        let router = echo_router(store.clone());

        let broken = Body::from_stream(futures_util::stream::once(async {
            Err::<axum::body::Bytes, std::io::Error>(std::io::Error::other("connection reset"))
        }));
        let response = router
            .oneshot(Request::post("/echo").body(broken).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reverse_order_over_many_posts() {
        let router = echo_router(Arc::new(MemoryStore::new()));

        for i in 0..3 {
            let response = router
                .clone()
                .oneshot(
                    Request::post("/echo")
                        .body(Body::from(format!("payload {i}")))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = router
            .oneshot(Request::get("/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let records: Vec<RecordedRequest> = serde_json::from_slice(&bytes).unwrap();
        let payloads: Vec<_> = records.iter().map(|r| r.data.as_str()).collect();
        assert_eq!(payloads, ["payload 2", "payload 1", "payload 0"]);
    }
}
