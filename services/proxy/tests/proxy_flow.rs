//! Proxy endpoint tests against a fake upstream on a loopback port.
//!
//! Covers credential injection, query forwarding, default parameters and
//! the uniform 500 failure body for every failure category.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use sentiment_proxy::config::ProxyConfig;
use sentiment_proxy::router::create_router;
use sentiment_proxy::state::AppState;
use sentiment_types::wire::ErrorBody;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;

#[derive(Debug, Clone)]
struct SeenRequest {
    query: HashMap<String, String>,
    authorization: Option<String>,
}

#[derive(Clone)]
struct FakeUpstream {
    status: StatusCode,
    body: Value,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

async fn upstream_handler(
    State(fake): State<FakeUpstream>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    fake.seen.lock().unwrap().push(SeenRequest {
        query,
        authorization,
    });
    (fake.status, Json(fake.body.clone()))
}

/// Start a fake upstream and return its list URL and request log.
async fn spawn_upstream(status: StatusCode, body: Value) -> (String, Arc<Mutex<Vec<SeenRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let fake = FakeUpstream {
        status,
        body,
        seen: Arc::clone(&seen),
    };
    let app = Router::new()
        .route("/coins/list/v2", get(upstream_handler))
        .with_state(fake);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{}/coins/list/v2", addr), seen)
}

fn proxy(upstream_url: String, api_key: Option<&str>) -> Router {
    let config = ProxyConfig {
        api_key: api_key.map(str::to_string),
        upstream_url,
        upstream_timeout_ms: 2_000,
        ..ProxyConfig::default()
    };
    create_router(AppState::new(config).unwrap())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn list_body() -> Value {
    json!({
        "config": { "sort": "sentiment", "limit": 2 },
        "data": [
            { "id": 1, "symbol": "BTC", "sentiment": 81 },
            { "id": 2, "symbol": "ETH", "sentiment": 77 }
        ]
    })
}

#[tokio::test]
async fn test_forwards_query_and_credential() {
    let (url, seen) = spawn_upstream(StatusCode::OK, list_body()).await;
    let app = proxy(url, Some("test-key"));

    let (status, body) = get_json(app, "/api/sentiment?desc=1&limit=50").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, list_body());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer test-key"));
    assert_eq!(seen[0].query.get("sort").map(String::as_str), Some("sentiment"));
    assert_eq!(seen[0].query.get("limit").map(String::as_str), Some("50"));
    assert_eq!(seen[0].query.get("desc").map(String::as_str), Some("1"));
}

#[tokio::test]
async fn test_defaults_when_query_absent() {
    let (url, seen) = spawn_upstream(StatusCode::OK, list_body()).await;
    let app = proxy(url, Some("test-key"));

    let (status, _) = get_json(app, "/api/sentiment").await;
    assert_eq!(status, StatusCode::OK);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].query.get("limit").map(String::as_str), Some("30"));
    assert!(!seen[0].query.contains_key("desc"));
}

#[tokio::test]
async fn test_ascending_flag_omits_desc() {
    let (url, seen) = spawn_upstream(StatusCode::OK, list_body()).await;
    let app = proxy(url, Some("test-key"));

    let (status, _) = get_json(app, "/api/sentiment?desc=0&limit=10").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!seen.lock().unwrap()[0].query.contains_key("desc"));
}

#[tokio::test]
async fn test_missing_credential_skips_upstream() {
    let (url, seen) = spawn_upstream(StatusCode::OK, list_body()).await;
    let app = proxy(url, None);

    let (status, body) = get_json(app, "/api/sentiment?desc=1&limit=10").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorBody = serde_json::from_value(body).unwrap();
    assert_eq!(body.code.as_deref(), Some("MISSING_CREDENTIAL"));
    assert!(body.error.contains("LUNARCRUSH_API_KEY"));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_limit_uses_default() {
    let (url, seen) = spawn_upstream(StatusCode::OK, list_body()).await;
    let app = proxy(url, Some("test-key"));

    let (status, _) = get_json(app, "/api/sentiment?desc=1&limit=").await;
    assert_eq!(status, StatusCode::OK);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].query.get("limit").map(String::as_str), Some("30"));
    assert_eq!(seen[0].query.get("desc").map(String::as_str), Some("1"));
}

#[tokio::test]
async fn test_malformed_limit_is_uniform_failure() {
    let (url, seen) = spawn_upstream(StatusCode::OK, list_body()).await;
    let app = proxy(url, Some("test-key"));

    let (status, body) = get_json(app, "/api/sentiment?limit=abc").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorBody = serde_json::from_value(body).unwrap();
    assert_eq!(body.code.as_deref(), Some("INVALID_QUERY"));
    assert!(body.error.contains("abc"));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_credential_reported_before_query_checks() {
    let (url, seen) = spawn_upstream(StatusCode::OK, list_body()).await;

    for uri in ["/api/sentiment?limit=", "/api/sentiment?limit=abc"] {
        let app = proxy(url.clone(), None);
        let (status, body) = get_json(app, uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");

        let body: ErrorBody = serde_json::from_value(body).unwrap();
        assert_eq!(body.code.as_deref(), Some("MISSING_CREDENTIAL"), "{uri}");
    }
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_upstream_rate_limit() {
    let (url, _) = spawn_upstream(StatusCode::TOO_MANY_REQUESTS, json!({ "error": "slow" })).await;
    let app = proxy(url, Some("test-key"));

    let (status, body) = get_json(app, "/api/sentiment").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "UPSTREAM_RATE_LIMITED");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_upstream_error_status() {
    let (url, _) = spawn_upstream(StatusCode::SERVICE_UNAVAILABLE, json!({})).await;
    let app = proxy(url, Some("test-key"));

    let (status, body) = get_json(app, "/api/sentiment").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "UPSTREAM_STATUS");
    assert_eq!(body["error"], "Upstream returned status 503");
}

#[tokio::test]
async fn test_upstream_unreachable() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let app = proxy(format!("http://{}/coins/list/v2", addr), Some("test-key"));
    let (status, body) = get_json(app, "/api/sentiment").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "UPSTREAM_UNAVAILABLE");
}

#[tokio::test]
async fn test_success_without_data_is_forwarded() {
    let (url, _) = spawn_upstream(StatusCode::OK, json!({})).await;
    let app = proxy(url, Some("test-key"));

    let (status, body) = get_json(app, "/api/sentiment").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_health_reports_credential() {
    let app = proxy("http://127.0.0.1:9/unused".to_string(), None);
    let (status, body) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["credential_configured"], false);
}
