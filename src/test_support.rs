//! Shared fixtures: a scriptable stand-in for the upstream feedback API.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path plus query string
    pub target: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone)]
struct Scripted {
    status: u16,
    body: String,
    delay: Duration,
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<String, Vec<Scripted>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Upstream API listening on a random local port.
pub struct MockUpstream {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockUpstream {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Answer `method target` with a JSON body. Later calls for the same target
    /// queue further responses; the last one repeats.
    pub fn respond(&self, method: &str, target: &str, status: u16, body: Value) {
        self.respond_raw(method, target, status, &body.to_string(), Duration::ZERO);
    }

    pub fn respond_delayed(
        &self,
        method: &str,
        target: &str,
        status: u16,
        body: Value,
        delay: Duration,
    ) {
        self.respond_raw(method, target, status, &body.to_string(), delay);
    }

    pub fn respond_raw(
        &self,
        method: &str,
        target: &str,
        status: u16,
        body: &str,
        delay: Duration,
    ) {
        self.state
            .routes
            .lock()
            .entry(route_key(method, target))
            .or_default()
            .push(Scripted {
                status,
                body: body.to_string(),
                delay,
            });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn requests_to(&self, target: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.target == target)
            .collect()
    }
}

fn route_key(method: &str, target: &str) -> String {
    format!("{} {}", method.to_uppercase(), target)
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    };

    state.requests.lock().push(RecordedRequest {
        method: method.to_string(),
        target: target.clone(),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: String::from_utf8_lossy(&body).to_string(),
    });

    let scripted = {
        let mut routes = state.routes.lock();
        match routes.get_mut(&route_key(method.as_str(), &target)) {
            Some(queue) if queue.len() > 1 => Some(queue.remove(0)),
            Some(queue) => queue.first().cloned(),
            None => None,
        }
    };

    let Some(scripted) = scripted else {
        return (StatusCode::NOT_FOUND, "no scripted response").into_response();
    };

    if !scripted.delay.is_zero() {
        tokio::time::sleep(scripted.delay).await;
    }

    let status = StatusCode::from_u16(scripted.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        scripted.body,
    )
        .into_response()
}

/// Statistics payload from the worked example: 100 total, 80/20 split.
pub fn sample_stats() -> Value {
    json!({
        "total_feedbacks": 100,
        "total_positive": 80,
        "total_negative": 20,
        "sector_breakdown": {
            "Sales": {"total": 60, "positive": 50, "negative": 10},
            "Support": {"total": 40, "positive": 30, "negative": 10}
        }
    })
}

/// Feedback list mixing both polarity spellings.
pub fn sample_feedback() -> Value {
    json!([
        {"id": 1, "feedback_text": "Fast delivery", "feedback_type": "POSITIVE",
         "feedback_time": "2025-03-01T10:15:00Z", "sector": "Sales"},
        {"id": 2, "feedback_text": "Agent was rude", "feedback_type": "negative",
         "feedback_time": "2025-03-02T16:45:00Z", "sector": "Support"},
        {"id": 3, "feedback_text": "Love the new app", "feedback_type": "positive",
         "feedback_time": "2025-03-03T08:05:00Z", "sector": null}
    ])
}

/// Configuration pointing at a mock upstream and a throwaway database.
pub fn test_config(api_base_url: &str, db_path: std::path::PathBuf) -> crate::config::Config {
    crate::config::Config {
        api_base_url: api_base_url.to_string(),
        db_path,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
        attach_token: false,
        request_timeout: Some(Duration::from_secs(5)),
    }
}

/// Session backed by a fresh database inside `dir`.
pub async fn test_session(dir: &tempfile::TempDir) -> crate::session::SessionContext {
    let pool = crate::db::init_database(&dir.path().join("session.sqlite"))
        .await
        .expect("Failed to init DB");
    crate::session::SessionContext::new(crate::session::SessionStore::new(
        crate::db::ClientStorage::new(pool),
    ))
}
