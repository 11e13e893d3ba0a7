#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    routing::post,
};
use insights_chat::{config::FlowSettings, services::flow_client::FlowClient};
use serde_json::{Value, json};

pub const FLOW_ID: &str = "flow-1";
pub const ENDPOINT_ID: &str = "insights";
pub const TOKEN: &str = "test-token";

pub type Responder = Arc<dyn Fn(&Value) -> (StatusCode, String) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct Captured {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    responder: Responder,
    requests: Arc<Mutex<Vec<Captured>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    delay: Duration,
}

/// A local stand-in for the remote flow.
pub struct MockFlow {
    pub base: String,
    requests: Arc<Mutex<Vec<Captured>>>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockFlow {
    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn client(&self) -> FlowClient {
        flow_client(&self.base)
    }
}

/// Body of a successful flow run carrying `text`.
pub fn reply_body(text: &str) -> String {
    json!({
        "session_id": "remote-session",
        "outputs": [{
            "inputs": {"input_value": "ignored"},
            "outputs": [{
                "results": {"message": {"text": text, "sender": "Machine"}},
                "artifacts": {}
            }]
        }]
    })
    .to_string()
}

/// Always answer with the same status and body.
pub fn fixed(status: StatusCode, body: impl Into<String>) -> Responder {
    let body = body.into();
    Arc::new(move |_: &Value| (status, body.clone()))
}

/// Echo the input back, except inputs containing "fail" get a 500.
pub fn echo_or_fail() -> Responder {
    Arc::new(|request: &Value| {
        let input = request["input_value"].as_str().unwrap_or_default();
        if input.contains("fail") {
            (StatusCode::INTERNAL_SERVER_ERROR, "flow crashed".to_string())
        } else {
            (StatusCode::OK, reply_body(&format!("echo: {input}")))
        }
    })
}

pub async fn spawn_flow(responder: Responder) -> MockFlow {
    spawn_flow_with_delay(responder, Duration::ZERO).await
}

pub async fn spawn_flow_with_delay(responder: Responder, delay: Duration) -> MockFlow {
    let state = MockState {
        responder,
        requests: Arc::new(Mutex::new(Vec::new())),
        in_flight: Arc::new(AtomicUsize::new(0)),
        max_in_flight: Arc::new(AtomicUsize::new(0)),
        delay,
    };
    let requests = Arc::clone(&state.requests);
    let max_in_flight = Arc::clone(&state.max_in_flight);

    let app = Router::new()
        .route("/lf/{flow_id}/api/v1/run/{endpoint_id}", post(run))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockFlow {
        base: format!("http://{addr}"),
        requests,
        max_in_flight,
    }
}

async fn run(
    State(state): State<MockState>,
    axum::extract::Path((flow_id, endpoint_id)): axum::extract::Path<(String, String)>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    if flow_id != FLOW_ID || endpoint_id != ENDPOINT_ID {
        return (StatusCode::NOT_FOUND, "no such flow".to_string());
    }

    let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.max_in_flight.fetch_max(now, Ordering::SeqCst);

    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(Captured {
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: body.clone(),
    });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    let response = (state.responder)(&body);

    state.in_flight.fetch_sub(1, Ordering::SeqCst);
    response
}

pub fn flow_settings(base: &str) -> FlowSettings {
    FlowSettings {
        api_base: base.to_string(),
        flow_id: FLOW_ID.to_string(),
        endpoint_id: ENDPOINT_ID.to_string(),
        application_token: TOKEN.to_string(),
        timeout: Duration::from_secs(5),
    }
}

pub fn flow_client(base: &str) -> FlowClient {
    FlowClient::new(&flow_settings(base)).unwrap()
}

/// Base address of a port nothing is listening on.
pub async fn dead_base() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
