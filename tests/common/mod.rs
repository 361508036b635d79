//! Mock FlashArray REST API served by axum on an ephemeral local port

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use purefa_exporter::config::{ArrayConfig, PureFaConfig};
use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub const TOKEN: &str = "test-token";

pub const ONE_VOLUME: &str =
    r#"[{"name":"vol1","serial":"S1","size":1024,"created":"2020-01-01"}]"#;

pub const TWO_VOLUMES: &str = r#"[
    {"name":"vol1","serial":"S1","size":1024,"created":"2020-01-01T00:00:00Z"},
    {"name":"vol2","serial":"S2","size":2048,"created":"2020-01-02T00:00:00Z"}
]"#;

#[derive(Clone)]
pub struct MockArray {
    pub list_status: StatusCode,
    pub list_body: String,
    /// Volumes whose monitor endpoint answers 500
    pub failing_monitors: Vec<String>,
    /// Volumes whose monitor endpoint answers 200 with a non-JSON body
    pub garbled_monitors: Vec<String>,
    /// Volumes whose monitor endpoint stalls before sending headers
    pub stalled_monitors: Vec<String>,
    /// Stall the volume list before sending headers
    pub stalled_list: bool,
}

/// Longer than the client's response header timeout
const STALL: Duration = Duration::from_secs(6);

impl MockArray {
    pub fn with_volumes(body: &str) -> Self {
        Self {
            list_status: StatusCode::OK,
            list_body: body.to_string(),
            failing_monitors: Vec::new(),
            garbled_monitors: Vec::new(),
            stalled_monitors: Vec::new(),
            stalled_list: false,
        }
    }

    pub fn with_status(status: StatusCode) -> Self {
        Self {
            list_status: status,
            list_body: String::new(),
            failing_monitors: Vec::new(),
            garbled_monitors: Vec::new(),
            stalled_monitors: Vec::new(),
            stalled_list: false,
        }
    }

    pub fn failing_monitor(mut self, volume: &str) -> Self {
        self.failing_monitors.push(volume.to_string());
        self
    }

    pub fn garbled_monitor(mut self, volume: &str) -> Self {
        self.garbled_monitors.push(volume.to_string());
        self
    }

    pub fn stalled_monitor(mut self, volume: &str) -> Self {
        self.stalled_monitors.push(volume.to_string());
        self
    }

    pub fn stalled_list(mut self) -> Self {
        self.stalled_list = true;
        self
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
        == Some(format!("Token {}", TOKEN).as_str())
}

async fn list_handler(State(mock): State<Arc<MockArray>>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (StatusCode::FORBIDDEN, "forbidden").into_response();
    }
    if mock.stalled_list {
        tokio::time::sleep(STALL).await;
    }
    (mock.list_status, mock.list_body.clone()).into_response()
}

async fn monitor_handler(
    State(mock): State<Arc<MockArray>>,
    Path(name): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return (StatusCode::FORBIDDEN, "forbidden").into_response();
    }
    if query.get("action").map(String::as_str) != Some("monitor") {
        return (StatusCode::BAD_REQUEST, "missing action=monitor").into_response();
    }
    if mock.failing_monitors.contains(&name) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "monitor failed").into_response();
    }
    if mock.garbled_monitors.contains(&name) {
        return (StatusCode::OK, "<html>maintenance</html>").into_response();
    }
    if mock.stalled_monitors.contains(&name) {
        tokio::time::sleep(STALL).await;
    }
    let body = format!(
        r#"[{{"name":"{}","time":"2020-01-01T00:00:00Z","reads_per_sec":10,"writes_per_sec":5,"input_per_sec":4096,"output_per_sec":8192,"usec_per_read_op":250,"usec_per_write_op":300}}]"#,
        name
    );
    (StatusCode::OK, body).into_response()
}

/// Serve the mock and return its API base URL
pub async fn spawn_array(mock: MockArray) -> String {
    let app = Router::new()
        .route("/api/1.15/volume", get(list_handler))
        .route("/api/1.15/volume/{name}", get(monitor_handler))
        .with_state(Arc::new(mock));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock array");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock array failed");
    });

    format!("http://{}/api/1.15", addr)
}

pub fn raw_config(base_url: &str, token: &str) -> PureFaConfig {
    PureFaConfig {
        array: "purefa1.example.com".to_string(),
        api_token: Some(SecretString::from(token)),
        base_url: Some(base_url.to_string()),
        http_timeout_seconds: 0,
        verify_ssl: true,
        ignore_veeamsnap: false,
    }
}

pub fn array_config(base_url: &str) -> ArrayConfig {
    raw_config(base_url, TOKEN)
        .init()
        .expect("Mock config should be valid")
}
