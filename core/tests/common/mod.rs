//! Shared helpers for relay integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use floorplan_relay_core::config::Config;
use floorplan_relay_core::proxy::RelayServer;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const INDEX_HTML: &str = "<!DOCTYPE html><title>Floorplan Visualizer</title>";

/// A running relay bound to an ephemeral port, serving assets from a temp dir.
pub struct TestRelay {
    pub addr: SocketAddr,
    pub dir: TempDir,
}

impl TestRelay {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn zip_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("zip_file")
    }
}

pub async fn spawn_relay() -> TestRelay {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();

    let mut config = Config::default();
    config.assets.root = dir.path().to_path_buf();
    config.uploads.zip_dir = dir.path().join("zip_file");
    config.relay.request_timeout = 5;
    config.relay.connect_timeout = 2;

    let server = RelayServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });

    TestRelay { addr, dir }
}

/// One file part as seen by the mock remote
#[derive(Debug, Clone)]
pub struct ReceivedFile {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// One request as seen by the mock remote
#[derive(Debug, Clone, Default)]
pub struct Received {
    pub content_type: Option<String>,
    pub body_was_multipart: bool,
    pub fields: Vec<(String, String)>,
    pub files: Vec<ReceivedFile>,
}

struct RemoteState {
    status: u16,
    content_type: &'static str,
    body: &'static [u8],
    received: Arc<Mutex<Vec<Received>>>,
}

/// Stand-in for the remote floorplan server
pub struct MockRemote {
    pub addr: SocketAddr,
    pub received: Arc<Mutex<Vec<Received>>>,
}

impl MockRemote {
    pub fn port(&self) -> String {
        self.addr.port().to_string()
    }

    pub fn requests(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

/// Start a mock remote that records every `/receive_data` form and answers
/// with a fixed status, content type and body.
pub async fn spawn_remote(status: u16, content_type: &'static str, body: &'static [u8]) -> MockRemote {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = Arc::new(RemoteState {
        status,
        content_type,
        body,
        received: received.clone(),
    });

    let app = Router::new()
        .route("/receive_data", post(receive_data))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockRemote { addr, received }
}

async fn receive_data(
    State(state): State<Arc<RemoteState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut received = Received {
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        ..Received::default()
    };

    if let Ok(mut multipart) = multipart {
        received.body_was_multipart = true;
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or("").to_string();
            if field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.unwrap().to_vec();
                received.files.push(ReceivedFile {
                    field: name,
                    file_name,
                    content_type,
                    bytes,
                });
            } else {
                let value = field.text().await.unwrap();
                received.fields.push((name, value));
            }
        }
    }
    state.received.lock().unwrap().push(received);

    (
        StatusCode::from_u16(state.status).unwrap(),
        [(header::CONTENT_TYPE, state.content_type)],
        Body::from(state.body),
    )
        .into_response()
}
