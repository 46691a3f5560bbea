//! HTTP(S) server for the courier demo.
//!
//! Three routes, each a single self-contained exchange:
//! - `GET /` answers with a fixed greeting.
//! - `POST /sendFile` decodes a multipart form holding a `Person` JSON field
//!   and a `file` attachment.
//! - `POST /user` decodes a JSON `User` and answers `202 Accepted`.
//!
//! Any other method on these routes gets `405` before a handler runs.

pub mod config;
pub mod tls;
pub mod upload;

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::{net::TcpListener, sync::mpsc};

pub use config::Settings;
pub use tls::{load_server_config, TlsListener};
pub use upload::{decode_upload, DecodeError, Upload};

pub const GREETING: &str = "Hello from the courier server";
pub const UPLOAD_OK: &str = "Successfully received data";

/// Missing keys decode to empty values and keys match case-insensitively,
/// so `{"name":"Ana"}` is as good as `{"Name":"Ana","Age":0}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Person {
    pub name: String,
    pub age: i64,
}

impl Person {
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        decode_folded(bytes, &["Name", "Age"])
    }
}

/// Decoded with the same leniency as [`Person`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub first: String,
    pub last: String,
}

impl User {
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        decode_folded(bytes, &["first", "last"])
    }
}

/// Rewrite object keys that match one of `fields` ignoring ASCII case to
/// that field's exact spelling, then decode. An exact match wins over a
/// folded one.
fn decode_folded<T: DeserializeOwned>(bytes: &[u8], fields: &[&str]) -> serde_json::Result<T> {
    let mut value: serde_json::Value = serde_json::from_slice(bytes)?;
    if let serde_json::Value::Object(map) = &mut value {
        for field in fields {
            if map.contains_key(*field) {
                continue;
            }
            let folded = map.keys().find(|key| key.eq_ignore_ascii_case(field)).cloned();
            if let Some(key) = folded {
                if let Some(v) = map.remove(&key) {
                    map.insert((*field).to_string(), v);
                }
            }
        }
    }
    serde_json::from_value(value)
}

/// A payload the server accepted, as handed to the inbox.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Received {
    Upload(Upload),
    User(User),
}

pub type Inbox = mpsc::UnboundedSender<Received>;

#[derive(Clone, Debug)]
pub struct AppOptions {
    /// Receives every accepted payload, if set.
    pub inbox: Option<Inbox>,
    pub max_upload: usize,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            inbox: None,
            max_upload: config::DEFAULT_MAX_UPLOAD,
        }
    }
}

#[derive(Clone, Default)]
struct AppState {
    inbox: Option<Inbox>,
}

impl AppState {
    fn deliver(&self, received: Received) {
        if let Some(inbox) = &self.inbox {
            if inbox.send(received).is_err() {
                tracing::debug!("inbox closed, dropping payload");
            }
        }
    }
}

pub fn app() -> Router {
    build_app(AppOptions::default())
}

/// Router that also forwards accepted payloads to `inbox`.
pub fn app_with_inbox(inbox: Inbox) -> Router {
    build_app(AppOptions {
        inbox: Some(inbox),
        ..AppOptions::default()
    })
}

pub fn build_app(options: AppOptions) -> Router {
    let state = AppState {
        inbox: options.inbox,
    };
    Router::new()
        .route("/", get(hello).fallback(method_not_allowed))
        .route("/sendFile", post(send_file).fallback(method_not_allowed))
        .route("/user", post(create_user).fallback(method_not_allowed))
        .layer(DefaultBodyLimit::max(options.max_upload))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

pub async fn serve_tls(
    listener: TcpListener,
    config: Arc<rustls::ServerConfig>,
    app: Router,
) -> Result<(), std::io::Error> {
    axum::serve(TlsListener::new(listener, config)?, app).await
}

async fn hello() -> &'static str {
    GREETING
}

async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

async fn send_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<&'static str, DecodeError> {
    let upload = decode_upload(multipart?).await?;
    tracing::info!(
        name = %upload.person.name,
        age = upload.person.age,
        file = %upload.file_name,
        bytes = upload.content.len(),
        "received upload"
    );
    tracing::info!(content = %String::from_utf8_lossy(&upload.content), "file content");
    state.deliver(Received::Upload(upload));
    Ok(UPLOAD_OK)
}

async fn create_user(State(state): State<AppState>, body: Bytes) -> Result<StatusCode, DecodeError> {
    let user = User::from_json(&body).map_err(DecodeError::Json)?;
    tracing::info!(first = %user.first, last = %user.last, "received user");
    state.deliver(Received::User(user));
    Ok(StatusCode::ACCEPTED)
}
