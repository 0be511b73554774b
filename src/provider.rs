//! Data access layer - translates resource operations into HTTP requests
//!
//! Every operation targets `{base_url}/{resource}` and returns a normalized
//! result. Failures are classified, reported once through the [`Notifier`],
//! and re-raised to the caller; nothing is swallowed here.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::models::Resource;

/// Fallback message for rejected requests without a usable body
const BAD_REQUEST_FALLBACK: &str = "Bad request";

/// Fallback message for everything else
const GENERIC_FALLBACK: &str = "Error occurred";

/// Classified request failure
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure, no response received
    #[error("{0}")]
    Transport(String),

    /// 4xx response; `message` is the server text or a fallback
    #[error("{message}")]
    Client { status: u16, message: String },

    /// 5xx response
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Response arrived but the body was not what we expected
    #[error("Error reading body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-2xx response by status and body text
    pub fn from_status(status: u16, body: &str) -> Self {
        if (400..500).contains(&status) {
            ApiError::Client {
                status,
                message: error_message(body, BAD_REQUEST_FALLBACK),
            }
        } else {
            ApiError::Server {
                status,
                message: error_message(body, GENERIC_FALLBACK),
            }
        }
    }

    fn from_transport(err: reqwest::Error) -> Self {
        let msg = if err.is_timeout() {
            String::from("Request timed out")
        } else if err.is_connect() {
            format!("Connection failed: {}", err)
        } else {
            format!("Request failed: {}", err)
        };
        ApiError::Transport(msg)
    }

    /// True for lookups that missed with a 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Client { status: 404, .. })
    }

    /// Status code of the response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Client { status, .. } | ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extract a human-readable message from an error body.
///
/// Accepts a JSON object with a `message` field, a bare JSON string, or
/// plain text; anything unusable falls back to the given default.
fn error_message(body: &str, fallback: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::from(fallback);
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match value {
            serde_json::Value::String(s) if !s.is_empty() => return s,
            serde_json::Value::Object(map) => {
                if let Some(serde_json::Value::String(s)) = map.get("message") {
                    if !s.is_empty() {
                        return s.clone();
                    }
                }
                return String::from(fallback);
            }
            _ => return String::from(fallback),
        }
    }
    String::from(trimmed)
}

/// A user-facing notification (the toast analog)
#[derive(Clone, Debug)]
pub struct Notice {
    pub text: String,
}

/// Cloneable sending half of the notification channel
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
    pub fn new(tx: mpsc::UnboundedSender<Notice>) -> Self {
        Notifier { tx }
    }

    /// Create a connected notifier/receiver pair
    pub fn channel() -> (Notifier, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Notifier::new(tx), rx)
    }

    pub fn error(&self, text: impl Into<String>) {
        // Receiver gone means the UI is shutting down; nothing to report to
        let _ = self.tx.send(Notice { text: text.into() });
    }
}

/// HTTP-backed data provider for the three REST collections
pub struct DataProvider {
    client: reqwest::Client,
    base_url: String,
    notifier: Notifier,
}

impl DataProvider {
    pub fn new(config: &Config, notifier: Notifier) -> Self {
        DataProvider {
            client: create_client(),
            base_url: config.base_url.clone(),
            notifier,
        }
    }

    fn collection_url(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource.path())
    }

    /// GET the whole collection
    pub async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>, ApiError> {
        let url = self.collection_url(resource);
        tracing::info!(%url, "listing {}", resource);
        let result = async {
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(ApiError::from_transport)?;
            let resp = check_status(resp).await?;
            resp.json::<Vec<T>>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        }
        .await;
        self.finish(resource, result)
    }

    /// GET a single record by id.
    ///
    /// The id is sent as-is; a malformed id is the caller's mistake and
    /// comes back through the generic failure path. The result is a raw
    /// JSON value - a display-only read, never merged into the store.
    pub async fn get_one(
        &self,
        resource: Resource,
        id: &str,
    ) -> Result<serde_json::Value, ApiError> {
        let url = format!("{}/{}", self.collection_url(resource), id);
        tracing::info!(%url, "fetching one {}", resource);
        let result = async {
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(ApiError::from_transport)?;
            let resp = check_status(resp).await?;
            resp.json::<serde_json::Value>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        }
        .await;
        self.finish(resource, result)
    }

    /// POST a creation payload, returning the record with its assigned id
    pub async fn create<P, T>(&self, resource: Resource, payload: &P) -> Result<T, ApiError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.collection_url(resource);
        tracing::info!(%url, "creating {}", resource.label());
        let result = async {
            let resp = self
                .client
                .post(&url)
                .json(payload)
                .send()
                .await
                .map_err(ApiError::from_transport)?;
            let resp = check_status(resp).await?;
            resp.json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        }
        .await;
        self.finish(resource, result)
    }

    /// Single exit point for failures: log, notify once, re-raise
    fn finish<T>(&self, resource: Resource, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(err) = &result {
            tracing::error!(%resource, error = %err, "request failed");
            self.notifier.error(err.to_string());
        }
        result
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::from_status(status.as_u16(), &body))
}

/// HTTP client with default configuration; no retries, transport-default timeouts
fn create_client() -> reqwest::Client {
    reqwest::Client::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, NewEmployee};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn provider_for(base_url: &str) -> (DataProvider, mpsc::UnboundedReceiver<Notice>) {
        let (notifier, rx) = Notifier::channel();
        let provider = DataProvider::new(&Config::new(base_url), notifier);
        (provider, rx)
    }

    /// Serve exactly one canned HTTP response on an ephemeral local port
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            read_request(&mut sock).await;
            let resp = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = sock.write_all(resp.as_bytes()).await;
            let _ = sock.shutdown().await;
        });
        format!("http://{}", addr)
    }

    /// Read headers plus any Content-Length body before responding
    async fn read_request(sock: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = match sock.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
                let body_len = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    return;
                }
            }
        }
    }

    /// An address nothing is listening on
    async fn dead_endpoint() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[test]
    fn test_error_message_prefers_message_field() {
        let msg = error_message(r#"{"message":"Unknown employee"}"#, "Bad request");
        assert_eq!(msg, "Unknown employee");
    }

    #[test]
    fn test_error_message_accepts_json_string() {
        assert_eq!(error_message(r#""Name too short""#, "Bad request"), "Name too short");
    }

    #[test]
    fn test_error_message_passes_plain_text_through() {
        assert_eq!(error_message("boom", "Bad request"), "boom");
    }

    #[test]
    fn test_error_message_falls_back_on_empty_body() {
        assert_eq!(error_message("   ", "Bad request"), "Bad request");
        assert_eq!(error_message(r#"{"code":17}"#, "Error occurred"), "Error occurred");
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ApiError::from_status(404, ""),
            ApiError::Client { status: 404, .. }
        ));
        assert!(matches!(
            ApiError::from_status(500, ""),
            ApiError::Server { status: 500, .. }
        ));
        assert!(ApiError::from_status(404, "").is_not_found());
        assert!(!ApiError::from_status(400, "").is_not_found());
    }

    #[tokio::test]
    async fn test_list_returns_collection() {
        let base = serve_once("200 OK", r#"[{"id":1,"name":"Ada"}]"#).await;
        let (provider, mut notices) = provider_for(&base);

        let employees: Vec<Employee> = provider.list(Resource::Employees).await.unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].name, "Ada");
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_create_echoes_fields_with_assigned_id() {
        let base = serve_once("201 Created", r#"{"id":7,"name":"Ada"}"#).await;
        let (provider, mut notices) = provider_for(&base);

        let payload = NewEmployee {
            name: String::from("Ada"),
        };
        let created: Employee = provider.create(Resource::Employees, &payload).await.unwrap();
        assert_eq!(created.id, 7);
        assert_eq!(created.name, payload.name);
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_get_one_missing_id_is_a_failure_not_a_record() {
        let base = serve_once("404 Not Found", r#"{"message":"Not found"}"#).await;
        let (provider, mut notices) = provider_for(&base);

        let err = provider
            .get_one(Resource::Employees, "42")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(notices.recv().await.unwrap().text, "Not found");
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_rejected_create_surfaces_server_message() {
        let base = serve_once("400 Bad Request", r#"{"message":"Unknown employee"}"#).await;
        let (provider, mut notices) = provider_for(&base);

        let payload = NewEmployee {
            name: String::from("Ada"),
        };
        let result: Result<Employee, ApiError> =
            provider.create(Resource::Employees, &payload).await;
        let err = result.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(notices.recv().await.unwrap().text, "Unknown employee");
    }

    #[tokio::test]
    async fn test_empty_error_body_uses_fallback_text() {
        let base = serve_once("400 Bad Request", "").await;
        let (provider, mut notices) = provider_for(&base);

        let result: Result<Vec<Employee>, ApiError> = provider.list(Resource::Employees).await;
        assert!(result.is_err());
        assert_eq!(notices.recv().await.unwrap().text, "Bad request");
    }

    #[tokio::test]
    async fn test_transport_failure_notifies_once_and_reraises() {
        let base = dead_endpoint().await;
        let (provider, mut notices) = provider_for(&base);

        let result: Result<Vec<Employee>, ApiError> = provider.list(Resource::Employees).await;
        assert!(matches!(result, Err(ApiError::Transport(_))));
        assert!(notices.recv().await.is_some());
        assert!(notices.try_recv().is_err());
    }
}
