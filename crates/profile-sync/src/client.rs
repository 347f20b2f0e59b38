//! Sync Client
//!
//! Delivers one payload to the endpoint bound to its kind. Sends are
//! fire-and-forget: no retry, and the response body is only logged.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{Endpoint, SyncConfig};
use crate::error::{SyncError, SyncResult};
use crate::payload::SyncPayload;

/// Header the server reads the CSRF token from
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Result of one send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// 2xx response, carrying the raw response body
    Success(String),
    /// Transport error, timeout or non-2xx response
    Failure(String),
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Success(_))
    }
}

/// Transport seam between the synchronizer and the remote store
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait SyncClient {
    async fn send(&self, endpoint: &Endpoint, payload: &SyncPayload) -> SyncOutcome;
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<C: SyncClient + Send + Sync + ?Sized> SyncClient for Arc<C> {
    async fn send(&self, endpoint: &Endpoint, payload: &SyncPayload) -> SyncOutcome {
        (**self).send(endpoint, payload).await
    }
}

/// JSON-over-HTTP client for the profile endpoints
#[derive(Debug, Clone)]
pub struct HttpSyncClient {
    client: reqwest::Client,
    csrf_token: String,
    timeout: Duration,
}

impl HttpSyncClient {
    pub fn new(config: &SyncConfig) -> SyncResult<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            csrf_token: config.csrf_token.clone(),
            timeout: config.request_timeout(),
        })
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl SyncClient for HttpSyncClient {
    async fn send(&self, endpoint: &Endpoint, payload: &SyncPayload) -> SyncOutcome {
        let response = match self
            .client
            .post(endpoint.url.clone())
            .header(CSRF_HEADER, &self.csrf_token)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return SyncOutcome::Failure(e.to_string()),
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!(kind = %endpoint.kind, status = status.as_u16(), body = %body, "sync response");

        if status.is_success() {
            SyncOutcome::Success(body)
        } else {
            SyncOutcome::Failure(format!("HTTP {}: {}", status.as_u16(), body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::endpoints;
    use crate::payload::SyncKind;

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    type Seen = Arc<Mutex<Vec<(Option<String>, Option<String>, Value)>>>;

    /// Serve the four endpoints on an ephemeral port. The works endpoint
    /// answers like the server does on a database error.
    async fn spawn_server(seen: Seen) -> String {
        let record = move |seen: Seen| {
            move |headers: HeaderMap, Json(body): Json<Value>| {
                let seen = seen.clone();
                async move {
                    let header = |name: &str| {
                        headers
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string)
                    };
                    seen.lock()
                        .push((header("x-csrftoken"), header("content-type"), body));
                    Json(json!({ "success": true }))
                }
            }
        };

        let app = Router::new()
            .route("/save-profile-order/left/", post(record(seen.clone())))
            .route("/save-profile-order/right/", post(record(seen.clone())))
            .route("/save-works-visibility/", post(record(seen)))
            .route(
                "/save-works-order/",
                post(|| async {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "success": false, "error": "database unavailable" })),
                    )
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(base: &str) -> (HttpSyncClient, SyncConfig) {
        let config = SyncConfig::new(endpoints(base), "csrf-123");
        (HttpSyncClient::new(&config).unwrap(), config)
    }

    #[tokio::test]
    async fn test_success_posts_json_with_csrf_header() {
        let seen: Seen = Arc::default();
        let base = spawn_server(seen.clone()).await;
        let (client, config) = client_for(&base);

        let payload = SyncPayload {
            item_order: vec!["about".into(), "education".into()],
            ..Default::default()
        };
        let outcome = client
            .send(&config.endpoint(SyncKind::Left).unwrap(), &payload)
            .await;

        match outcome {
            SyncOutcome::Success(body) => assert!(body.contains("\"success\":true")),
            other => panic!("expected success, got {other:?}"),
        }

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        let (csrf, content_type, body) = &seen[0];
        assert_eq!(csrf.as_deref(), Some("csrf-123"));
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(
            body,
            &json!({
                "item_order": ["about", "education"],
                "show_work_values": {},
                "works_visibility": {}
            })
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_failure() {
        let base = spawn_server(Arc::default()).await;
        let (client, config) = client_for(&base);

        let outcome = client
            .send(&config.endpoint(SyncKind::Works).unwrap(), &SyncPayload::default())
            .await;

        match outcome {
            SyncOutcome::Failure(reason) => {
                assert!(reason.starts_with("HTTP 400"), "{reason}");
                assert!(reason.contains("database unavailable"), "{reason}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_error_is_failure() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (client, config) = client_for(&format!("http://{addr}"));
        let outcome = client
            .send(&config.endpoint(SyncKind::Right).unwrap(), &SyncPayload::default())
            .await;
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SyncConfig::new(endpoints("http://localhost"), "");
        assert!(matches!(
            HttpSyncClient::new(&config),
            Err(SyncError::Config(_))
        ));
    }
}
