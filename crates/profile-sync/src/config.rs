//! Sync Configuration
//!
//! Endpoint URLs and the CSRF token are rendered into the page by the
//! server; the UI collects them into a `SyncConfig` and hands it to the
//! synchronizer at construction.

use std::time::Duration;

use url::Url;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::payload::SyncKind;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

fn default_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_true() -> bool {
    true
}

/// One URL per sync kind, absolute or relative to `base_url`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub left: String,
    pub right: String,
    pub works: String,
    pub works_work: String,
}

impl Endpoints {
    pub fn for_kind(&self, kind: SyncKind) -> &str {
        match kind {
            SyncKind::Left => &self.left,
            SyncKind::Right => &self.right,
            SyncKind::Works => &self.works,
            SyncKind::WorksWork => &self.works_work,
        }
    }
}

/// Resolved target of one send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub kind: SyncKind,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub endpoints: Endpoints,
    pub csrf_token: String,
    /// Origin used to resolve relative endpoints, e.g. `window.location.origin`
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Single-flight per kind; newer snapshots replace queued ones
    #[serde(default = "default_true")]
    pub coalesce: bool,
}

impl SyncConfig {
    pub fn new(endpoints: Endpoints, csrf_token: impl Into<String>) -> Self {
        Self {
            endpoints,
            csrf_token: csrf_token.into(),
            base_url: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            coalesce: true,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.csrf_token.trim().is_empty() {
            return Err(ConfigError::MissingCsrfToken);
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        for kind in SyncKind::ALL {
            self.endpoint(kind)?;
        }
        Ok(())
    }

    pub fn endpoint(&self, kind: SyncKind) -> Result<Endpoint, ConfigError> {
        let raw = self.endpoints.for_kind(kind).trim();
        if raw.is_empty() {
            return Err(ConfigError::MissingEndpoint(kind));
        }

        let invalid = |reason: String| ConfigError::InvalidEndpoint { kind, reason };
        let url = match Url::parse(raw) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self
                    .base_url
                    .as_deref()
                    .ok_or_else(|| invalid(format!("relative URL {raw:?} without base_url")))?;
                Url::parse(base)
                    .and_then(|base| base.join(raw))
                    .map_err(|e| invalid(e.to_string()))?
            }
            Err(e) => return Err(invalid(e.to_string())),
        };

        match url.scheme() {
            "http" | "https" => Ok(Endpoint { kind, url }),
            other => Err(invalid(format!("unsupported scheme {other:?}"))),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn endpoints(base: &str) -> Endpoints {
        Endpoints {
            left: format!("{base}/save-profile-order/left/"),
            right: format!("{base}/save-profile-order/right/"),
            works: format!("{base}/save-works-order/"),
            works_work: format!("{base}/save-works-visibility/"),
        }
    }

    #[test]
    fn test_from_json_with_defaults() {
        let raw = r#"{
            "endpoints": {
                "left": "/save-profile-order/left/",
                "right": "/save-profile-order/right/",
                "works": "/save-works-order/",
                "works_work": "/save-works-visibility/"
            },
            "csrf_token": "tok",
            "base_url": "https://profile.example.org"
        }"#;
        let config = SyncConfig::from_json(raw).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.coalesce);
        assert_eq!(
            config.endpoint(SyncKind::WorksWork).unwrap().url.as_str(),
            "https://profile.example.org/save-works-visibility/"
        );
    }

    #[test]
    fn test_relative_endpoint_needs_base() {
        let config = SyncConfig::new(endpoints(""), "tok");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint { kind: SyncKind::Left, .. })
        ));
    }

    #[test]
    fn test_missing_pieces_rejected() {
        let mut config = SyncConfig::new(endpoints("http://localhost"), " ");
        assert!(matches!(config.validate(), Err(ConfigError::MissingCsrfToken)));

        config.csrf_token = "tok".into();
        config.endpoints.works = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingEndpoint(SyncKind::Works))
        ));

        config.endpoints = endpoints("http://localhost");
        config.request_timeout_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let mut config = SyncConfig::new(endpoints("http://localhost"), "tok");
        config.endpoints.right = "ftp://localhost/right".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint { kind: SyncKind::Right, .. })
        ));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(SyncConfig::from_json("{"), Err(ConfigError::Json(_))));
    }
}
