//! Error Types
//!
//! Typed errors for configuration, layout mutation and drag lifecycle misuse.
//! Failed saves are not errors: they are reported as `SyncOutcome::Failure`.

use thiserror::Error;

use crate::model::Region;
use crate::payload::SyncKind;

/// Problems with the page-embedded sync configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no endpoint configured for {0}")]
    MissingEndpoint(SyncKind),

    #[error("invalid endpoint for {kind}: {reason}")]
    InvalidEndpoint { kind: SyncKind, reason: String },

    #[error("CSRF token is empty")]
    MissingCsrfToken,

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Invariant violations in the in-memory layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("duplicate id {id:?} in {region}")]
    DuplicateId { region: String, id: String },

    #[error("unknown id {0:?}")]
    UnknownId(String),

    #[error("index {index} out of range for {region} (len {len})")]
    OutOfRange {
        region: Region,
        index: usize,
        len: usize,
    },

    #[error("sub-item {0:?} is disabled while its heading is hidden")]
    Disabled(String),
}

/// Errors surfaced by the synchronizer
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("{region} is already dragging {item:?}")]
    AlreadyDragging { region: Region, item: String },

    #[error("{0} has no drag in progress")]
    NotDragging(Region),

    #[error("transport setup failed: {0}")]
    Transport(String),
}

pub type LayoutResult<T> = Result<T, LayoutError>;
pub type SyncResult<T> = Result<T, SyncError>;
