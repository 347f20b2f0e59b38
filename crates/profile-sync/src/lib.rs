//! Profile Sync
//!
//! Keeps the server's record of section order and visibility in step with
//! what the user sees in the profile editor. Three regions (left column,
//! right column, works list) are reordered by drag and drop; works carry a
//! heading checkbox and nested sub-item checkboxes. Every change is captured
//! from live state and sent to the endpoint for its kind.
//!
//! ```text
//! UI event ──> UiSynchronizer ──capture──> SyncPayload ──> SyncClient ──> server
//!                   │                                         │
//!                   └── projection (sub-item enable/disable)  └── SyncOutcome
//! ```
//!
//! The crate is UI-agnostic: the live state is reached through [`ItemTree`]
//! and [`ControlSurface`], and the transport through [`SyncClient`].

pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod memory;
pub mod model;
pub mod payload;
pub mod synchronizer;

pub use client::{HttpSyncClient, SyncClient, SyncOutcome, CSRF_HEADER};
pub use config::{Endpoint, Endpoints, SyncConfig, DEFAULT_REQUEST_TIMEOUT_MS};
pub use editor::{EditorConfig, RichTextBinder};
pub use error::{ConfigError, LayoutError, LayoutResult, SyncError, SyncResult};
pub use memory::MemoryStore;
pub use model::{
    merge_order, ControlSurface, ItemTree, ProfileLayout, Region, RenderedPage, RenderedWork,
    Section, SharedLayout, StoredProfile, SubItem, Work,
};
pub use payload::{capture, serialize, SyncKind, SyncPayload};
pub use synchronizer::{
    DragState, Dispatch, SaveStatus, StatusListener, SynchronizerBuilder, UiSynchronizer,
    RICH_TEXT_REGION,
};
