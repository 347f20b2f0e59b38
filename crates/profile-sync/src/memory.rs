//! In-Process Remote Store
//!
//! A `SyncClient` that applies payloads to a `StoredProfile` the way the
//! profile server does. Used for offline development and end-to-end tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::{SyncClient, SyncOutcome};
use crate::config::Endpoint;
use crate::model::StoredProfile;
use crate::payload::{SyncKind, SyncPayload};

const SUCCESS_BODY: &str = r#"{"success": true}"#;

#[derive(Debug, Default)]
struct MemoryState {
    profile: StoredProfile,
    requests: Vec<(SyncKind, SyncPayload)>,
    failure: Option<String>,
}

/// Cloneable handle; clones share one store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new(profile: StoredProfile) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryState {
                profile,
                ..Default::default()
            })),
        }
    }

    pub fn profile(&self) -> StoredProfile {
        self.inner.lock().profile.clone()
    }

    /// Every request received, failed ones included
    pub fn requests(&self) -> Vec<(SyncKind, SyncPayload)> {
        self.inner.lock().requests.clone()
    }

    /// Fail every following send with `reason` until `recover` is called
    pub fn fail_with(&self, reason: impl Into<String>) {
        self.inner.lock().failure = Some(reason.into());
    }

    pub fn recover(&self) {
        self.inner.lock().failure = None;
    }

    /// Store the fields the endpoint for `kind` persists; the rest are ignored
    pub fn apply(profile: &mut StoredProfile, kind: SyncKind, payload: &SyncPayload) {
        match kind {
            SyncKind::Left => profile.left_order = payload.item_order.clone(),
            SyncKind::Right => profile.right_order = payload.item_order.clone(),
            SyncKind::Works => {
                profile.works_order = payload.item_order.clone();
                profile.works_show = payload.show_work_values.clone();
            }
            SyncKind::WorksWork => profile.works_work_show = payload.works_visibility.clone(),
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl SyncClient for MemoryStore {
    async fn send(&self, endpoint: &Endpoint, payload: &SyncPayload) -> SyncOutcome {
        let mut state = self.inner.lock();
        state.requests.push((endpoint.kind, payload.clone()));
        if let Some(reason) = state.failure.clone() {
            return SyncOutcome::Failure(reason);
        }
        MemoryStore::apply(&mut state.profile, endpoint.kind, payload);
        SyncOutcome::Success(SUCCESS_BODY.to_string())
    }
}
