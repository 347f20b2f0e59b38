//! Save State Store
//!
//! Uses Leptos reactive_stores so the save indicator re-renders only when a
//! status changes.

use std::collections::BTreeMap;

use leptos::prelude::*;
use profile_sync::{SaveStatus, SyncKind};
use reactive_stores::Store;

/// Save progress per sync kind
#[derive(Clone, Debug, Default, Store)]
pub struct SaveState {
    /// Latest status per kind
    pub statuses: BTreeMap<SyncKind, SaveStatus>,
    /// Reason of the last failed send per kind, cleared by the next success
    pub failures: BTreeMap<SyncKind, String>,
}

/// Type alias for the store
pub type SaveStore = Store<SaveState>;

/// Get the save store from context
pub fn use_save_store() -> SaveStore {
    expect_context::<SaveStore>()
}

/// Record a status published by the synchronizer
pub fn store_apply_status(store: &SaveStore, kind: SyncKind, status: SaveStatus) {
    match &status {
        SaveStatus::Saved => {
            store.failures().write().remove(&kind);
        }
        SaveStatus::Unsaved(reason) => {
            store.failures().write().insert(kind, reason.clone());
        }
        SaveStatus::Idle | SaveStatus::Saving => {}
    }
    store.statuses().write().insert(kind, status);
}

/// One status for the whole page: failures win over in-flight sends, which
/// win over completed ones
pub fn summarize(
    statuses: &BTreeMap<SyncKind, SaveStatus>,
    failures: &BTreeMap<SyncKind, String>,
) -> SaveStatus {
    if let Some((kind, reason)) = failures.iter().next() {
        return SaveStatus::Unsaved(format!("{kind}: {reason}"));
    }
    if statuses.values().any(|s| *s == SaveStatus::Saving) {
        return SaveStatus::Saving;
    }
    if statuses.values().any(|s| *s == SaveStatus::Saved) {
        return SaveStatus::Saved;
    }
    SaveStatus::Idle
}
