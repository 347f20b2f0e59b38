//! Application Context
//!
//! Shared state provided via Leptos Context API.

use std::collections::BTreeMap;
use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::slot_to_index;
use profile_sync::{
    EditorConfig, HttpSyncClient, ItemTree, ProfileLayout, Region, RichTextBinder, SharedLayout,
    SyncConfig, UiSynchronizer,
};
use tracing::{info, warn};

use crate::editor::TinyMceBinder;
use crate::page::PageState;
use crate::store::{store_apply_status, SaveStore};

pub type Synchronizer = UiSynchronizer<SharedLayout, HttpSyncClient>;

/// App-wide state provided via context
#[derive(Clone)]
pub struct AppContext {
    pub layout: SharedLayout,
    pub sync: Synchronizer,
    /// Bumped after every layout mutation; views read it to re-render
    pub version: ReadSignal<u32>,
    set_version: WriteSignal<u32>,
    titles: Arc<BTreeMap<String, String>>,
    editors: Arc<BTreeMap<String, String>>,
}

impl AppContext {
    pub fn new(config: SyncConfig, state: PageState, store: SaveStore) -> Result<Self, String> {
        let layout = ProfileLayout::reconcile(&state.page, &state.stored).map_err(|e| e.to_string())?;
        let layout = SharedLayout::new(layout);
        let client = HttpSyncClient::new(&config).map_err(|e| e.to_string())?;

        let sync = UiSynchronizer::builder(layout.clone(), client, config)
            .editor(Arc::new(TinyMceBinder))
            .on_status(move |kind, status| store_apply_status(&store, kind, status.clone()))
            .build()
            .map_err(|e| e.to_string())?;
        sync.initialize();

        let (version, set_version) = signal(0u32);
        info!(
            left = layout.order(Region::Left).len(),
            right = layout.order(Region::Right).len(),
            works = layout.order(Region::Works).len(),
            "profile layout ready"
        );

        Ok(Self {
            layout,
            sync,
            version,
            set_version,
            titles: Arc::new(state.titles),
            editors: Arc::new(state.editors),
        })
    }

    /// Re-render views that read the layout
    pub fn bump(&self) {
        self.set_version.update(|v| *v += 1);
    }

    pub fn title(&self, id: &str) -> String {
        self.titles.get(id).cloned().unwrap_or_else(|| id.to_string())
    }

    /// Initial HTML of the item's rich-text editor, if it has one
    pub fn editor_content(&self, id: &str) -> Option<String> {
        self.editors.get(id).cloned()
    }

    /// Bind editors for every left-column item that carries one
    pub fn attach_editors(&self) {
        let config = EditorConfig::default();
        for id in self.layout.order(Region::Left) {
            if self.editors.contains_key(&id) {
                TinyMceBinder.attach(&id, &config);
            }
        }
    }

    /// Apply a drop into gap `slot`. Returns whether the order changed.
    pub fn move_to_slot(&self, region: Region, id: &str, slot: usize) -> bool {
        let Some(from) = self.layout.order(region).iter().position(|i| i == id) else {
            warn!(%region, %id, "dropped item not in region");
            return false;
        };
        let to = slot_to_index(from, slot);
        if from == to {
            return false;
        }
        match self.layout.move_item(region, from, to) {
            Ok(()) => {
                self.bump();
                true
            }
            Err(e) => {
                warn!(%region, %id, error = %e, "move rejected");
                false
            }
        }
    }

    pub fn toggle_heading(&self, work_id: &str, visible: bool) {
        if let Err(e) = self.layout.set_heading_visible(work_id, visible) {
            warn!(work = %work_id, error = %e, "heading toggle rejected");
            self.bump();
            return;
        }
        let pending = self.sync.heading_toggled();
        self.bump();
        spawn_local(async move {
            pending.await;
        });
    }

    pub fn toggle_sub_item(&self, sub_item_id: &str, visible: bool) {
        if let Err(e) = self.layout.set_sub_item_visible(sub_item_id, visible) {
            warn!(sub_item = %sub_item_id, error = %e, "sub-item toggle rejected");
            self.bump();
            return;
        }
        let pending = self.sync.sub_item_toggled();
        self.bump();
        spawn_local(async move {
            pending.await;
        });
    }
}
