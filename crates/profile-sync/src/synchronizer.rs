//! UI Synchronizer
//!
//! Wires reorder and toggle events to the capture + send pipeline and keeps
//! the enable/disable projection of sub-item controls in step with the
//! heading flags.
//!
//! Trigger methods capture their payload synchronously when called and
//! return an owned future that performs the send, so state is read at event
//! time even when the future is spawned and polled later.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::client::{SyncClient, SyncOutcome};
use crate::config::SyncConfig;
use crate::editor::{EditorConfig, RichTextBinder};
use crate::error::{SyncError, SyncResult};
use crate::model::{ControlSurface, ItemTree, Region};
use crate::payload::{self, SyncKind, SyncPayload};

/// Region whose items carry rich-text editors
pub const RICH_TEXT_REGION: Region = Region::Left;

/// Save state of one kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    /// Last send failed; local state is ahead of the server
    Unsaved(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { item: String },
}

/// What a trigger did with its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Sent; carries the outcome of the last send this call performed
    Sent(SyncOutcome),
    /// A send of the same kind was in flight; the payload was queued
    /// behind it, replacing any older queued snapshot
    Queued,
}

pub type StatusListener = Arc<dyn Fn(SyncKind, &SaveStatus) + Send + Sync>;

#[derive(Debug, Default)]
struct Lane {
    in_flight: bool,
    queued: Option<SyncPayload>,
    status: SaveStatus,
    unsaved: Option<String>,
}

struct Inner<T, C> {
    tree: T,
    client: C,
    config: SyncConfig,
    editor: Option<Arc<dyn RichTextBinder>>,
    editor_config: EditorConfig,
    listener: Option<StatusListener>,
    drags: Mutex<HashMap<Region, DragState>>,
    lanes: Mutex<HashMap<SyncKind, Lane>>,
}

pub struct SynchronizerBuilder<T, C> {
    tree: T,
    client: C,
    config: SyncConfig,
    editor: Option<Arc<dyn RichTextBinder>>,
    editor_config: EditorConfig,
    listener: Option<StatusListener>,
}

impl<T, C> SynchronizerBuilder<T, C> {
    /// Editor binder for items of the left column
    pub fn editor(mut self, binder: Arc<dyn RichTextBinder>) -> Self {
        self.editor = Some(binder);
        self
    }

    pub fn editor_config(mut self, config: EditorConfig) -> Self {
        self.editor_config = config;
        self
    }

    /// Called on every save-status change, outside any lock
    pub fn on_status<F>(mut self, listener: F) -> Self
    where
        F: Fn(SyncKind, &SaveStatus) + Send + Sync + 'static,
    {
        self.listener = Some(Arc::new(listener));
        self
    }

    pub fn build(self) -> SyncResult<UiSynchronizer<T, C>> {
        self.config.validate()?;
        Ok(UiSynchronizer {
            inner: Arc::new(Inner {
                tree: self.tree,
                client: self.client,
                config: self.config,
                editor: self.editor,
                editor_config: self.editor_config,
                listener: self.listener,
                drags: Mutex::new(HashMap::new()),
                lanes: Mutex::new(HashMap::new()),
            }),
        })
    }
}

/// Cheap to clone; clones share lanes, drag state and the tree handle
pub struct UiSynchronizer<T, C> {
    inner: Arc<Inner<T, C>>,
}

impl<T, C> Clone for UiSynchronizer<T, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, C> UiSynchronizer<T, C> {
    fn set_status(&self, kind: SyncKind, status: SaveStatus) {
        {
            let mut lanes = self.inner.lanes.lock();
            let lane = lanes.entry(kind).or_default();
            match &status {
                SaveStatus::Saved => lane.unsaved = None,
                SaveStatus::Unsaved(reason) => lane.unsaved = Some(reason.clone()),
                SaveStatus::Idle | SaveStatus::Saving => {}
            }
            lane.status = status.clone();
        }
        if let Some(listener) = &self.inner.listener {
            listener(kind, &status);
        }
    }
}

/// Held for the life of a dispatch. If the dispatch future is dropped
/// before it finishes, the lane is released and the kind marked unsaved so
/// the next trigger sends a fresh snapshot.
struct InFlight<'a, T, C> {
    sync: &'a UiSynchronizer<T, C>,
    kind: SyncKind,
    owns_lane: bool,
    armed: bool,
}

impl<T, C> InFlight<'_, T, C> {
    fn finish(mut self) {
        self.armed = false;
    }
}

impl<T, C> Drop for InFlight<'_, T, C> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let discarded = if self.owns_lane {
            let mut lanes = self.sync.inner.lanes.lock();
            let lane = lanes.entry(self.kind).or_default();
            lane.in_flight = false;
            lane.queued.take().is_some()
        } else {
            false
        };
        warn!(kind = %self.kind, discarded, "send abandoned, local state kept");
        self.sync
            .set_status(self.kind, SaveStatus::Unsaved(ABANDONED.to_string()));
    }
}

const ABANDONED: &str = "send abandoned before completing";

impl<T, C> UiSynchronizer<T, C>
where
    T: ItemTree + ControlSurface + 'static,
    C: SyncClient + 'static,
{
    pub fn builder(tree: T, client: C, config: SyncConfig) -> SynchronizerBuilder<T, C> {
        SynchronizerBuilder {
            tree,
            client,
            config,
            editor: None,
            editor_config: EditorConfig::default(),
            listener: None,
        }
    }

    pub fn tree(&self) -> &T {
        &self.inner.tree
    }

    /// Reflect the server-provided heading flags on page load
    pub fn initialize(&self) {
        self.apply_projection();
    }

    /// Sub-item controls are interactive exactly when their heading is
    /// visible. Stored `visible` values are left alone.
    pub fn apply_projection(&self) {
        let tree = &self.inner.tree;
        let headings = tree.heading_flags();
        for work_id in tree.order(Region::Works) {
            let interactive = headings.get(&work_id).copied().unwrap_or(true);
            for sub_item in tree.sub_items_of(&work_id) {
                tree.set_sub_item_interactive(&sub_item, interactive);
            }
        }
    }

    pub fn capture(&self, kind: SyncKind) -> SyncPayload {
        payload::capture(kind, &self.inner.tree)
    }

    /// A region's order changed after a drop
    pub fn reordered(&self, region: Region) -> impl Future<Output = Dispatch> + 'static {
        let kind = SyncKind::for_region(region);
        self.schedule(kind)
    }

    /// A work's heading checkbox changed
    pub fn heading_toggled(&self) -> impl Future<Output = Dispatch> + 'static {
        self.apply_projection();
        self.schedule(SyncKind::Works)
    }

    /// A sub-item checkbox changed
    pub fn sub_item_toggled(&self) -> impl Future<Output = Dispatch> + 'static {
        self.schedule(SyncKind::WorksWork)
    }

    fn schedule(&self, kind: SyncKind) -> impl Future<Output = Dispatch> + 'static {
        let payload = self.capture(kind);
        debug!(kind = %kind, ?payload, "captured");
        let this = self.clone();
        async move { this.dispatch(kind, payload).await }
    }

    async fn dispatch(&self, kind: SyncKind, mut payload: SyncPayload) -> Dispatch {
        let coalesce = self.inner.config.coalesce;

        if coalesce {
            let queued = {
                let mut lanes = self.inner.lanes.lock();
                let lane = lanes.entry(kind).or_default();
                if lane.in_flight {
                    if lane.queued.replace(payload.clone()).is_some() {
                        debug!(kind = %kind, "superseded queued snapshot");
                    }
                    true
                } else {
                    lane.in_flight = true;
                    false
                }
            };
            if queued {
                return Dispatch::Queued;
            }
        }

        let guard = InFlight {
            sync: self,
            kind,
            owns_lane: coalesce,
            armed: true,
        };

        loop {
            let outcome = self.send_once(kind, &payload).await;
            if !coalesce {
                guard.finish();
                return Dispatch::Sent(outcome);
            }

            let next = {
                let mut lanes = self.inner.lanes.lock();
                let lane = lanes.entry(kind).or_default();
                let next = lane.queued.take();
                if next.is_none() {
                    lane.in_flight = false;
                }
                next
            };
            match next {
                Some(next) => payload = next,
                None => {
                    guard.finish();
                    return Dispatch::Sent(outcome);
                }
            }
        }
    }

    async fn send_once(&self, kind: SyncKind, payload: &SyncPayload) -> SyncOutcome {
        self.set_status(kind, SaveStatus::Saving);

        let outcome = match self.inner.config.endpoint(kind) {
            Ok(endpoint) => self.inner.client.send(&endpoint, payload).await,
            Err(e) => SyncOutcome::Failure(e.to_string()),
        };

        match &outcome {
            SyncOutcome::Success(response) => {
                info!(kind = %kind, %response, "saved");
                self.set_status(kind, SaveStatus::Saved);
            }
            SyncOutcome::Failure(reason) => {
                warn!(kind = %kind, %reason, "save failed, local state kept");
                self.set_status(kind, SaveStatus::Unsaved(reason.clone()));
            }
        }
        outcome
    }

    pub fn status(&self, kind: SyncKind) -> SaveStatus {
        self.inner
            .lanes
            .lock()
            .get(&kind)
            .map(|lane| lane.status.clone())
            .unwrap_or_default()
    }

    /// True while any kind's last completed send failed
    pub fn has_unsaved_changes(&self) -> bool {
        self.inner.lanes.lock().values().any(|lane| lane.unsaved.is_some())
    }

    pub fn drag_state(&self, region: Region) -> DragState {
        self.inner
            .drags
            .lock()
            .get(&region)
            .cloned()
            .unwrap_or_default()
    }

    /// `Idle -> Dragging`. Detaches editors inside the item before it moves.
    pub fn drag_started(&self, region: Region, item_id: &str) -> SyncResult<()> {
        {
            let mut drags = self.inner.drags.lock();
            let state = drags.entry(region).or_default();
            if let DragState::Dragging { item } = state {
                warn!(%region, dragging = %item, requested = %item_id, "drag already in progress");
                return Err(SyncError::AlreadyDragging {
                    region,
                    item: item.clone(),
                });
            }
            *state = DragState::Dragging {
                item: item_id.to_string(),
            };
        }

        if region == RICH_TEXT_REGION {
            if let Some(editor) = &self.inner.editor {
                debug!(item = %item_id, "detaching editors");
                editor.detach(item_id);
            }
        }
        Ok(())
    }

    /// `Dragging -> Idle`. Re-attaches editors to the item that started the
    /// drag, after it has been dropped.
    pub fn drag_ended(&self, region: Region, item_id: &str) -> SyncResult<()> {
        let started = {
            let mut drags = self.inner.drags.lock();
            match drags.insert(region, DragState::Idle) {
                Some(DragState::Dragging { item }) => item,
                _ => {
                    warn!(%region, item = %item_id, "drag ended without a start");
                    return Err(SyncError::NotDragging(region));
                }
            }
        };

        if started != item_id {
            warn!(%region, %started, ended = %item_id, "drag ended on a different item");
        }

        if region == RICH_TEXT_REGION {
            if let Some(editor) = &self.inner.editor {
                debug!(item = %started, "re-attaching editors");
                editor.attach(&started, &self.inner.editor_config);
            }
        }
        Ok(())
    }
}
