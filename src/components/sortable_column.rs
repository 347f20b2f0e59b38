//! Sortable Column Component
//!
//! A left or right column of profile sections, reorderable by drag and drop.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::*;
use profile_sync::{ItemTree, Region, RICH_TEXT_REGION};
use tracing::warn;

use crate::components::DropZone;
use crate::context::AppContext;
use crate::editor::EDITOR_CLASS;

/// Wire a region's drag lifecycle to the synchronizer
pub(crate) fn bind_region(ctx: &AppContext, region: Region, dnd: DndSignals) {
    let start_ctx = ctx.clone();
    let end_ctx = ctx.clone();

    bind_sortable(
        dnd,
        move |id| {
            if let Err(e) = start_ctx.sync.drag_started(region, &id) {
                warn!(%region, error = %e, "drag start rejected");
            }
        },
        move |id, target| {
            let ctx = end_ctx.clone();
            let moved = match target {
                Some(DropTarget::Slot(slot)) => ctx.move_to_slot(region, &id, slot),
                None => false,
            };
            // Captured now, sent after the drag settles
            let pending = moved.then(|| ctx.sync.reordered(region));

            spawn_local(async move {
                // Let the moved nodes land before editors re-bind
                TimeoutFuture::new(0).await;
                if let Err(e) = ctx.sync.drag_ended(region, &id) {
                    warn!(%region, error = %e, "drag end rejected");
                }
                if let Some(pending) = pending {
                    pending.await;
                }
            });
        },
    );
}

/// Column of sortable sections
#[component]
pub fn SortableColumn(region: Region) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let dnd = create_dnd_signals();
    bind_region(&ctx, region, dnd);

    let layout = ctx.layout.clone();
    let version = ctx.version;
    let ids = move || {
        version.get();
        layout.order(region)
    };

    view! {
        <div class=format!("profile-column {region}-column") id=format!("{region}_column")>
            <For
                each=ids
                key=|id| id.clone()
                children=move |id| {
                    view! {
                        <DropZone dnd=dnd region=region before=Some(id.clone()) />
                        <SectionCard dnd=dnd region=region id=id />
                    }
                }
            />
            <DropZone dnd=dnd region=region before=None />
        </div>
    }
}

#[component]
fn SectionCard(dnd: DndSignals, region: Region, id: String) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let title = ctx.title(&id);
    let editor = (region == RICH_TEXT_REGION)
        .then(|| ctx.editor_content(&id))
        .flatten()
        .map(|content| {
            view! { <textarea class=EDITOR_CLASS id=format!("editor-{id}") prop:value=content></textarea> }
        });

    let on_mousedown = make_on_mousedown(dnd, id.clone());
    let dragged = id.clone();
    let item_class = move || {
        if dnd.dragging_id_read.get().as_deref() == Some(dragged.as_str()) {
            "sortable-item dragging"
        } else {
            "sortable-item"
        }
    };

    view! {
        <div class=item_class id=id on:mousedown=on_mousedown>
            <h3 class="sortable-handle">{title}</h3>
            {editor}
        </div>
    }
}
