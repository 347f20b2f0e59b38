//! Works List Component
//!
//! Sortable works, each with a heading checkbox and nested sub-item
//! checkboxes. Sub-items are disabled while their heading is hidden.

use leptos::prelude::*;
use leptos_dragdrop::*;
use profile_sync::{ItemTree, Region};

use crate::components::sortable_column::bind_region;
use crate::components::DropZone;
use crate::context::AppContext;

#[component]
pub fn WorksList() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let dnd = create_dnd_signals();
    bind_region(&ctx, Region::Works, dnd);

    let layout = ctx.layout.clone();
    let version = ctx.version;
    let ids = move || {
        version.get();
        layout.order(Region::Works)
    };

    view! {
        <div class="works-list" id="works_list">
            <For
                each=ids
                key=|id| id.clone()
                children=move |id| {
                    view! {
                        <DropZone dnd=dnd region=Region::Works before=Some(id.clone()) />
                        <WorkCard dnd=dnd id=id />
                    }
                }
            />
            <DropZone dnd=dnd region=Region::Works before=None />
        </div>
    }
}

#[component]
fn WorkCard(dnd: DndSignals, id: String) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let title = ctx.title(&id);
    let sub_items = ctx.layout.sub_items_of(&id);

    let heading_checked = {
        let layout = ctx.layout.clone();
        let version = ctx.version;
        let id = id.clone();
        move || {
            version.get();
            layout.work(&id).map(|w| w.heading_visible).unwrap_or(false)
        }
    };
    let on_heading_change = {
        let ctx = ctx.clone();
        let id = id.clone();
        move |ev: leptos::ev::Event| ctx.toggle_heading(&id, event_target_checked(&ev))
    };

    let on_mousedown = make_on_mousedown(dnd, id.clone());
    let dragged = id.clone();
    let item_class = move || {
        if dnd.dragging_id_read.get().as_deref() == Some(dragged.as_str()) {
            "sortable-item work dragging"
        } else {
            "sortable-item work"
        }
    };

    view! {
        <div class=item_class id=id.clone() on:mousedown=on_mousedown>
            <label class="work-heading">
                <input
                    type="checkbox"
                    id=format!("show-work-{id}")
                    prop:checked=heading_checked
                    on:change=on_heading_change
                />
                {title}
            </label>
            <ul class="work-sub-items">
                {sub_items
                    .into_iter()
                    .map(|sub_id| view! { <SubItemToggle id=sub_id /> })
                    .collect_view()}
            </ul>
        </div>
    }
}

#[component]
fn SubItemToggle(id: String) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let title = ctx.title(&id);
    let state = {
        let layout = ctx.layout.clone();
        let version = ctx.version;
        let id = id.clone();
        move || {
            version.get();
            layout.sub_item(&id)
        }
    };
    let checked = {
        let state = state.clone();
        move || state().map(|s| s.visible).unwrap_or(false)
    };
    let disabled = move || !state().map(|s| s.interactive).unwrap_or(false);
    let is_disabled = disabled.clone();

    let on_change = {
        let ctx = ctx.clone();
        let id = id.clone();
        move |ev: leptos::ev::Event| ctx.toggle_sub_item(&id, event_target_checked(&ev))
    };

    view! {
        <li class=move || if is_disabled() { "sub-item disabled" } else { "sub-item" }>
            <label>
                <input
                    type="checkbox"
                    id=format!("show-item-{id}")
                    prop:checked=checked
                    prop:disabled=disabled
                    on:change=on_change
                />
                {title}
            </label>
        </li>
    }
}
