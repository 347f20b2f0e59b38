//! Drop Zone Component
//!
//! A horizontal gap between items for drag-and-drop reordering.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_mouseleave, make_on_zone_mouseenter, DndSignals, DropTarget};
use profile_sync::{ItemTree, Region};

use crate::context::AppContext;

/// Gap shown between items while dragging
#[component]
pub fn DropZone(
    dnd: DndSignals,
    region: Region,
    /// Item this gap sits above; `None` is the gap after the last item
    before: Option<String>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let layout = ctx.layout.clone();

    // Resolved on every use; the gap's index moves with its item
    let slot = move || {
        let order = layout.order(region);
        match &before {
            Some(id) => order.iter().position(|i| i == id).unwrap_or(order.len()),
            None => order.len(),
        }
    };

    let on_mouseenter = make_on_zone_mouseenter(dnd, slot.clone());
    let on_mouseleave = make_on_mouseleave(dnd);

    let is_active = move || matches!(dnd.drop_target_read.get(), Some(DropTarget::Slot(s)) if s == slot());
    let is_dragging = move || dnd.dragging_id_read.get().is_some();

    let zone_class = move || {
        let mut c = String::from("drop-zone");
        if !is_dragging() { c.push_str(" hidden"); }
        if is_active() { c.push_str(" active"); }
        c
    };

    view! {
        <div
            class=zone_class
            on:mouseenter=on_mouseenter
            on:mouseleave=on_mouseleave
        />
    }
}
