//! Profile Sort App
//!
//! Two section columns and the works list, bootstrapped from the page.

use leptos::prelude::*;
use profile_sync::Region;
use reactive_stores::Store;
use tracing::error;

use crate::components::{SaveIndicator, SortableColumn, WorksList};
use crate::context::AppContext;
use crate::page;
use crate::store::SaveState;

#[component]
pub fn App() -> impl IntoView {
    let store = Store::new(SaveState::default());
    provide_context(store);

    let ctx = page::load().and_then(|(config, state)| AppContext::new(config, state, store));
    match ctx {
        Ok(ctx) => {
            provide_context(ctx);
            view! { <ProfileEditor /> }.into_any()
        }
        Err(e) => {
            error!(error = %e, "profile editor unavailable");
            view! { <p class="profile-sort-error">{e}</p> }.into_any()
        }
    }
}

#[component]
fn ProfileEditor() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    // Editors bind once their textareas are in the DOM
    Effect::new(move |_| ctx.attach_editors());

    view! {
        <div class="profile-sort">
            <SaveIndicator />
            <div class="profile-columns">
                <SortableColumn region=Region::Left />
                <SortableColumn region=Region::Right />
            </div>
            <WorksList />
        </div>
    }
}
