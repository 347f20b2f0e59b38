//! Save Indicator Component
//!
//! Page-wide save status, with recent diagnostics while changes are unsaved.

use leptos::prelude::*;
use profile_sync::SaveStatus;
use rolling_logger::LogBuffer;

use crate::store::{summarize, use_save_store, SaveStateStoreFields};

#[component]
pub fn SaveIndicator() -> impl IntoView {
    let store = use_save_store();
    let logs = use_context::<LogBuffer>();

    let summary = move || summarize(&store.statuses().get(), &store.failures().get());
    // Re-read on every open; the buffer keeps filling while the panel exists
    let (dump, set_dump) = signal(String::new());

    view! {
        <div class="save-indicator">
            {move || match summary() {
                SaveStatus::Idle => view! { <span class="save-idle"></span> }.into_any(),
                SaveStatus::Saving => view! { <span class="save-saving">"Saving…"</span> }.into_any(),
                SaveStatus::Saved => view! { <span class="save-saved">"All changes saved"</span> }.into_any(),
                SaveStatus::Unsaved(reason) => {
                    let details = logs.clone().map(|logs| {
                        set_dump.set(logs.dump());
                        view! {
                            <details class="save-diagnostics" on:toggle=move |_| set_dump.set(logs.dump())>
                                <summary>"Details"</summary>
                                <pre>{move || dump.get()}</pre>
                            </details>
                        }
                    });
                    view! {
                        <span class="save-unsaved" title=reason>"Unsaved changes"</span>
                        {details}
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
