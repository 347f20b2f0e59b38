//! Page Bootstrap
//!
//! The server renders the sync endpoints, the CSRF token and the initial
//! profile state into the page; this module reads them back.
//!
//! ```html
//! <input type="hidden" id="save-profile-left" value="/save-profile-order/left/">
//! <input type="hidden" id="save-profile-right" value="/save-profile-order/right/">
//! <input type="hidden" id="save-works-order" value="/save-works-order/">
//! <input type="hidden" id="save-works-visibility" value="/save-works-visibility/">
//! <input type="hidden" name="csrfmiddlewaretoken" value="...">
//! <script type="application/json" id="profile-state">{"page": {...}, "stored": {...}}</script>
//! ```

use std::collections::BTreeMap;

use profile_sync::{Endpoints, RenderedPage, StoredProfile, SyncConfig};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::Document;

pub const STATE_SCRIPT_ID: &str = "profile-state";

/// Initial state embedded by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageState {
    /// Items that currently exist, in presentation order
    pub page: RenderedPage,
    #[serde(default)]
    pub stored: StoredProfile,
    /// Display titles; items without one show their id
    #[serde(default)]
    pub titles: BTreeMap<String, String>,
    /// Left-column items with a rich-text editor, mapped to its initial HTML
    #[serde(default)]
    pub editors: BTreeMap<String, String>,
}

impl PageState {
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("invalid {STATE_SCRIPT_ID} JSON: {e}"))
    }
}

fn input_value(document: &Document, selector: &str) -> Result<String, String> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
        .map(|input| input.value())
        .ok_or_else(|| format!("missing input {selector}"))
}

pub fn read_config(document: &Document) -> Result<SyncConfig, String> {
    let endpoints = Endpoints {
        left: input_value(document, "[id=save-profile-left]")?,
        right: input_value(document, "[id=save-profile-right]")?,
        works: input_value(document, "[id=save-works-order]")?,
        works_work: input_value(document, "[id=save-works-visibility]")?,
    };
    let csrf_token = input_value(document, "[name='csrfmiddlewaretoken']")?;

    let mut config = SyncConfig::new(endpoints, csrf_token);
    config.base_url = web_sys::window().and_then(|w| w.location().origin().ok());
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

pub fn read_state(document: &Document) -> Result<PageState, String> {
    let raw = document
        .get_element_by_id(STATE_SCRIPT_ID)
        .and_then(|el| el.text_content())
        .ok_or_else(|| format!("missing #{STATE_SCRIPT_ID}"))?;
    PageState::from_json(&raw)
}

/// Everything the editor needs from the page
pub fn load() -> Result<(SyncConfig, PageState), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    Ok((read_config(&document)?, read_state(&document)?))
}
