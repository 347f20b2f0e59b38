//! TinyMCE Bridge
//!
//! `RichTextBinder` backed by the page's global `tinymce` object.

use profile_sync::{EditorConfig, RichTextBinder};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = tinymce, js_name = get, catch)]
    fn tinymce_get(id: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = tinymce, js_name = init, catch)]
    fn tinymce_init(config: &JsValue) -> Result<JsValue, JsValue>;
}

/// Class marking the textareas that carry an editor
pub(crate) const EDITOR_CLASS: &str = "tinymce";

/// Editor elements inside the item with `item_id`. The item is looked up by
/// id, so ids need no selector escaping.
fn editor_elements(item_id: &str) -> Vec<web_sys::Element> {
    let Some(item) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(item_id))
    else {
        return Vec::new();
    };
    let Ok(nodes) = item.query_selector_all(&format!(".{EDITOR_CLASS}")) else {
        warn!(item = %item_id, "editor lookup failed");
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .filter(|el| !el.id().is_empty())
        .collect()
}

/// Init settings shared by every editor; the element is passed as `target`
fn init_settings(config: &EditorConfig) -> Result<serde_json::Value, String> {
    serde_json::to_value(config).map_err(|e| e.to_string())
}

fn init_options(config: &EditorConfig, target: &web_sys::Element) -> Result<JsValue, String> {
    let settings = init_settings(config)?;
    let options = js_sys::JSON::parse(&settings.to_string()).map_err(|e| format!("{e:?}"))?;
    js_sys::Reflect::set(&options, &"target".into(), target).map_err(|e| format!("{e:?}"))?;
    Ok(options)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TinyMceBinder;

impl RichTextBinder for TinyMceBinder {
    fn detach(&self, item_id: &str) {
        for editor_id in editor_elements(item_id).iter().map(|el| el.id()) {
            let editor = match tinymce_get(&editor_id) {
                Ok(editor) if !editor.is_null() && !editor.is_undefined() => editor,
                Ok(_) => continue,
                Err(e) => {
                    warn!(editor = %editor_id, error = ?e, "tinymce unavailable");
                    return;
                }
            };
            let remove = js_sys::Reflect::get(&editor, &"remove".into())
                .ok()
                .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
            match remove.map(|f| f.call0(&editor)) {
                Some(Ok(_)) => debug!(editor = %editor_id, "editor removed"),
                Some(Err(e)) => warn!(editor = %editor_id, error = ?e, "editor remove failed"),
                None => warn!(editor = %editor_id, "editor has no remove()"),
            }
        }
    }

    fn attach(&self, item_id: &str, config: &EditorConfig) {
        for element in editor_elements(item_id) {
            let editor_id = element.id();
            let options = match init_options(config, &element) {
                Ok(options) => options,
                Err(e) => {
                    warn!(editor = %editor_id, error = %e, "bad editor config");
                    continue;
                }
            };
            if let Err(e) = tinymce_init(&options) {
                warn!(editor = %editor_id, error = ?e, "editor init failed");
                return;
            }
            debug!(editor = %editor_id, "editor attached");
        }
    }
}
