//! Rich-Text Editor Hooks
//!
//! Items in the left column embed rich-text editors. An editor must be
//! detached before its element moves and re-attached after the drop, or it
//! keeps references to stale nodes.

use serde::Serialize;

/// Fixed editor setup used on every re-attach
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorConfig {
    pub license_key: String,
    pub height: u32,
    pub width: String,
    pub custom_undo_redo_levels: u32,
    pub theme: String,
    pub plugins: String,
    pub toolbar1: String,
    pub contextmenu: String,
    pub menubar: bool,
    pub statusbar: bool,
    pub promotion: bool,
    pub forced_root_block: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            license_key: "gpl".into(),
            height: 360,
            width: "100%".into(),
            custom_undo_redo_levels: 20,
            theme: "silver".into(),
            plugins: "save link image media preview table code lists fullscreen insertdatetime \
                      nonbreaking directionality searchreplace wordcount visualblocks visualchars \
                      code fullscreen autolink lists charmap anchor pagebreak"
                .into(),
            toolbar1: "fullscreen preview bold italic underline | fontselect, fontsizeselect | \
                       forecolor backcolor | alignleft alignright | aligncenter alignjustify | \
                       indent outdent | bullist numlist table | | link | code"
                .into(),
            contextmenu: "formats | link image".into(),
            menubar: false,
            statusbar: true,
            promotion: false,
            forced_root_block: " ".into(),
        }
    }
}

/// Binds rich-text editors to the elements inside a sortable item
pub trait RichTextBinder: Send + Sync {
    /// Remove every editor bound inside `item_id`
    fn detach(&self, item_id: &str);

    /// Bind fresh editors inside `item_id`
    fn attach(&self, item_id: &str, config: &EditorConfig);
}
