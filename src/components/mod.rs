//! UI Components
//!
//! Reusable Leptos components.

mod drop_zone;
mod save_indicator;
mod sortable_column;
mod works_list;

pub use drop_zone::DropZone;
pub use save_indicator::SaveIndicator;
pub use sortable_column::SortableColumn;
pub use works_list::WorksList;
