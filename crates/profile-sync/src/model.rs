//! Item Tree Model
//!
//! Sortable regions of the profile editor and the read model the
//! synchronizer uses to capture state at event time.
//!
//! Position in a region's `Vec` is the only source of order.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};

/// One of the three independently sortable zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Left,
    Right,
    Works,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Left, Region::Right, Region::Works];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Left => "left",
            Region::Right => "right",
            Region::Works => "works",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Left/right column item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
}

/// Visibility checkbox nested under a work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubItem {
    pub id: String,
    pub visible: bool,
    /// Presentation state only, derived from the owning heading flag
    #[serde(skip, default = "enabled")]
    pub interactive: bool,
}

fn enabled() -> bool {
    true
}

/// A works heading with its nested sub-items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    pub id: String,
    pub heading_visible: bool,
    #[serde(default)]
    pub sub_items: Vec<SubItem>,
}

/// Read model over the live UI.
///
/// Implementations must answer from current state on every call; the
/// synchronizer relies on reads taken at event time, never on a cache.
pub trait ItemTree {
    /// Current top-to-bottom ids of a region. Empty when the region is empty.
    fn order(&self, region: Region) -> Vec<String>;

    /// `heading_visible` per work id
    fn heading_flags(&self) -> BTreeMap<String, bool>;

    /// `visible` per sub-item id across all works
    fn sub_item_flags(&self) -> BTreeMap<String, bool>;

    /// Sub-item ids owned by a work, empty for unknown works
    fn sub_items_of(&self, work_id: &str) -> Vec<String>;
}

/// Write side for presentation state that never touches stored values
pub trait ControlSurface {
    fn set_sub_item_interactive(&self, sub_item_id: &str, interactive: bool);
}

/// Order and visibility as persisted by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProfile {
    #[serde(default)]
    pub left_order: Vec<String>,
    #[serde(default)]
    pub right_order: Vec<String>,
    #[serde(default)]
    pub works_order: Vec<String>,
    #[serde(default)]
    pub works_show: BTreeMap<String, bool>,
    #[serde(default)]
    pub works_work_show: BTreeMap<String, bool>,
}

/// A work as rendered by the server, in presentation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedWork {
    pub id: String,
    #[serde(default)]
    pub sub_items: Vec<String>,
}

/// Items that currently exist on the page, before stored order is applied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPage {
    #[serde(default)]
    pub left: Vec<String>,
    #[serde(default)]
    pub right: Vec<String>,
    #[serde(default)]
    pub works: Vec<RenderedWork>,
}

/// Apply a stored order to the ids currently present.
///
/// Stored ids that no longer exist are dropped; present ids missing from the
/// stored order are appended in presentation order.
pub fn merge_order(stored: &[String], present: &[String]) -> Vec<String> {
    let present_set: HashSet<&str> = present.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(present.len());
    let mut merged = Vec::with_capacity(present.len());

    for id in stored {
        if present_set.contains(id.as_str()) && seen.insert(id.as_str()) {
            merged.push(id.clone());
        }
    }
    for id in present {
        if seen.insert(id.as_str()) {
            merged.push(id.clone());
        }
    }
    merged
}

fn check_unique<'a>(region: &str, ids: impl IntoIterator<Item = &'a str>) -> LayoutResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(LayoutError::DuplicateId {
                region: region.to_string(),
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// In-memory state of all three regions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileLayout {
    #[serde(default)]
    pub left: Vec<Section>,
    #[serde(default)]
    pub right: Vec<Section>,
    #[serde(default)]
    pub works: Vec<Work>,
}

impl ProfileLayout {
    pub fn new(left: Vec<Section>, right: Vec<Section>, works: Vec<Work>) -> LayoutResult<Self> {
        let layout = Self { left, right, works };
        layout.validate()?;
        Ok(layout)
    }

    /// Build the page-load layout from rendered items and stored preferences.
    /// Missing visibility flags default to visible.
    pub fn reconcile(page: &RenderedPage, stored: &StoredProfile) -> LayoutResult<Self> {
        check_unique("left", page.left.iter().map(String::as_str))?;
        check_unique("right", page.right.iter().map(String::as_str))?;
        check_unique("works", page.works.iter().map(|w| w.id.as_str()))?;

        let sections = |stored: &[String], present: &[String]| -> Vec<Section> {
            merge_order(stored, present)
                .into_iter()
                .map(|id| Section { id })
                .collect()
        };

        let work_ids: Vec<String> = page.works.iter().map(|w| w.id.clone()).collect();
        let works = merge_order(&stored.works_order, &work_ids)
            .iter()
            .filter_map(|id| page.works.iter().find(|w| &w.id == id))
            .map(|rendered| Work {
                id: rendered.id.clone(),
                heading_visible: stored.works_show.get(&rendered.id).copied().unwrap_or(true),
                sub_items: rendered
                    .sub_items
                    .iter()
                    .map(|sub| SubItem {
                        id: sub.clone(),
                        visible: stored.works_work_show.get(sub).copied().unwrap_or(true),
                        interactive: true,
                    })
                    .collect(),
            })
            .collect();

        Self::new(
            sections(&stored.left_order, &page.left),
            sections(&stored.right_order, &page.right),
            works,
        )
    }

    /// Check id uniqueness per region. Sub-item ids are checked across all
    /// works because their flags travel in one flat map.
    pub fn validate(&self) -> LayoutResult<()> {
        check_unique("left", self.left.iter().map(|s| s.id.as_str()))?;
        check_unique("right", self.right.iter().map(|s| s.id.as_str()))?;
        check_unique("works", self.works.iter().map(|w| w.id.as_str()))?;
        check_unique(
            "sub-items",
            self.works
                .iter()
                .flat_map(|w| w.sub_items.iter().map(|s| s.id.as_str())),
        )
    }

    /// Move the item at `from` so it ends up at index `to`
    pub fn move_item(&mut self, region: Region, from: usize, to: usize) -> LayoutResult<()> {
        fn shift<T>(items: &mut Vec<T>, region: Region, from: usize, to: usize) -> LayoutResult<()> {
            let len = items.len();
            for index in [from, to] {
                if index >= len {
                    return Err(LayoutError::OutOfRange { region, index, len });
                }
            }
            let item = items.remove(from);
            items.insert(to, item);
            Ok(())
        }

        match region {
            Region::Left => shift(&mut self.left, region, from, to),
            Region::Right => shift(&mut self.right, region, from, to),
            Region::Works => shift(&mut self.works, region, from, to),
        }
    }

    pub fn work(&self, work_id: &str) -> Option<&Work> {
        self.works.iter().find(|w| w.id == work_id)
    }

    pub fn sub_item(&self, sub_item_id: &str) -> Option<&SubItem> {
        self.works
            .iter()
            .flat_map(|w| w.sub_items.iter())
            .find(|s| s.id == sub_item_id)
    }

    fn sub_item_mut(&mut self, sub_item_id: &str) -> Option<&mut SubItem> {
        self.works
            .iter_mut()
            .flat_map(|w| w.sub_items.iter_mut())
            .find(|s| s.id == sub_item_id)
    }

    pub fn set_heading_visible(&mut self, work_id: &str, visible: bool) -> LayoutResult<()> {
        let work = self
            .works
            .iter_mut()
            .find(|w| w.id == work_id)
            .ok_or_else(|| LayoutError::UnknownId(work_id.to_string()))?;
        work.heading_visible = visible;
        Ok(())
    }

    /// Toggle a sub-item. Rejected while the control is disabled, the same
    /// way a disabled checkbox cannot be clicked.
    pub fn set_sub_item_visible(&mut self, sub_item_id: &str, visible: bool) -> LayoutResult<()> {
        let sub = self
            .sub_item_mut(sub_item_id)
            .ok_or_else(|| LayoutError::UnknownId(sub_item_id.to_string()))?;
        if !sub.interactive {
            return Err(LayoutError::Disabled(sub_item_id.to_string()));
        }
        sub.visible = visible;
        Ok(())
    }

    pub fn set_interactive(&mut self, sub_item_id: &str, interactive: bool) {
        if let Some(sub) = self.sub_item_mut(sub_item_id) {
            sub.interactive = interactive;
        }
    }
}

impl ItemTree for ProfileLayout {
    fn order(&self, region: Region) -> Vec<String> {
        match region {
            Region::Left => self.left.iter().map(|s| s.id.clone()).collect(),
            Region::Right => self.right.iter().map(|s| s.id.clone()).collect(),
            Region::Works => self.works.iter().map(|w| w.id.clone()).collect(),
        }
    }

    fn heading_flags(&self) -> BTreeMap<String, bool> {
        self.works
            .iter()
            .map(|w| (w.id.clone(), w.heading_visible))
            .collect()
    }

    fn sub_item_flags(&self) -> BTreeMap<String, bool> {
        self.works
            .iter()
            .flat_map(|w| w.sub_items.iter())
            .map(|s| (s.id.clone(), s.visible))
            .collect()
    }

    fn sub_items_of(&self, work_id: &str) -> Vec<String> {
        self.work(work_id)
            .map(|w| w.sub_items.iter().map(|s| s.id.clone()).collect())
            .unwrap_or_default()
    }
}

/// Cloneable handle to one layout, shared by the UI and the synchronizer
#[derive(Debug, Clone, Default)]
pub struct SharedLayout {
    inner: Arc<RwLock<ProfileLayout>>,
}

impl SharedLayout {
    pub fn new(layout: ProfileLayout) -> Self {
        Self {
            inner: Arc::new(RwLock::new(layout)),
        }
    }

    pub fn snapshot(&self) -> ProfileLayout {
        self.inner.read().clone()
    }

    pub fn work(&self, work_id: &str) -> Option<Work> {
        self.inner.read().work(work_id).cloned()
    }

    pub fn sub_item(&self, sub_item_id: &str) -> Option<SubItem> {
        self.inner.read().sub_item(sub_item_id).cloned()
    }

    pub fn is_interactive(&self, sub_item_id: &str) -> Option<bool> {
        self.inner.read().sub_item(sub_item_id).map(|s| s.interactive)
    }

    pub fn move_item(&self, region: Region, from: usize, to: usize) -> LayoutResult<()> {
        self.inner.write().move_item(region, from, to)
    }

    pub fn set_heading_visible(&self, work_id: &str, visible: bool) -> LayoutResult<()> {
        self.inner.write().set_heading_visible(work_id, visible)
    }

    pub fn set_sub_item_visible(&self, sub_item_id: &str, visible: bool) -> LayoutResult<()> {
        self.inner.write().set_sub_item_visible(sub_item_id, visible)
    }
}

impl ItemTree for SharedLayout {
    fn order(&self, region: Region) -> Vec<String> {
        self.inner.read().order(region)
    }

    fn heading_flags(&self) -> BTreeMap<String, bool> {
        self.inner.read().heading_flags()
    }

    fn sub_item_flags(&self) -> BTreeMap<String, bool> {
        self.inner.read().sub_item_flags()
    }

    fn sub_items_of(&self, work_id: &str) -> Vec<String> {
        self.inner.read().sub_items_of(work_id)
    }
}

impl ControlSurface for SharedLayout {
    fn set_sub_item_interactive(&self, sub_item_id: &str, interactive: bool) {
        self.inner.write().set_interactive(sub_item_id, interactive);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    pub(crate) fn work(id: &str, heading_visible: bool, subs: &[(&str, bool)]) -> Work {
        Work {
            id: id.to_string(),
            heading_visible,
            sub_items: subs
                .iter()
                .map(|(sub, visible)| SubItem {
                    id: sub.to_string(),
                    visible: *visible,
                    interactive: true,
                })
                .collect(),
        }
    }

    pub(crate) fn sections(list: &[&str]) -> Vec<Section> {
        list.iter().map(|id| Section { id: id.to_string() }).collect()
    }

    #[test]
    fn test_merge_order_drops_stale_and_appends_new() {
        let merged = merge_order(&ids(&["c", "gone", "a"]), &ids(&["a", "b", "c"]));
        assert_eq!(merged, ids(&["c", "a", "b"]));
    }

    #[test]
    fn test_merge_order_empty_stored_keeps_presentation_order() {
        assert_eq!(merge_order(&[], &ids(&["x", "y"])), ids(&["x", "y"]));
        assert!(merge_order(&ids(&["x"]), &[]).is_empty());
    }

    #[test]
    fn test_reconcile_applies_stored_order_and_default_flags() {
        let page = RenderedPage {
            left: ids(&["about", "education"]),
            right: ids(&["links"]),
            works: vec![
                RenderedWork { id: "A".into(), sub_items: ids(&["a1", "a2"]) },
                RenderedWork { id: "B".into(), sub_items: ids(&["b1"]) },
            ],
        };
        let stored = StoredProfile {
            left_order: ids(&["education", "about"]),
            works_order: ids(&["B", "A"]),
            works_show: BTreeMap::from([("B".to_string(), false)]),
            works_work_show: BTreeMap::from([("a2".to_string(), false)]),
            ..Default::default()
        };

        let layout = ProfileLayout::reconcile(&page, &stored).unwrap();

        assert_eq!(layout.order(Region::Left), ids(&["education", "about"]));
        assert_eq!(layout.order(Region::Right), ids(&["links"]));
        assert_eq!(layout.order(Region::Works), ids(&["B", "A"]));
        assert_eq!(layout.heading_flags()["A"], true);
        assert_eq!(layout.heading_flags()["B"], false);
        assert_eq!(layout.sub_item_flags()["a1"], true);
        assert_eq!(layout.sub_item_flags()["a2"], false);
        assert_eq!(layout.sub_items_of("A"), ids(&["a1", "a2"]));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = ProfileLayout::new(sections(&["a", "a"]), vec![], vec![]).unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateId { ref id, .. } if id == "a"));

        let err = ProfileLayout::new(
            vec![],
            vec![],
            vec![work("A", true, &[("s", true)]), work("B", true, &[("s", true)])],
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateId { ref region, .. } if region == "sub-items"));
    }

    #[test]
    fn test_same_id_allowed_in_different_regions() {
        assert!(ProfileLayout::new(sections(&["x"]), sections(&["x"]), vec![]).is_ok());
    }

    #[test]
    fn test_move_item() {
        let mut layout = ProfileLayout::new(sections(&["a", "b", "c"]), vec![], vec![]).unwrap();
        layout.move_item(Region::Left, 0, 2).unwrap();
        assert_eq!(layout.order(Region::Left), ids(&["b", "c", "a"]));
        layout.move_item(Region::Left, 2, 0).unwrap();
        assert_eq!(layout.order(Region::Left), ids(&["a", "b", "c"]));
    }

    #[test]
    fn test_move_item_out_of_range() {
        let mut layout = ProfileLayout::new(sections(&["a"]), vec![], vec![]).unwrap();
        let err = layout.move_item(Region::Left, 0, 3).unwrap_err();
        assert_eq!(err, LayoutError::OutOfRange { region: Region::Left, index: 3, len: 1 });
        assert!(layout.move_item(Region::Right, 0, 0).is_err());
    }

    #[test]
    fn test_empty_region_order() {
        let layout = ProfileLayout::default();
        for region in Region::ALL {
            assert!(layout.order(region).is_empty());
        }
        assert!(layout.sub_items_of("missing").is_empty());
    }

    #[test]
    fn test_disabled_sub_item_cannot_toggle() {
        let mut layout =
            ProfileLayout::new(vec![], vec![], vec![work("A", true, &[("a1", true)])]).unwrap();
        layout.set_interactive("a1", false);
        assert_eq!(
            layout.set_sub_item_visible("a1", false),
            Err(LayoutError::Disabled("a1".into()))
        );
        assert_eq!(layout.sub_item("a1").unwrap().visible, true);

        layout.set_interactive("a1", true);
        layout.set_sub_item_visible("a1", false).unwrap();
        assert_eq!(layout.sub_item("a1").unwrap().visible, false);
    }

    #[test]
    fn test_unknown_ids() {
        let mut layout = ProfileLayout::default();
        assert_eq!(
            layout.set_heading_visible("nope", true),
            Err(LayoutError::UnknownId("nope".into()))
        );
        assert_eq!(
            layout.set_sub_item_visible("nope", true),
            Err(LayoutError::UnknownId("nope".into()))
        );
    }

    #[test]
    fn test_shared_layout_reads_latest_state() {
        let shared = SharedLayout::new(
            ProfileLayout::new(sections(&["a", "b"]), vec![], vec![]).unwrap(),
        );
        let reader = shared.clone();
        shared.move_item(Region::Left, 1, 0).unwrap();
        assert_eq!(reader.order(Region::Left), ids(&["b", "a"]));
        assert!(reader.work("A").is_none());
        assert!(reader.sub_item("a1").is_none());
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let shared = SharedLayout::new(
            ProfileLayout::new(sections(&["a", "b"]), vec![], vec![work("W", true, &[("w1", true)])]).unwrap(),
        );
        let before = shared.snapshot();
        shared.set_heading_visible("W", false).unwrap();

        assert!(before.work("W").unwrap().heading_visible);
        let after = shared.snapshot();
        assert!(!after.work("W").unwrap().heading_visible);
        assert_eq!(after.order(Region::Left), ids(&["a", "b"]));
    }
}
