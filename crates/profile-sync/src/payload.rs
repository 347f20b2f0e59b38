//! Sync Payloads
//!
//! Flattens item-tree state into the body each endpoint expects.
//! Every payload carries all three fields; fields a kind does not use are
//! sent as `[]` or `{}`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ItemTree, Region};

/// Payload variant, one per endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncKind {
    Left,
    Right,
    Works,
    WorksWork,
}

impl SyncKind {
    pub const ALL: [SyncKind; 4] = [
        SyncKind::Left,
        SyncKind::Right,
        SyncKind::Works,
        SyncKind::WorksWork,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncKind::Left => "left",
            SyncKind::Right => "right",
            SyncKind::Works => "works",
            SyncKind::WorksWork => "works_work",
        }
    }

    /// Kind sent when a region is reordered
    pub fn for_region(region: Region) -> Self {
        match region {
            Region::Left => SyncKind::Left,
            Region::Right => SyncKind::Right,
            Region::Works => SyncKind::Works,
        }
    }
}

impl fmt::Display for SyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body of a sync request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPayload {
    #[serde(default)]
    pub item_order: Vec<String>,
    #[serde(default)]
    pub show_work_values: BTreeMap<String, bool>,
    #[serde(default)]
    pub works_visibility: BTreeMap<String, bool>,
}

/// Build the payload for `kind`, discarding inputs the kind does not carry
pub fn serialize(
    kind: SyncKind,
    order: Vec<String>,
    heading_flags: BTreeMap<String, bool>,
    sub_item_flags: BTreeMap<String, bool>,
) -> SyncPayload {
    match kind {
        SyncKind::Left | SyncKind::Right => SyncPayload {
            item_order: order,
            ..Default::default()
        },
        SyncKind::Works => SyncPayload {
            item_order: order,
            show_work_values: heading_flags,
            ..Default::default()
        },
        SyncKind::WorksWork => SyncPayload {
            works_visibility: sub_item_flags,
            ..Default::default()
        },
    }
}

/// Read only what `kind` needs from the tree, then serialize it
pub fn capture<T: ItemTree + ?Sized>(kind: SyncKind, tree: &T) -> SyncPayload {
    match kind {
        SyncKind::Left => serialize(kind, tree.order(Region::Left), BTreeMap::new(), BTreeMap::new()),
        SyncKind::Right => serialize(kind, tree.order(Region::Right), BTreeMap::new(), BTreeMap::new()),
        SyncKind::Works => serialize(
            kind,
            tree.order(Region::Works),
            tree.heading_flags(),
            BTreeMap::new(),
        ),
        SyncKind::WorksWork => serialize(kind, Vec::new(), BTreeMap::new(), tree.sub_item_flags()),
    }
}
