//! Pointer drag/drop protocol.
//!
//! A drag carries a [`DragData`] payload encoded as JSON (the transfer
//! string a host hands to its drag source). Drops are resolved against
//! enumerated [`DropTarget`]s into the one normalized [`MoveRequest`]
//! shape that both this protocol and the keyboard engine produce.

use serde::{Deserialize, Serialize};

use crate::model::{ColumnCatalog, Pane};

/// Transfer payload for an in-flight drag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragData {
    pub key: String,
    pub source_pane: Pane,
    pub source_index: usize,
    /// Display title, carried for drag previews only
    pub title: String,
}

impl DragData {
    pub fn new(key: impl Into<String>, source_pane: Pane, source_index: usize, title: impl Into<String>) -> Self {
        DragData {
            key: key.into(),
            source_pane,
            source_index,
            title: title.into(),
        }
    }

    /// Encode as a JSON transfer string
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse a transfer string. Malformed payloads yield `None` — the
    /// caller treats the drop as a no-op, never an error.
    pub fn parse(raw: &str) -> Option<DragData> {
        serde_json::from_str(raw).ok()
    }
}

/// A place a drag can land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    /// The pane body: a membership move, appending to the target.
    /// A pane-level drop never reorders.
    Pane { pane: Pane },
    /// A gap between selected-pane items (0 = before the first)
    Insertion { index: usize },
}

/// A drop zone plus whether the current drag may land there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub zone: DropZone,
    pub valid: bool,
}

/// The move and reorder halves of a [`MoveRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOp {
    /// Membership change between panes
    Move,
    /// Position change within the selected pane
    Reorder,
}

/// The single normalized state-change request both front ends produce.
/// `to_index` is the final resting position in the target pane and is
/// clamped to the target length on apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub column_key: String,
    pub from_pane: Pane,
    pub to_pane: Pane,
    pub from_index: usize,
    pub to_index: usize,
    pub op: MoveOp,
}

/// Whether a selected-pane insertion drop at `index` is allowed.
/// The gaps on either side of the dragged item are rejected (dropping
/// there is a no-op); everything else is valid, locked columns
/// included — reordering a locked column in place is permitted even
/// though removing it is not.
pub fn can_drop_at_index(drag: &DragData, index: usize) -> bool {
    if drag.source_pane != Pane::Selected {
        return true;
    }
    index != drag.source_index && index != drag.source_index + 1
}

/// Enumerate the drop targets one pane offers for the current drag:
/// its pane zone, plus `item_count + 1` insertion gaps when the pane
/// is Selected.
pub fn drop_zones(
    pane: Pane,
    item_count: usize,
    drag: &DragData,
    catalog: &ColumnCatalog,
) -> Vec<DropTarget> {
    let locked = catalog.is_locked(&drag.key);
    // A pane drop is only a membership move into the other pane, and
    // locked columns never change panes this way.
    let pane_valid = pane != drag.source_pane && !locked;
    let mut targets = vec![DropTarget {
        zone: DropZone::Pane { pane },
        valid: pane_valid,
    }];

    if pane == Pane::Selected {
        for index in 0..=item_count {
            targets.push(DropTarget {
                zone: DropZone::Insertion { index },
                valid: can_drop_at_index(drag, index),
            });
        }
    }

    targets
}

/// Resolve a drop into a [`MoveRequest`], or `None` when the drop is a
/// no-op (invalid zone or same-pane pane drop). `target_len` is the
/// current length of the pane being dropped into.
pub fn drop_result(drag: &DragData, zone: &DropZone, target_len: usize) -> Option<MoveRequest> {
    match zone {
        DropZone::Pane { pane } => {
            if *pane == drag.source_pane {
                return None;
            }
            Some(MoveRequest {
                column_key: drag.key.clone(),
                from_pane: drag.source_pane,
                to_pane: *pane,
                from_index: drag.source_index,
                to_index: target_len,
                op: MoveOp::Move,
            })
        }
        DropZone::Insertion { index } => {
            if drag.source_pane == Pane::Selected {
                if !can_drop_at_index(drag, *index) {
                    return None;
                }
                // Gap index in the pre-removal list; past the dragged
                // item the final position shifts down by one.
                let to_index = if *index > drag.source_index {
                    index - 1
                } else {
                    *index
                };
                Some(MoveRequest {
                    column_key: drag.key.clone(),
                    from_pane: Pane::Selected,
                    to_pane: Pane::Selected,
                    from_index: drag.source_index,
                    to_index,
                    op: MoveOp::Reorder,
                })
            } else {
                Some(MoveRequest {
                    column_key: drag.key.clone(),
                    from_pane: drag.source_pane,
                    to_pane: Pane::Selected,
                    from_index: drag.source_index,
                    to_index: *index,
                    op: MoveOp::Move,
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Visual helpers — never authoritative, never mutate state

/// Label for a drag preview element
pub fn preview_label(drag: &DragData) -> String {
    format!("⠿ {}", drag.title)
}

/// Which rendered row an insertion line sits above, if the zone is an
/// insertion gap
pub fn insertion_line_row(zone: &DropZone) -> Option<usize> {
    match zone {
        DropZone::Insertion { index } => Some(*index),
        DropZone::Pane { .. } => None,
    }
}
