// ABOUTME: The closed set of layout mutations.
// ABOUTME: Each command turns one tree into a new tree, or fails without side effects.

use panes_core::{IdAllocator, NodeId, PaneId, SplitPosition};

use crate::tree::{LayoutTree, LeafNode};
use crate::LayoutError;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Split `pane_id`, placing a new pane showing `widget_id` at `position`.
    /// `ratio` is the new pane's share of the split.
    Split {
        pane_id: PaneId,
        widget_id: String,
        position: SplitPosition,
        ratio: f64,
    },
    Remove {
        pane_id: PaneId,
    },
    SetRatios {
        node_id: NodeId,
        ratios: Vec<f64>,
    },
}

impl Command {
    /// Short human readable label, for logs and history UIs
    pub fn description(&self) -> String {
        match self {
            Command::Split {
                pane_id, position, ..
            } => format!("Split {} ({:?})", pane_id, position),
            Command::Remove { pane_id } => format!("Remove {}", pane_id),
            Command::SetRatios { node_id, .. } => format!("Resize {}", node_id),
        }
    }

    /// Build the tree that results from applying this command to `tree`.
    ///
    /// `tree` itself is never modified; on error the caller simply keeps it.
    pub fn apply(&self, tree: &LayoutTree, ids: &mut IdAllocator) -> Result<LayoutTree, LayoutError> {
        match self {
            Command::Split {
                pane_id,
                widget_id,
                position,
                ratio,
            } => {
                if tree.is_empty() {
                    return Err(LayoutError::EmptyLayout);
                }
                let new_leaf = LeafNode::new(ids.node(), ids.pane(), widget_id.clone());
                tree.with_split(*pane_id, new_leaf, ids.node(), *position, *ratio)
            }
            Command::Remove { pane_id } => tree.without_pane(*pane_id),
            Command::SetRatios { node_id, ratios } => tree.with_ratios(*node_id, ratios),
        }
    }
}
