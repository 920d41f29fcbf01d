// ABOUTME: Error type for rejected layout operations.
// ABOUTME: Every variant means the tree was left untouched.

use panes_core::{NodeId, PaneId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("Unknown pane: {0}")]
    UnknownPane(PaneId),

    #[error("Unknown split node: {0}")]
    UnknownNode(NodeId),

    #[error("Cannot remove {0}: it is the last pane")]
    LastPane(PaneId),

    #[error("Invalid ratio: {0}")]
    InvalidRatio(f64),

    #[error("Ratio list has {got} entries but the split has {expected} children")]
    RatioCountMismatch { expected: usize, got: usize },

    #[error("Ratios must sum to 1.0, got {0}")]
    RatioSum(f64),

    #[error("Layout is empty")]
    EmptyLayout,

    #[error("Pane limit of {0} reached")]
    PaneLimit(usize),

    #[error("Layout invariant violated: {0}")]
    Invariant(String),
}
