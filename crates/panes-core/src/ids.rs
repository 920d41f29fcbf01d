// ABOUTME: Stable identifiers for panes and tree nodes.
// ABOUTME: Both are allocated from a single monotonic counter and never reused.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Engine-assigned identifier of a layout slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(pub u64);

/// Identifier of a tree node (leaf or split).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pane#{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Hands out fresh pane and node ids.
///
/// Ids are never recycled, so an id that was removed and later restored by
/// undo can't collide with anything allocated in between.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn pane(&mut self) -> PaneId {
        PaneId(self.bump())
    }

    pub fn node(&mut self) -> NodeId {
        NodeId(self.bump())
    }

    /// Make sure future ids are strictly greater than `seen`.
    pub fn observe(&mut self, seen: u64) {
        if seen >= self.next {
            self.next = seen + 1;
        }
    }

    fn bump(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
