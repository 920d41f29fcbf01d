// ABOUTME: Notifications emitted by the engine, queued until the host drains them.

use panes_core::PaneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEvent {
    /// Panes were added to or removed from the tree
    StructureChanged,
    PaneAdded(PaneId),
    PaneRemoved(PaneId),
    /// `None` means no pane, on either side
    FocusChanged {
        old: Option<PaneId>,
        new: Option<PaneId>,
    },
    /// Pane or divider rectangles changed
    LayoutChanged,
}
