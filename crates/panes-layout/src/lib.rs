// ABOUTME: Pane layout management for the panes engine.
// ABOUTME: Tree model, geometry, undoable commands, drag resizing, focus and session codec.

pub mod codec;
mod command;
mod controller;
pub mod drag;
mod error;
pub mod focus;
pub mod geometry;
mod tree;

pub use codec::{CodecError, RestoredLayout, SessionDocument, SessionNode};
pub use command::Command;
pub use controller::{CommandController, StructureDelta};
pub use drag::{DragPoller, DragResizeController, DragSession, DragState, PointerSource};
pub use error::LayoutError;
pub use focus::{FocusChange, FocusTracker};
pub use geometry::{DividerHit, GeometryCalculator, LayoutGeometry, RatioOverride};
pub use tree::{LayoutTree, LeafNode, PaneNode, SplitNode, RATIO_EPSILON};

pub use panes_core::{Direction, NodeId, Orientation, PaneId, Point, Rect, SplitPosition};
