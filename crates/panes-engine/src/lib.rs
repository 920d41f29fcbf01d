// ABOUTME: Public face of the panes layout engine.
// ABOUTME: Wires commands, geometry, content pool and renderer behind one API.

mod engine;
mod error;
mod event;

pub use engine::PaneEngine;
pub use error::EngineError;
pub use event::LayoutEvent;

pub use panes_core::{
    Direction, EngineConfig, NodeId, Orientation, PaneId, Point, Rect, SessionFile, SplitPosition,
};
pub use panes_layout::{DividerHit, LayoutGeometry, LayoutTree, PaneNode, PointerSource};
pub use panes_render::{
    ContentHandle, ContentProvider, PaneContent, PaneSurface, PlaceholderSurface, ProviderError,
    RenderReport,
};
