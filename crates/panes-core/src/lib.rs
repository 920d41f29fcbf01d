// ABOUTME: Shared types and configuration for the panes layout engine.
// ABOUTME: Defines identifiers, pixel rectangles, directions, config and session files.

pub mod config;
pub mod direction;
pub mod ids;
pub mod rect;
pub mod session;

pub use config::{ConfigError, EngineConfig};
pub use direction::{Direction, Orientation, SplitPosition};
pub use ids::{IdAllocator, NodeId, PaneId};
pub use rect::{Point, Rect};
pub use session::{SessionError, SessionFile};
