// ABOUTME: Content management and rendering for the panes engine.
// ABOUTME: Caches provider elements per pane and applies geometry without reparenting.

mod placeholder;
mod pool;
mod provider;
mod renderer;

pub use placeholder::PlaceholderSurface;
pub use pool::{ContentHandle, ContentPool, PaneContent};
pub use provider::{ContentProvider, PaneSurface, ProviderError};
pub use renderer::{RenderReport, Renderer};
