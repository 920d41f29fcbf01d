// ABOUTME: Contract between the engine and whoever owns pane content.
// ABOUTME: Providers create elements lazily and are told before an element is torn down.

use panes_core::{PaneId, Rect};

/// An externally owned content element living in the layout's container.
///
/// The engine never reparents it; it only moves, resizes, shows, hides and
/// raises it, and asks it to repaint.
pub trait PaneSurface {
    fn set_geometry(&mut self, rect: Rect);
    fn set_visible(&mut self, visible: bool);
    /// Move to the top of the container's paint order
    fn raise(&mut self);
    /// Repaint now, before control returns to the event loop
    fn refresh(&mut self);
    /// Queue a repaint for the next frame
    fn schedule_refresh(&mut self);
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("No content available for widget {0:?}")]
    Unavailable(String),

    #[error("Provider failed: {0}")]
    Failed(String),
}

/// Supplies and reclaims content elements on demand.
pub trait ContentProvider {
    /// Create the element for `widget_id`. Called at most once per pane
    /// lifetime, the first time the pane is rendered.
    fn provide_widget(
        &mut self,
        widget_id: &str,
        pane_id: PaneId,
    ) -> Result<Box<dyn PaneSurface>, ProviderError>;

    /// Called right before the element for `pane_id` is released. Errors are
    /// logged and never stop the teardown.
    fn widget_closing(
        &mut self,
        widget_id: &str,
        pane_id: PaneId,
        surface: &mut dyn PaneSurface,
    ) -> Result<(), ProviderError>;
}
