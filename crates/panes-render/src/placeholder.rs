// ABOUTME: Local fallback element for panes the provider could not fill.
// ABOUTME: Tracks geometry and visibility so it behaves like any other element.

use panes_core::{PaneId, Rect};

use crate::PaneSurface;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaceholderSurface {
    pub pane_id: Option<PaneId>,
    /// What the provider was asked for, shown as the placeholder's label
    pub label: String,
    pub rect: Rect,
    pub visible: bool,
    pub repaints: u32,
}

impl PlaceholderSurface {
    pub fn new(pane_id: PaneId, widget_id: &str) -> Self {
        let label = if widget_id.is_empty() {
            "(unavailable)".to_string()
        } else {
            format!("{} (unavailable)", widget_id)
        };
        Self {
            pane_id: Some(pane_id),
            label,
            ..Self::default()
        }
    }
}

impl PaneSurface for PlaceholderSurface {
    fn set_geometry(&mut self, rect: Rect) {
        self.rect = rect;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn raise(&mut self) {}

    fn refresh(&mut self) {
        self.repaints += 1;
    }

    fn schedule_refresh(&mut self) {
        self.repaints += 1;
    }
}
