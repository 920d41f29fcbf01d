// ABOUTME: Text rendering of a pane layout for terminals and logs.
// ABOUTME: Provides stand-in content elements and an ASCII picture of the geometry.

use std::collections::HashMap;

use panes_engine::{
    ContentProvider, LayoutGeometry, PaneEngine, PaneId, PaneSurface, Point, ProviderError, Rect,
};

/// Element that only remembers what it was told
#[derive(Debug)]
pub struct TextSurface {
    widget_id: String,
    rect: Rect,
    visible: bool,
}

impl PaneSurface for TextSurface {
    fn set_geometry(&mut self, rect: Rect) {
        self.rect = rect;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn raise(&mut self) {}

    fn refresh(&mut self) {
        tracing::trace!(
            "{} repainted at {}x{}{}",
            self.widget_id,
            self.rect.width,
            self.rect.height,
            if self.visible { "" } else { " (hidden)" }
        );
    }

    fn schedule_refresh(&mut self) {
        self.refresh();
    }
}

/// Provider that can show any widget id as text
#[derive(Debug, Default)]
pub struct TextProvider;

impl ContentProvider for TextProvider {
    fn provide_widget(
        &mut self,
        widget_id: &str,
        pane_id: PaneId,
    ) -> Result<Box<dyn PaneSurface>, ProviderError> {
        tracing::debug!("Providing {} for {}", widget_id, pane_id);
        Ok(Box::new(TextSurface {
            widget_id: widget_id.to_string(),
            rect: Rect::default(),
            visible: false,
        }))
    }

    fn widget_closing(
        &mut self,
        widget_id: &str,
        pane_id: PaneId,
        _surface: &mut dyn PaneSurface,
    ) -> Result<(), ProviderError> {
        tracing::debug!("Closing {} for {}", widget_id, pane_id);
        Ok(())
    }
}

/// One-letter labels in tab order: A-Z, then a-z, then '?'
pub fn labels(order: &[PaneId]) -> HashMap<PaneId, char> {
    let alphabet: Vec<char> = ('A'..='Z').chain('a'..='z').collect();
    order
        .iter()
        .enumerate()
        .map(|(index, id)| (*id, alphabet.get(index).copied().unwrap_or('?')))
        .collect()
}

/// One line per pane: label, id, widget, rectangle, and markers for focus
/// and placeholders.
pub fn describe<P: ContentProvider>(engine: &PaneEngine<P>) -> String {
    let order = engine.tree().pane_ids();
    let labels = labels(&order);
    let focused = engine.get_focused_pane();
    let mut out = String::new();
    for pane_id in order {
        let widget = engine
            .tree()
            .find_leaf(pane_id)
            .map(|leaf| leaf.widget_id.as_str())
            .unwrap_or_default();
        let rect = engine.geometry().pane_rect(pane_id).unwrap_or_default();
        let placeholder = engine
            .get_widget(pane_id)
            .is_some_and(|content| content.is_placeholder());
        out.push_str(&format!(
            "{} {} {:<8} {:<20} {:>5},{:<5} {:>5}x{:<5}{}{}\n",
            if focused == Some(pane_id) { '*' } else { ' ' },
            labels.get(&pane_id).copied().unwrap_or('?'),
            pane_id.to_string(),
            if widget.is_empty() { "-" } else { widget },
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            if placeholder { " placeholder" } else { "" },
            if engine.zoomed_pane() == Some(pane_id) { " zoomed" } else { "" },
        ));
    }
    out
}

/// Sample the geometry at the centre of each character cell. Panes show
/// their label, dividers '|' or '-', anything else '.'.
pub fn ascii(
    geometry: &LayoutGeometry,
    labels: &HashMap<PaneId, char>,
    viewport: Rect,
    cols: usize,
    rows: usize,
) -> String {
    let mut out = String::with_capacity((cols + 1) * rows);
    for row in 0..rows {
        for col in 0..cols {
            let point = Point::new(
                cell_centre(viewport.x, viewport.width, col, cols),
                cell_centre(viewport.y, viewport.height, row, rows),
            );
            out.push(cell(geometry, labels, point));
        }
        out.push('\n');
    }
    out
}

fn cell_centre(origin: i32, span: i32, index: usize, count: usize) -> i32 {
    let offset = (2 * index as i64 + 1) * span.max(0) as i64 / (2 * count.max(1) as i64);
    origin + offset as i32
}

fn cell(geometry: &LayoutGeometry, labels: &HashMap<PaneId, char>, point: Point) -> char {
    if let Some(pane_id) = geometry.pane_at(point) {
        return labels.get(&pane_id).copied().unwrap_or('?');
    }
    geometry
        .dividers
        .values()
        .flatten()
        .find(|rect| rect.contains(point))
        .map(|rect| if rect.height >= rect.width { '|' } else { '-' })
        .unwrap_or('.')
}
