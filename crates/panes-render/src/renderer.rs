// ABOUTME: Applies calculated pane rectangles to pooled content elements.
// ABOUTME: Newly shown elements repaint synchronously, resized ones are deferred.

use std::collections::HashMap;

use panes_core::{PaneId, Rect};

use crate::ContentPool;

/// What one render pass did, per pane
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderReport {
    /// Hidden -> visible, repainted synchronously
    pub shown: Vec<PaneId>,
    /// Already visible with a new rectangle, repaint deferred
    pub resized: Vec<PaneId>,
    pub hidden: Vec<PaneId>,
}

#[derive(Debug, Default)]
pub struct Renderer {
    passes: u64,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of render passes so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Show, place and raise every pooled element that has a rectangle in
    /// `geometry`, and hide every pooled element that doesn't.
    ///
    /// Elements are only ever moved, resized, shown, hidden or raised.
    pub fn render(&mut self, pool: &mut ContentPool, geometry: &HashMap<PaneId, Rect>) -> RenderReport {
        self.passes += 1;
        let mut report = RenderReport::default();

        for pane_id in pool.pane_ids() {
            let Some(content) = pool.entry_mut(pane_id) else {
                continue;
            };
            match geometry.get(&pane_id) {
                None => {
                    if content.visible {
                        content.surface_mut().set_visible(false);
                        content.visible = false;
                        report.hidden.push(pane_id);
                    }
                }
                Some(rect) if !content.visible => {
                    let surface = content.surface_mut();
                    surface.set_geometry(*rect);
                    surface.set_visible(true);
                    surface.raise();
                    surface.refresh();
                    content.visible = true;
                    content.rect = Some(*rect);
                    report.shown.push(pane_id);
                }
                Some(rect) => {
                    let changed = content.rect != Some(*rect);
                    let surface = content.surface_mut();
                    if changed {
                        surface.set_geometry(*rect);
                    }
                    surface.raise();
                    if changed {
                        surface.schedule_refresh();
                        content.rect = Some(*rect);
                        report.resized.push(pane_id);
                    }
                }
            }
        }

        tracing::trace!(
            "Render pass {}: {} shown, {} resized, {} hidden",
            self.passes,
            report.shown.len(),
            report.resized.len(),
            report.hidden.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::tests::LogProvider;

    fn lines(provider: &LogProvider, prefix: &str) -> Vec<String> {
        provider
            .log
            .borrow()
            .iter()
            .filter(|line| line.starts_with(prefix))
            .cloned()
            .collect()
    }

    #[test]
    fn first_show_refreshes_synchronously() {
        let mut provider = LogProvider::default();
        let mut pool = ContentPool::new();
        pool.acquire(PaneId(1), "A", &mut provider);

        let mut renderer = Renderer::new();
        let geometry = HashMap::from([(PaneId(1), Rect::new(0, 0, 100, 50))]);
        let report = renderer.render(&mut pool, &geometry);

        assert_eq!(report.shown, vec![PaneId(1)]);
        assert_eq!(
            lines(&provider, "A "),
            vec![
                "A geometry 0,0 100x50",
                "A visible true",
                "A raise",
                "A refresh"
            ]
        );
        assert!(pool.get_widget(PaneId(1)).unwrap().is_visible());
    }

    #[test]
    fn resize_of_visible_element_is_deferred() {
        let mut provider = LogProvider::default();
        let mut pool = ContentPool::new();
        pool.acquire(PaneId(1), "A", &mut provider);
        let mut renderer = Renderer::new();
        renderer.render(&mut pool, &HashMap::from([(PaneId(1), Rect::new(0, 0, 100, 50))]));
        provider.log.borrow_mut().clear();

        let report = renderer.render(&mut pool, &HashMap::from([(PaneId(1), Rect::new(0, 0, 80, 50))]));
        assert_eq!(report.resized, vec![PaneId(1)]);
        let log = lines(&provider, "A ");
        assert!(log.contains(&"A schedule_refresh".to_string()));
        assert!(!log.contains(&"A refresh".to_string()));
    }

    #[test]
    fn unchanged_rect_only_raises() {
        let mut provider = LogProvider::default();
        let mut pool = ContentPool::new();
        pool.acquire(PaneId(1), "A", &mut provider);
        let mut renderer = Renderer::new();
        let geometry = HashMap::from([(PaneId(1), Rect::new(0, 0, 100, 50))]);
        renderer.render(&mut pool, &geometry);
        provider.log.borrow_mut().clear();

        let report = renderer.render(&mut pool, &geometry);
        assert_eq!(report, RenderReport::default());
        assert_eq!(lines(&provider, "A "), vec!["A raise"]);
    }

    #[test]
    fn panes_without_geometry_are_hidden_not_released() {
        let mut provider = LogProvider::default();
        let mut pool = ContentPool::new();
        pool.ensure_all([(PaneId(1), "A"), (PaneId(2), "B")], &mut provider);
        let mut renderer = Renderer::new();
        renderer.render(
            &mut pool,
            &HashMap::from([
                (PaneId(1), Rect::new(0, 0, 50, 50)),
                (PaneId(2), Rect::new(56, 0, 50, 50)),
            ]),
        );

        let report = renderer.render(&mut pool, &HashMap::from([(PaneId(1), Rect::new(0, 0, 106, 50))]));
        assert_eq!(report.hidden, vec![PaneId(2)]);
        assert!(pool.contains(PaneId(2)));
        assert!(!pool.get_widget(PaneId(2)).unwrap().is_visible());
        assert!(lines(&provider, "closing").is_empty());
    }
}
