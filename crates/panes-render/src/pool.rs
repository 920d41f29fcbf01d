// ABOUTME: Fixed container of content elements keyed by pane.
// ABOUTME: Requests each element once, caches it, and notifies the provider before release.

use std::collections::{HashMap, HashSet};
use std::fmt;

use panes_core::{PaneId, Rect};

use crate::{ContentProvider, PaneSurface, PlaceholderSurface};

/// Pool-assigned identity of one element, stable while the element lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHandle(pub u64);

/// One cached element plus the state the renderer last applied to it
pub struct PaneContent {
    handle: ContentHandle,
    widget_id: String,
    surface: Box<dyn PaneSurface>,
    placeholder: bool,
    pub(crate) visible: bool,
    pub(crate) rect: Option<Rect>,
}

impl PaneContent {
    pub fn handle(&self) -> ContentHandle {
        self.handle
    }

    pub fn widget_id(&self) -> &str {
        &self.widget_id
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Last rectangle applied by the renderer
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    pub fn surface(&self) -> &dyn PaneSurface {
        self.surface.as_ref()
    }

    pub(crate) fn surface_mut(&mut self) -> &mut dyn PaneSurface {
        self.surface.as_mut()
    }
}

impl fmt::Debug for PaneContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaneContent")
            .field("handle", &self.handle)
            .field("widget_id", &self.widget_id)
            .field("placeholder", &self.placeholder)
            .field("visible", &self.visible)
            .field("rect", &self.rect)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct ContentPool {
    entries: HashMap<PaneId, PaneContent>,
    next_handle: u64,
}

impl ContentPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, pane_id: PaneId) -> bool {
        self.entries.contains_key(&pane_id)
    }

    /// Element for `pane_id`, requesting it from `provider` on first use.
    ///
    /// Empty widget ids and provider failures both yield a placeholder; the
    /// pool itself never fails.
    pub fn acquire<P>(&mut self, pane_id: PaneId, widget_id: &str, provider: &mut P) -> &PaneContent
    where
        P: ContentProvider + ?Sized,
    {
        if !self.entries.contains_key(&pane_id) {
            let (surface, placeholder) = request(pane_id, widget_id, provider);
            self.next_handle += 1;
            let content = PaneContent {
                handle: ContentHandle(self.next_handle),
                widget_id: widget_id.to_string(),
                surface,
                placeholder,
                visible: false,
                rect: None,
            };
            tracing::debug!("Acquired content {:?} for {}", content.handle, pane_id);
            self.entries.insert(pane_id, content);
        }
        &self.entries[&pane_id]
    }

    /// Acquire every listed pane not yet cached; returns the newly acquired ones.
    pub fn ensure_all<'a, P, I>(&mut self, panes: I, provider: &mut P) -> Vec<PaneId>
    where
        P: ContentProvider + ?Sized,
        I: IntoIterator<Item = (PaneId, &'a str)>,
    {
        let mut acquired = Vec::new();
        for (pane_id, widget_id) in panes {
            if !self.contains(pane_id) {
                self.acquire(pane_id, widget_id, provider);
                acquired.push(pane_id);
            }
        }
        acquired
    }

    /// Notify the provider, then drop the element. Returns false for unknown panes.
    pub fn release<P>(&mut self, pane_id: PaneId, provider: &mut P) -> bool
    where
        P: ContentProvider + ?Sized,
    {
        let Some(mut content) = self.entries.remove(&pane_id) else {
            return false;
        };
        if !content.placeholder {
            let PaneContent { widget_id, surface, .. } = &mut content;
            if let Err(e) = provider.widget_closing(widget_id.as_str(), pane_id, &mut **surface) {
                tracing::warn!("widget_closing failed for {}: {}", pane_id, e);
            }
        }
        content.surface_mut().set_visible(false);
        tracing::debug!("Released content {:?} for {}", content.handle, pane_id);
        true
    }

    /// Release every cached pane not in `live`; returns the released ones.
    pub fn release_missing<P>(&mut self, live: &HashSet<PaneId>, provider: &mut P) -> Vec<PaneId>
    where
        P: ContentProvider + ?Sized,
    {
        let mut gone: Vec<PaneId> = self
            .entries
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        gone.sort();
        for pane_id in &gone {
            self.release(*pane_id, provider);
        }
        gone
    }

    pub fn release_all<P>(&mut self, provider: &mut P)
    where
        P: ContentProvider + ?Sized,
    {
        self.release_missing(&HashSet::new(), provider);
    }

    pub fn get_widget(&self, pane_id: PaneId) -> Option<&PaneContent> {
        self.entries.get(&pane_id)
    }

    /// All cached elements, ordered by pane id
    pub fn get_all_widgets(&self) -> Vec<(PaneId, &PaneContent)> {
        let mut all: Vec<_> = self.entries.iter().map(|(id, c)| (*id, c)).collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }

    pub fn find_pane_by_widget(&self, handle: ContentHandle) -> Option<PaneId> {
        self.entries
            .iter()
            .find(|(_, content)| content.handle == handle)
            .map(|(id, _)| *id)
    }

    pub(crate) fn entry_mut(&mut self, pane_id: PaneId) -> Option<&mut PaneContent> {
        self.entries.get_mut(&pane_id)
    }

    pub(crate) fn pane_ids(&self) -> Vec<PaneId> {
        let mut ids: Vec<PaneId> = self.entries.keys().copied().collect();
        ids.sort();
        ids
    }
}

fn request<P>(pane_id: PaneId, widget_id: &str, provider: &mut P) -> (Box<dyn PaneSurface>, bool)
where
    P: ContentProvider + ?Sized,
{
    if widget_id.is_empty() {
        return (Box::new(PlaceholderSurface::new(pane_id, widget_id)), true);
    }
    match provider.provide_widget(widget_id, pane_id) {
        Ok(surface) => (surface, false),
        Err(e) => {
            tracing::warn!("No content for {} ({}), using placeholder: {}", pane_id, widget_id, e);
            (Box::new(PlaceholderSurface::new(pane_id, widget_id)), true)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ProviderError;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shared log of everything surfaces and the provider were asked to do
    pub(crate) type Log = Rc<RefCell<Vec<String>>>;

    pub(crate) struct LogSurface {
        pub(crate) name: String,
        pub(crate) log: Log,
    }

    impl PaneSurface for LogSurface {
        fn set_geometry(&mut self, rect: Rect) {
            self.log.borrow_mut().push(format!(
                "{} geometry {},{} {}x{}",
                self.name, rect.x, rect.y, rect.width, rect.height
            ));
        }
        fn set_visible(&mut self, visible: bool) {
            self.log.borrow_mut().push(format!("{} visible {}", self.name, visible));
        }
        fn raise(&mut self) {
            self.log.borrow_mut().push(format!("{} raise", self.name));
        }
        fn refresh(&mut self) {
            self.log.borrow_mut().push(format!("{} refresh", self.name));
        }
        fn schedule_refresh(&mut self) {
            self.log.borrow_mut().push(format!("{} schedule_refresh", self.name));
        }
    }

    #[derive(Default)]
    pub(crate) struct LogProvider {
        pub(crate) log: Log,
        pub(crate) fail_closing: bool,
    }

    impl ContentProvider for LogProvider {
        fn provide_widget(
            &mut self,
            widget_id: &str,
            pane_id: PaneId,
        ) -> Result<Box<dyn PaneSurface>, ProviderError> {
            self.log.borrow_mut().push(format!("provide {} {}", widget_id, pane_id.0));
            if widget_id.starts_with("missing") {
                return Err(ProviderError::Unavailable(widget_id.to_string()));
            }
            Ok(Box::new(LogSurface {
                name: widget_id.to_string(),
                log: Rc::clone(&self.log),
            }))
        }

        fn widget_closing(
            &mut self,
            widget_id: &str,
            pane_id: PaneId,
            _surface: &mut dyn PaneSurface,
        ) -> Result<(), ProviderError> {
            self.log.borrow_mut().push(format!("closing {} {}", widget_id, pane_id.0));
            if self.fail_closing {
                return Err(ProviderError::Failed("boom".to_string()));
            }
            Ok(())
        }
    }

    fn count(log: &Log, needle: &str) -> usize {
        log.borrow().iter().filter(|line| line.as_str() == needle).count()
    }

    #[test]
    fn acquires_each_pane_exactly_once() {
        let mut provider = LogProvider::default();
        let mut pool = ContentPool::new();
        let first = pool.acquire(PaneId(1), "A", &mut provider).handle();
        let second = pool.acquire(PaneId(1), "A", &mut provider).handle();
        assert_eq!(first, second);
        assert_eq!(count(&provider.log, "provide A 1"), 1);
        assert_eq!(pool.find_pane_by_widget(first), Some(PaneId(1)));
    }

    #[test]
    fn provider_failure_yields_placeholder() {
        let mut provider = LogProvider::default();
        let mut pool = ContentPool::new();
        let content = pool.acquire(PaneId(1), "missing-thing", &mut provider);
        assert!(content.is_placeholder());
        assert_eq!(content.widget_id(), "missing-thing");
    }

    #[test]
    fn empty_widget_id_skips_provider() {
        let mut provider = LogProvider::default();
        let mut pool = ContentPool::new();
        assert!(pool.acquire(PaneId(1), "", &mut provider).is_placeholder());
        assert!(provider.log.borrow().is_empty());
    }

    #[test]
    fn release_notifies_provider_before_teardown() {
        let mut provider = LogProvider::default();
        let mut pool = ContentPool::new();
        pool.acquire(PaneId(1), "A", &mut provider);
        assert!(pool.release(PaneId(1), &mut provider));
        let log = provider.log.borrow();
        let closing = log.iter().position(|l| l == "closing A 1").unwrap();
        let hidden = log.iter().position(|l| l == "A visible false").unwrap();
        assert!(closing < hidden);
        assert!(pool.get_widget(PaneId(1)).is_none());
    }

    #[test]
    fn failing_close_hook_does_not_abort_release() {
        let mut provider = LogProvider {
            fail_closing: true,
            ..LogProvider::default()
        };
        let mut pool = ContentPool::new();
        pool.ensure_all([(PaneId(1), "A"), (PaneId(2), "B")], &mut provider);
        let released = pool.release_missing(&HashSet::from([PaneId(2)]), &mut provider);
        assert_eq!(released, vec![PaneId(1)]);
        assert!(!pool.contains(PaneId(1)));
        assert!(pool.contains(PaneId(2)));
    }

    #[test]
    fn get_all_widgets_is_ordered() {
        let mut provider = LogProvider::default();
        let mut pool = ContentPool::new();
        pool.ensure_all([(PaneId(3), "C"), (PaneId(1), "A")], &mut provider);
        let ids: Vec<PaneId> = pool.get_all_widgets().iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![PaneId(1), PaneId(3)]);
    }
}
