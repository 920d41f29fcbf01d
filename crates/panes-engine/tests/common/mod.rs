// ABOUTME: Test doubles shared by the engine integration tests.
// ABOUTME: A provider that records every call and a pointer driven by the test.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use panes_engine::{
    ContentProvider, EngineConfig, PaneEngine, PaneId, PaneNode, PaneSurface, Point,
    PointerSource, ProviderError, Rect,
};

pub type Log = Rc<RefCell<Vec<String>>>;

pub struct RecordingSurface {
    widget_id: String,
    log: Log,
}

impl RecordingSurface {
    fn record(&self, what: String) {
        self.log.borrow_mut().push(format!("{} {}", self.widget_id, what));
    }
}

impl PaneSurface for RecordingSurface {
    fn set_geometry(&mut self, rect: Rect) {
        self.record(format!(
            "geometry {},{} {}x{}",
            rect.x, rect.y, rect.width, rect.height
        ));
    }

    fn set_visible(&mut self, visible: bool) {
        self.record(if visible { "show" } else { "hide" }.to_string());
    }

    fn raise(&mut self) {
        self.record("raise".to_string());
    }

    fn refresh(&mut self) {
        self.record("refresh".to_string());
    }

    fn schedule_refresh(&mut self) {
        self.record("schedule_refresh".to_string());
    }
}

/// Provider that hands out recording surfaces and logs its own calls.
#[derive(Default)]
pub struct RecordingProvider {
    pub log: Log,
    /// Widget ids the provider refuses to create
    pub unavailable: HashSet<String>,
    pub fail_closing: bool,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.log.borrow().iter().filter(|line| *line == entry).count()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.log.borrow().iter().position(|line| line == entry)
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl ContentProvider for RecordingProvider {
    fn provide_widget(
        &mut self,
        widget_id: &str,
        _pane_id: PaneId,
    ) -> Result<Box<dyn PaneSurface>, ProviderError> {
        self.log.borrow_mut().push(format!("provide {}", widget_id));
        if self.unavailable.contains(widget_id) {
            return Err(ProviderError::Unavailable(widget_id.to_string()));
        }
        Ok(Box::new(RecordingSurface {
            widget_id: widget_id.to_string(),
            log: Rc::clone(&self.log),
        }))
    }

    fn widget_closing(
        &mut self,
        widget_id: &str,
        _pane_id: PaneId,
        _surface: &mut dyn PaneSurface,
    ) -> Result<(), ProviderError> {
        self.log.borrow_mut().push(format!("closing {}", widget_id));
        if self.fail_closing {
            return Err(ProviderError::Failed(format!("cannot close {}", widget_id)));
        }
        Ok(())
    }
}

/// Pointer whose state the test sets between drag ticks
#[derive(Debug, Clone, Copy)]
pub struct ScriptedPointer {
    pub position: Point,
    pub down: bool,
}

impl ScriptedPointer {
    pub fn pressed(x: i32, y: i32) -> Self {
        Self {
            position: Point::new(x, y),
            down: true,
        }
    }

    pub fn released(x: i32, y: i32) -> Self {
        Self {
            position: Point::new(x, y),
            down: false,
        }
    }
}

impl PointerSource for ScriptedPointer {
    fn pointer_position(&self) -> Point {
        self.position
    }

    fn primary_button_down(&self) -> bool {
        self.down
    }
}

pub fn engine() -> PaneEngine<RecordingProvider> {
    PaneEngine::new(RecordingProvider::new(), EngineConfig::default())
}

/// Engine with a 1200x800 viewport, ready to take a layout
pub fn engine_with_viewport() -> PaneEngine<RecordingProvider> {
    let mut engine = engine();
    engine.set_viewport(Rect::new(0, 0, 1200, 800));
    engine.drain_events();
    engine
}

pub fn widget_of(engine: &PaneEngine<RecordingProvider>, pane_id: PaneId) -> String {
    engine
        .tree()
        .find_leaf(pane_id)
        .map(|leaf| leaf.widget_id.clone())
        .unwrap_or_default()
}

/// Tree shape as text, e.g. `Horizontal[A 0.500, B 0.500]`
pub fn shape(node: &PaneNode) -> String {
    match node {
        PaneNode::Leaf(leaf) => leaf.widget_id.clone(),
        PaneNode::Split(split) => {
            let children: Vec<String> = split
                .children()
                .iter()
                .zip(split.ratios())
                .map(|(child, ratio)| format!("{} {:.3}", shape(child), ratio))
                .collect();
            format!("{:?}[{}]", split.orientation(), children.join(", "))
        }
    }
}
