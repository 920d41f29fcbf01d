// ABOUTME: PaneEngine, the single entry point hosts use to drive a pane layout.
// ABOUTME: Every mutation flows through the command controller, then relayout and render.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use panes_core::{Direction, EngineConfig, NodeId, PaneId, Point, Rect, SessionFile, SplitPosition};
use panes_layout::{
    codec, Command, CommandController, DividerHit, DragPoller, DragResizeController, FocusChange,
    FocusTracker, GeometryCalculator, LayoutGeometry, LayoutTree, PointerSource,
    StructureDelta,
};
use panes_render::{ContentHandle, ContentPool, ContentProvider, PaneContent, RenderReport, Renderer};

use crate::{EngineError, LayoutEvent};

pub struct PaneEngine<P: ContentProvider> {
    config: EngineConfig,
    provider: P,
    controller: CommandController,
    calculator: GeometryCalculator,
    focus: FocusTracker,
    pool: ContentPool,
    renderer: Renderer,
    drag: DragResizeController,
    poller: DragPoller,
    viewport: Rect,
    /// What is currently on screen: committed layout, drag preview or zoom
    geometry: LayoutGeometry,
    zoomed: Option<PaneId>,
    events: Vec<LayoutEvent>,
}

impl<P: ContentProvider> PaneEngine<P> {
    pub fn new(provider: P, config: EngineConfig) -> Self {
        Self {
            controller: CommandController::new(config.history_limit).with_max_panes(config.max_panes),
            calculator: GeometryCalculator::new(config.handle_width),
            drag: DragResizeController::new(config.min_pane_size),
            poller: DragPoller::new(config.drag_poll_interval()),
            focus: FocusTracker::new(),
            pool: ContentPool::new(),
            renderer: Renderer::new(),
            viewport: Rect::default(),
            geometry: LayoutGeometry::default(),
            zoomed: None,
            events: Vec::new(),
            provider,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn tree(&self) -> &LayoutTree {
        self.controller.tree()
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Geometry currently applied to content, including drag previews and zoom
    pub fn geometry(&self) -> &LayoutGeometry {
        &self.geometry
    }

    /// Take all notifications queued since the last call
    pub fn drain_events(&mut self) -> Vec<LayoutEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Structure --------------------------------------------------------

    /// Start over with a single pane showing `widget_id`. Existing content is
    /// released and history cleared.
    pub fn initialize_empty(&mut self, widget_id: &str) -> PaneId {
        self.end_interaction();
        let (pane_id, delta) = self.controller.initialize(widget_id);
        tracing::info!("Initialized layout with {} ({:?})", pane_id, widget_id);
        self.structure_changed(delta, Some(pane_id));
        pane_id
    }

    /// Split `pane_id`, placing a new pane for `widget_id` at `position`
    /// with `ratio` of the space. The new pane takes focus.
    pub fn split_pane(&mut self, pane_id: PaneId, widget_id: &str, position: SplitPosition, ratio: f64) -> bool {
        let command = Command::Split {
            pane_id,
            widget_id: widget_id.to_string(),
            position,
            ratio,
        };
        match self.execute(command) {
            Some(delta) => {
                let added = delta.added.first().copied();
                if let Some(new_pane) = added {
                    tracing::info!("Split {} {:?}, new pane {}", pane_id, position, new_pane);
                }
                self.structure_changed(delta, added);
                true
            }
            None => false,
        }
    }

    /// Split the focused pane using the configured default ratio.
    /// Returns the new pane.
    pub fn split_focused(&mut self, widget_id: &str, position: SplitPosition) -> Option<PaneId> {
        let target = self.focus.focused()?;
        if !self.split_pane(target, widget_id, position, self.config.default_split_ratio) {
            return None;
        }
        self.focus.focused()
    }

    /// Remove a pane; false for unknown panes and for the last pane.
    pub fn remove_pane(&mut self, pane_id: PaneId) -> bool {
        match self.execute(Command::Remove { pane_id }) {
            Some(delta) => {
                tracing::info!("Removed {}", pane_id);
                self.structure_changed(delta, None);
                true
            }
            None => false,
        }
    }

    /// Replace a split's ratios. They must match its child count and sum to 1.
    pub fn set_ratios(&mut self, node_id: NodeId, ratios: Vec<f64>) -> bool {
        self.end_interaction();
        match self.execute(Command::SetRatios { node_id, ratios }) {
            Some(delta) => {
                self.structure_changed(delta, None);
                true
            }
            None => false,
        }
    }

    pub fn undo(&mut self) -> bool {
        self.end_interaction();
        match self.controller.undo() {
            Some(delta) => {
                self.structure_changed(delta, None);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.end_interaction();
        match self.controller.redo() {
            Some(delta) => {
                self.structure_changed(delta, None);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.controller.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.controller.can_redo()
    }

    /// Descriptions of undoable commands, most recent last
    pub fn history(&self) -> Vec<String> {
        self.controller.undo_descriptions()
    }

    fn execute(&mut self, command: Command) -> Option<StructureDelta> {
        let description = command.description();
        match self.controller.execute(command) {
            Ok(delta) => Some(delta),
            Err(e) => {
                tracing::debug!("Rejected {}: {}", description, e);
                None
            }
        }
    }

    fn structure_changed(&mut self, delta: StructureDelta, focus_target: Option<PaneId>) {
        if delta.changes_panes() {
            if let Some(zoomed) = self.zoomed.take() {
                tracing::debug!("Leaving zoom on {} after structure change", zoomed);
            }
            self.drag.cancel();
        }

        let order = self.controller.tree().pane_ids();
        let live: HashSet<PaneId> = order.iter().copied().collect();
        self.pool.release_missing(&live, &mut self.provider);

        self.events
            .extend(delta.removed.iter().map(|id| LayoutEvent::PaneRemoved(*id)));
        self.events
            .extend(delta.added.iter().map(|id| LayoutEvent::PaneAdded(*id)));
        if delta.changes_panes() {
            self.events.push(LayoutEvent::StructureChanged);
        }

        let change = match focus_target {
            Some(pane_id) => self.focus.set(Some(pane_id)),
            None => self.focus.reconcile(&delta.previous_order, &order),
        };
        self.focus_moved(change);
        self.relayout();
    }

    // -- Focus ------------------------------------------------------------

    pub fn get_focused_pane(&self) -> Option<PaneId> {
        self.focus.focused()
    }

    pub fn set_focus(&mut self, pane_id: PaneId) -> bool {
        if !self.controller.tree().contains_pane(pane_id) {
            return false;
        }
        let change = self.focus.set(Some(pane_id));
        self.focus_moved(change);
        true
    }

    /// Focus the next pane in traversal order, wrapping around.
    pub fn focus_next(&mut self) -> bool {
        let order = self.controller.tree().pane_ids();
        let change = self.focus.focus_next(&order);
        self.focus_moved(change)
    }

    pub fn focus_previous(&mut self) -> bool {
        let order = self.controller.tree().pane_ids();
        let change = self.focus.focus_previous(&order);
        self.focus_moved(change)
    }

    /// Move focus to the spatially adjacent pane in `direction`.
    /// False when there is no pane that way.
    pub fn navigate_focus(&mut self, direction: Direction) -> bool {
        let tree = self.controller.tree();
        let rects = self.calculator.calculate_layout(tree, self.viewport);
        let order = tree.pane_ids();
        let change = self.focus.navigate(direction, &rects, &order);
        self.focus_moved(change)
    }

    /// Pane under `point` in the current geometry
    pub fn pane_at(&self, point: Point) -> Option<PaneId> {
        self.geometry.pane_at(point)
    }

    /// Click-to-focus
    pub fn focus_pane_at(&mut self, point: Point) -> bool {
        match self.pane_at(point) {
            Some(pane_id) => self.set_focus(pane_id),
            None => false,
        }
    }

    fn focus_moved(&mut self, change: Option<FocusChange>) -> bool {
        let Some(change) = change else {
            return false;
        };
        self.events.push(LayoutEvent::FocusChanged {
            old: change.old,
            new: change.new,
        });
        if self.zoomed.is_some() && change.new.is_some() {
            self.zoomed = change.new;
            self.relayout();
        }
        true
    }

    // -- Geometry and rendering -------------------------------------------

    pub fn set_viewport(&mut self, viewport: Rect) {
        if viewport == self.viewport {
            return;
        }
        tracing::debug!("Viewport {}x{} at ({}, {})", viewport.width, viewport.height, viewport.x, viewport.y);
        self.viewport = viewport;
        self.drag.cancel();
        self.relayout();
    }

    /// Re-apply the current geometry to content.
    pub fn render(&mut self) -> RenderReport {
        self.paint()
    }

    /// Divider under `point`, with the configured grab tolerance
    pub fn divider_at(&self, point: Point) -> Option<DividerHit> {
        self.geometry.divider_at(point, self.config.divider_hit_slop)
    }

    /// Render only the focused pane across the whole viewport, or go back to
    /// the full layout. Other panes are hidden, never released.
    pub fn toggle_zoom(&mut self) -> bool {
        if let Some(pane_id) = self.zoomed.take() {
            tracing::debug!("Unzoomed {}", pane_id);
            self.relayout();
            return true;
        }
        let Some(focused) = self.focus.focused() else {
            return false;
        };
        if self.controller.tree().leaf_count() < 2 {
            return false;
        }
        self.drag.cancel();
        tracing::debug!("Zoomed {}", focused);
        self.zoomed = Some(focused);
        self.relayout();
        true
    }

    pub fn zoomed_pane(&self) -> Option<PaneId> {
        self.zoomed
    }

    fn relayout(&mut self) {
        self.geometry = match self.zoomed {
            Some(pane_id) => zoomed_geometry(pane_id, self.viewport),
            None => self.calculator.calculate(self.controller.tree(), self.viewport),
        };
        self.paint();
        self.events.push(LayoutEvent::LayoutChanged);
    }

    /// Acquire content for every pane in the current geometry, then apply it.
    /// Nothing is requested before the host has given a viewport.
    fn paint(&mut self) -> RenderReport {
        if self.viewport.is_empty() {
            return RenderReport::default();
        }
        let shown: Vec<(PaneId, &str)> = self
            .controller
            .tree()
            .leaves()
            .into_iter()
            .filter(|leaf| self.geometry.panes.contains_key(&leaf.pane_id))
            .map(|leaf| (leaf.pane_id, leaf.widget_id.as_str()))
            .collect();
        self.pool.ensure_all(shown, &mut self.provider);
        self.renderer.render(&mut self.pool, &self.geometry.panes)
    }

    // -- Drag resizing ----------------------------------------------------

    /// Press at `point`: start dragging the divider there, if any.
    pub fn begin_drag(&mut self, point: Point) -> bool {
        if self.zoomed.is_some() {
            return false;
        }
        let Some(hit) = self.divider_at(point) else {
            return false;
        };
        let started = self.drag.begin(
            self.controller.tree(),
            &self.geometry,
            &self.calculator,
            hit,
            point,
        );
        match started {
            Ok(()) => {
                self.poller.reset();
                true
            }
            Err(e) => {
                tracing::debug!("Drag not started: {}", e);
                false
            }
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Poll the pointer while dragging. Samples at most once per poll
    /// interval; a sample with the button up commits the drag. Returns
    /// whether a sample was taken.
    pub fn drag_tick<S>(&mut self, now: Instant, pointer: &S) -> bool
    where
        S: PointerSource + ?Sized,
    {
        if !self.drag.is_dragging() || !self.poller.due(now) {
            return false;
        }
        let position = pointer.pointer_position();
        if !pointer.primary_button_down() {
            self.end_drag(position);
            return true;
        }
        if let Some(preview) = self.drag.update(position) {
            self.geometry =
                self.calculator
                    .calculate_with_override(self.controller.tree(), self.viewport, Some(&preview));
            self.paint();
            self.events.push(LayoutEvent::LayoutChanged);
        }
        true
    }

    /// Release at `point`: commit the drag as one undoable ratio change.
    /// Returns whether anything was committed.
    pub fn end_drag(&mut self, point: Point) -> bool {
        let was_dragging = self.drag.is_dragging();
        let committed = match self.drag.finish(point) {
            Some(command) => match self.execute(command) {
                Some(delta) => {
                    self.structure_changed(delta, None);
                    true
                }
                None => false,
            },
            None => false,
        };
        if was_dragging && !committed {
            self.relayout();
        }
        committed
    }

    /// Abort a drag; the committed layout is shown again.
    pub fn cancel_drag(&mut self) -> bool {
        if !self.drag.cancel() {
            return false;
        }
        self.relayout();
        true
    }

    /// Drop any drag in progress and put the committed layout back on screen.
    fn end_interaction(&mut self) {
        if self.drag.cancel() {
            self.relayout();
        }
    }

    // -- Content ----------------------------------------------------------

    pub fn get_widget(&self, pane_id: PaneId) -> Option<&PaneContent> {
        self.pool.get_widget(pane_id)
    }

    pub fn get_all_widgets(&self) -> Vec<(PaneId, &PaneContent)> {
        self.pool.get_all_widgets()
    }

    pub fn find_pane_by_widget(&self, handle: ContentHandle) -> Option<PaneId> {
        self.pool.find_pane_by_widget(handle)
    }

    /// Release every content element, notifying the provider for each.
    pub fn shutdown(&mut self) {
        self.drag.cancel();
        self.pool.release_all(&mut self.provider);
    }

    // -- Sessions ---------------------------------------------------------

    pub fn save_session(&self) -> String {
        match codec::encode(self.controller.tree(), self.focus.focused()) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Failed to encode session: {}", e);
                String::new()
            }
        }
    }

    /// Replace the layout with a saved one. On failure the current layout is
    /// left untouched.
    pub fn load_session(&mut self, text: &str) -> bool {
        match self.restore(text) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Session not restored: {}", e);
                false
            }
        }
    }

    pub fn save_session_file(&self, path: &Path) -> Result<(), EngineError> {
        let text = codec::encode(self.controller.tree(), self.focus.focused())?;
        SessionFile::new(text).save(path)?;
        tracing::info!("Saved session to {}", path.display());
        Ok(())
    }

    pub fn load_session_file(&mut self, path: &Path) -> Result<(), EngineError> {
        let file = SessionFile::load(path)?;
        self.restore(&file.layout)?;
        tracing::info!("Restored session from {}", path.display());
        Ok(())
    }

    fn restore(&mut self, text: &str) -> Result<(), EngineError> {
        let restored = codec::decode(text, self.controller.ids_mut())?;
        if restored.tree.is_empty() {
            return Err(EngineError::EmptySession);
        }
        restored.tree.validate()?;
        for pane_id in &restored.substituted {
            tracing::warn!("Restored {} as a placeholder", pane_id);
        }

        self.end_interaction();
        self.zoomed = None;
        self.pool.release_all(&mut self.provider);

        let focus = restored
            .focused
            .or_else(|| restored.tree.pane_ids().first().copied());
        let delta = self.controller.replace_tree(restored.tree);
        tracing::info!(
            "Restored layout with {} panes",
            self.controller.tree().leaf_count()
        );
        self.structure_changed(delta, focus);
        Ok(())
    }
}

fn zoomed_geometry(pane_id: PaneId, viewport: Rect) -> LayoutGeometry {
    let mut geometry = LayoutGeometry::default();
    geometry.panes.insert(pane_id, viewport);
    geometry
}

