// ABOUTME: Interactive divider drag: live preview ratios plus one final command.
// ABOUTME: Preview never touches the tree; release turns the drag into SetRatios.

use std::time::{Duration, Instant};

use panes_core::{NodeId, Orientation, Point};

use crate::geometry::{DividerHit, GeometryCalculator, LayoutGeometry, RatioOverride};
use crate::tree::LayoutTree;
use crate::{Command, LayoutError};

/// Global pointer state, sampled by polling rather than from move events.
pub trait PointerSource {
    fn pointer_position(&self) -> Point;
    fn primary_button_down(&self) -> bool;
}

/// An in-progress divider drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub node_id: NodeId,
    /// Divider `i` sits between children `i` and `i + 1`
    pub divider_index: usize,
    pub orientation: Orientation,
    pub origin: Point,
    pub start_ratios: Vec<f64>,
    /// Content span of the split (handles excluded) at drag start
    pub total_size: i32,
    pub delta_pixels: i32,
}

impl DragSession {
    fn delta_from(&self, pointer: Point) -> i32 {
        match self.orientation {
            Orientation::Horizontal => pointer.x - self.origin.x,
            Orientation::Vertical => pointer.y - self.origin.y,
        }
    }

    fn ratios_for(&self, delta: i32, min_size: i32) -> Vec<f64> {
        resize_ratios(
            &self.start_ratios,
            self.divider_index,
            delta,
            self.total_size,
            min_size,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Default)]
pub struct DragResizeController {
    state: DragState,
    min_pane_size: i32,
}

impl DragResizeController {
    pub fn new(min_pane_size: i32) -> Self {
        Self {
            state: DragState::Idle,
            min_pane_size: min_pane_size.max(0),
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Press on a divider: snapshot the split's ratios and span.
    pub fn begin(
        &mut self,
        tree: &LayoutTree,
        geometry: &LayoutGeometry,
        calculator: &GeometryCalculator,
        hit: DividerHit,
        pointer: Point,
    ) -> Result<(), LayoutError> {
        let split = tree
            .find_split(hit.node_id)
            .ok_or(LayoutError::UnknownNode(hit.node_id))?;
        if hit.index + 1 >= split.children().len() {
            return Err(LayoutError::Invariant(format!(
                "{} has no divider {}",
                hit.node_id, hit.index
            )));
        }
        let rect = geometry
            .splits
            .get(&hit.node_id)
            .ok_or(LayoutError::UnknownNode(hit.node_id))?;
        let span = rect.span(split.orientation());

        tracing::debug!("Drag started on {} divider {}", hit.node_id, hit.index);
        self.state = DragState::Dragging(DragSession {
            node_id: hit.node_id,
            divider_index: hit.index,
            orientation: split.orientation(),
            origin: pointer,
            start_ratios: split.ratios().to_vec(),
            total_size: calculator.content_span(span, split.children().len()),
            delta_pixels: 0,
        });
        Ok(())
    }

    /// One poll tick: preview ratios for the current pointer position.
    /// Returns `None` when idle.
    pub fn update(&mut self, pointer: Point) -> Option<RatioOverride> {
        let min_size = self.min_pane_size;
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        session.delta_pixels = session.delta_from(pointer);
        tracing::trace!("Drag delta {}px on {}", session.delta_pixels, session.node_id);
        Some(RatioOverride {
            node_id: session.node_id,
            ratios: session.ratios_for(session.delta_pixels, min_size),
        })
    }

    /// Release: turn the final delta into a single SetRatios command.
    /// `None` when idle or when the divider ended where it started.
    pub fn finish(&mut self, pointer: Point) -> Option<Command> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        let delta = session.delta_from(pointer);
        let ratios = session.ratios_for(delta, self.min_pane_size);
        let unchanged = ratios
            .iter()
            .zip(&session.start_ratios)
            .all(|(a, b)| (a - b).abs() < f64::EPSILON);
        if unchanged {
            tracing::debug!("Drag on {} released without movement", session.node_id);
            return None;
        }
        Some(Command::SetRatios {
            node_id: session.node_id,
            ratios,
        })
    }

    /// Abort: the tree was never modified, so there's nothing to roll back.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        if was_dragging {
            tracing::debug!("Drag cancelled");
        }
        self.state = DragState::Idle;
        was_dragging
    }
}

/// Recompute ratios after moving divider `divider_index` by `delta_pixels`.
///
/// Sizes are derived from `total_size`, the delta moves pixels between the
/// two children around the divider, every child is held at `min_size` or
/// above when there is room for it, and the result is renormalized.
pub fn resize_ratios(
    ratios: &[f64],
    divider_index: usize,
    delta_pixels: i32,
    total_size: i32,
    min_size: i32,
) -> Vec<f64> {
    if divider_index + 1 >= ratios.len() || total_size <= 0 {
        return ratios.to_vec();
    }
    let total = total_size as f64;
    let floor = min_size.max(0) as f64;
    let mut sizes: Vec<f64> = ratios.iter().map(|r| r * total).collect();

    let (before, after) = (divider_index, divider_index + 1);
    let lowest = floor - sizes[before];
    let highest = sizes[after] - floor;
    let delta = if lowest > highest {
        0.0
    } else {
        (delta_pixels as f64).clamp(lowest, highest)
    };
    sizes[before] += delta;
    sizes[after] -= delta;

    if floor * sizes.len() as f64 <= total {
        for size in &mut sizes {
            *size = size.max(floor);
        }
    }

    let sum: f64 = sizes.iter().sum();
    if sum <= 0.0 {
        return ratios.to_vec();
    }
    sizes.iter().map(|s| s / sum).collect()
}

/// Throttles pointer sampling to a fixed rate on the caller's own loop.
#[derive(Debug, Clone)]
pub struct DragPoller {
    interval: Duration,
    last_sample: Option<Instant>,
}

impl DragPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sample: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a sample is due at `now`; records the sample if so.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.last_sample {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last_sample = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_sample = None;
    }
}
