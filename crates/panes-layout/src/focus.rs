// ABOUTME: Focused pane tracking, tab-order cycling and spatial navigation.
// ABOUTME: Spatial moves pick the nearest pane that overlaps on the perpendicular axis.

use std::collections::HashMap;

use panes_core::{Direction, PaneId, Rect};

/// A focus transition; `None` on either side means "no pane".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub old: Option<PaneId>,
    pub new: Option<PaneId>,
}

#[derive(Debug, Clone, Default)]
pub struct FocusTracker {
    focused: Option<PaneId>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<PaneId> {
        self.focused
    }

    /// Set focus, returning the change if it actually moved.
    pub fn set(&mut self, pane: Option<PaneId>) -> Option<FocusChange> {
        if self.focused == pane {
            return None;
        }
        let change = FocusChange {
            old: self.focused,
            new: pane,
        };
        self.focused = pane;
        Some(change)
    }

    /// Next pane in tab order, wrapping around.
    pub fn focus_next(&mut self, order: &[PaneId]) -> Option<FocusChange> {
        self.step(order, 1)
    }

    /// Previous pane in tab order, wrapping around.
    pub fn focus_previous(&mut self, order: &[PaneId]) -> Option<FocusChange> {
        self.step(order, order.len().saturating_sub(1))
    }

    fn step(&mut self, order: &[PaneId], offset: usize) -> Option<FocusChange> {
        if order.is_empty() {
            return None;
        }
        let target = match self.focused.and_then(|f| order.iter().position(|id| *id == f)) {
            Some(index) => order[(index + offset) % order.len()],
            None => order[0],
        };
        self.set(Some(target))
    }

    /// Move focus to the nearest pane in `direction`. No wraparound.
    pub fn navigate(
        &mut self,
        direction: Direction,
        rects: &HashMap<PaneId, Rect>,
        order: &[PaneId],
    ) -> Option<FocusChange> {
        let from = self.focused?;
        let target = find_neighbor(from, direction, rects, order)?;
        tracing::debug!("Navigated {:?} from {} to {}", direction, from, target);
        self.set(Some(target))
    }

    /// Keep focus valid after the pane set changed.
    ///
    /// If the focused pane is gone, focus moves to the pane that followed it
    /// in `previous_order`, else the one before it, else the first pane.
    pub fn reconcile(&mut self, previous_order: &[PaneId], order: &[PaneId]) -> Option<FocusChange> {
        if let Some(current) = self.focused {
            if order.contains(&current) {
                return None;
            }
        }
        let survivor = self
            .focused
            .and_then(|gone| previous_order.iter().position(|id| *id == gone))
            .and_then(|index| {
                let after = previous_order[index + 1..].iter();
                let before = previous_order[..index].iter().rev();
                after.chain(before).find(|id| order.contains(*id)).copied()
            });
        self.set(survivor.or_else(|| order.first().copied()))
    }
}

/// True spatial neighbour of `from` in `direction`.
///
/// Candidates must lie entirely beyond the matching edge of `from` and
/// overlap it on the perpendicular axis. The smallest edge distance wins,
/// then the larger overlap, then tab order.
pub fn find_neighbor(
    from: PaneId,
    direction: Direction,
    rects: &HashMap<PaneId, Rect>,
    order: &[PaneId],
) -> Option<PaneId> {
    let origin = rects.get(&from)?;
    let axis = direction.orientation();

    order
        .iter()
        .enumerate()
        .filter(|(_, id)| **id != from)
        .filter_map(|(rank, id)| {
            let rect = rects.get(id)?;
            let distance = match direction {
                Direction::Left => origin.x - rect.right(),
                Direction::Right => rect.x - origin.right(),
                Direction::Up => origin.y - rect.bottom(),
                Direction::Down => rect.y - origin.bottom(),
            };
            if distance < 0 {
                return None;
            }
            let overlap = origin.cross_overlap(rect, axis);
            if overlap == 0 {
                return None;
            }
            Some(((distance, -overlap, rank), *id))
        })
        .min_by_key(|(key, _)| *key)
        .map(|(_, id)| id)
}
