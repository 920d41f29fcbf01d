// ABOUTME: Split orientation, split placement and navigation direction enums.
// ABOUTME: Maps split positions to orientations and child order.

use serde::{Deserialize, Serialize};

/// Axis along which a split lays out its children.
///
/// `Horizontal` places children side by side (vertical divider lines),
/// `Vertical` stacks them top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Where a new pane goes relative to the pane being split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPosition {
    Left,
    Right,
    Top,
    Bottom,
}

impl SplitPosition {
    pub const fn orientation(self) -> Orientation {
        match self {
            SplitPosition::Left | SplitPosition::Right => Orientation::Horizontal,
            SplitPosition::Top | SplitPosition::Bottom => Orientation::Vertical,
        }
    }

    /// Whether the new pane becomes the first child of the split.
    pub const fn new_pane_first(self) -> bool {
        matches!(self, SplitPosition::Left | SplitPosition::Top)
    }
}

/// Spatial focus navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const fn orientation(self) -> Orientation {
        match self {
            Direction::Left | Direction::Right => Orientation::Horizontal,
            Direction::Up | Direction::Down => Orientation::Vertical,
        }
    }
}
