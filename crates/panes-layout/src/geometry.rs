// ABOUTME: Pure geometry calculation for the pane tree.
// ABOUTME: Partitions a viewport into pane rectangles and divider rectangles.

use std::collections::HashMap;

use panes_core::{NodeId, Orientation, PaneId, Point, Rect};

use crate::tree::{LayoutTree, PaneNode, SplitNode};

/// Everything one pass over the tree produces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutGeometry {
    pub panes: HashMap<PaneId, Rect>,
    /// One rectangle per gap between adjacent children, in child order
    pub dividers: HashMap<NodeId, Vec<Rect>>,
    /// Full rectangle handed to each split node
    pub splits: HashMap<NodeId, Rect>,
}

/// A divider located by hit testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DividerHit {
    pub node_id: NodeId,
    /// Gap index: divider `i` sits between children `i` and `i + 1`
    pub index: usize,
    pub rect: Rect,
}

impl LayoutGeometry {
    pub fn pane_rect(&self, pane_id: PaneId) -> Option<Rect> {
        self.panes.get(&pane_id).copied()
    }

    pub fn pane_at(&self, point: Point) -> Option<PaneId> {
        self.panes
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(id, _)| *id)
    }

    /// Find the divider under `point`, treating each divider as `slop` pixels
    /// wider on every side. Exact hits win over slop hits.
    pub fn divider_at(&self, point: Point, slop: i32) -> Option<DividerHit> {
        let mut nodes: Vec<&NodeId> = self.dividers.keys().collect();
        nodes.sort();

        let hits = |inflate: i32| {
            nodes.iter().find_map(|node_id| {
                self.dividers[*node_id]
                    .iter()
                    .enumerate()
                    .find(|(_, rect)| rect.inflate(inflate).contains(point))
                    .map(|(index, rect)| DividerHit {
                        node_id: **node_id,
                        index,
                        rect: *rect,
                    })
            })
        };

        hits(0).or_else(|| if slop > 0 { hits(slop) } else { None })
    }
}

/// Transient replacement of one split's ratios, used for drag previews.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioOverride {
    pub node_id: NodeId,
    pub ratios: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryCalculator {
    handle_width: i32,
}

impl GeometryCalculator {
    pub fn new(handle_width: i32) -> Self {
        Self {
            handle_width: handle_width.max(0),
        }
    }

    pub fn handle_width(&self) -> i32 {
        self.handle_width
    }

    /// Rectangle of every pane.
    pub fn calculate_layout(&self, tree: &LayoutTree, viewport: Rect) -> HashMap<PaneId, Rect> {
        self.calculate(tree, viewport).panes
    }

    /// Divider rectangles of every split, keyed by split node.
    pub fn calculate_dividers(
        &self,
        tree: &LayoutTree,
        viewport: Rect,
    ) -> HashMap<NodeId, Vec<Rect>> {
        self.calculate(tree, viewport).dividers
    }

    pub fn calculate(&self, tree: &LayoutTree, viewport: Rect) -> LayoutGeometry {
        self.calculate_with_override(tree, viewport, None)
    }

    /// Same as [`calculate`](Self::calculate) but reads one split's ratios
    /// from `preview` instead of the tree. The tree is never touched.
    pub fn calculate_with_override(
        &self,
        tree: &LayoutTree,
        viewport: Rect,
        preview: Option<&RatioOverride>,
    ) -> LayoutGeometry {
        let mut out = LayoutGeometry::default();
        if let Some(root) = tree.root() {
            self.descend(root, normalize(viewport), preview, &mut out);
        }
        out
    }

    /// Pixels left for content once the handles of an `children`-way split
    /// are taken out of `span`.
    pub fn content_span(&self, span: i32, children: usize) -> i32 {
        let handle = self.handle_for(span, children);
        span.max(0) - handle * children.saturating_sub(1) as i32
    }

    /// Handle width actually used; shrinks when the span can't fit full handles.
    fn handle_for(&self, span: i32, children: usize) -> i32 {
        let gaps = children.saturating_sub(1) as i32;
        if gaps == 0 {
            return 0;
        }
        self.handle_width.min(span.max(0) / gaps)
    }

    fn descend(
        &self,
        node: &PaneNode,
        rect: Rect,
        preview: Option<&RatioOverride>,
        out: &mut LayoutGeometry,
    ) {
        match node {
            PaneNode::Leaf(leaf) => {
                out.panes.insert(leaf.pane_id, rect);
            }
            PaneNode::Split(split) => {
                out.splits.insert(split.node_id(), rect);
                let ratios = effective_ratios(split, preview);
                let orientation = split.orientation();
                let span = rect.span(orientation);
                let handle = self.handle_for(span, split.children().len());
                let sizes = partition(self.content_span(span, ratios.len()), ratios);

                let mut dividers = Vec::with_capacity(sizes.len().saturating_sub(1));
                let mut offset = 0;
                for (index, (child, size)) in split.children().iter().zip(&sizes).enumerate() {
                    let child_rect = slice(rect, orientation, offset, *size);
                    self.descend(child, child_rect, preview, out);
                    offset += size;
                    if index + 1 < sizes.len() {
                        dividers.push(slice(rect, orientation, offset, handle));
                        offset += handle;
                    }
                }
                out.dividers.insert(split.node_id(), dividers);
            }
        }
    }
}

fn effective_ratios<'a>(split: &'a SplitNode, preview: Option<&'a RatioOverride>) -> &'a [f64] {
    match preview {
        Some(over)
            if over.node_id == split.node_id() && over.ratios.len() == split.children().len() =>
        {
            &over.ratios
        }
        _ => split.ratios(),
    }
}

/// Slack for float noise, so a share of exactly 697.0 doesn't floor to 696
const PIXEL_EPSILON: f64 = 1e-6;

/// Split `available` pixels by `ratios`. Every child but the last gets the
/// floor of its share; the last child absorbs the rounding remainder.
pub fn partition(available: i32, ratios: &[f64]) -> Vec<i32> {
    let available = available.max(0);
    let mut sizes = Vec::with_capacity(ratios.len());
    let mut used = 0;
    for (index, ratio) in ratios.iter().enumerate() {
        let size = if index + 1 == ratios.len() {
            available - used
        } else {
            ((available as f64 * ratio + PIXEL_EPSILON).floor() as i32).clamp(0, available - used)
        };
        used += size;
        sizes.push(size);
    }
    sizes
}

fn slice(rect: Rect, orientation: Orientation, offset: i32, size: i32) -> Rect {
    match orientation {
        Orientation::Horizontal => Rect::new(rect.x + offset, rect.y, size, rect.height),
        Orientation::Vertical => Rect::new(rect.x, rect.y + offset, rect.width, size),
    }
}

fn normalize(rect: Rect) -> Rect {
    Rect::new(rect.x, rect.y, rect.width.max(0), rect.height.max(0))
}
