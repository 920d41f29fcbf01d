// ABOUTME: N-ary split tree describing the pane layout.
// ABOUTME: Pure data with strictly top-down ownership; mutations build a new tree.

use std::collections::{HashMap, HashSet};

use panes_core::{NodeId, Orientation, PaneId, SplitPosition};

use crate::LayoutError;

/// Tolerance for "ratios sum to 1.0".
pub const RATIO_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    pub node_id: NodeId,
    pub pane_id: PaneId,
    /// Opaque to the engine, only the content provider interprets it
    pub widget_id: String,
}

impl LeafNode {
    pub fn new(node_id: NodeId, pane_id: PaneId, widget_id: impl Into<String>) -> Self {
        Self {
            node_id,
            pane_id,
            widget_id: widget_id.into(),
        }
    }

    /// Leaves restored without a usable widget id get local placeholder content.
    pub fn is_placeholder(&self) -> bool {
        self.widget_id.is_empty()
    }
}

/// Ordered, ratio-weighted partition among at least two children.
///
/// Fields are private so a split can only exist in a valid shape: two or
/// more children, one positive ratio per child, ratios summing to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitNode {
    node_id: NodeId,
    orientation: Orientation,
    children: Vec<PaneNode>,
    ratios: Vec<f64>,
}

impl SplitNode {
    pub fn new(
        node_id: NodeId,
        orientation: Orientation,
        children: Vec<PaneNode>,
        ratios: Vec<f64>,
    ) -> Result<Self, LayoutError> {
        if children.len() < 2 {
            return Err(LayoutError::Invariant(format!(
                "split {} needs at least two children, got {}",
                node_id,
                children.len()
            )));
        }
        let ratios = checked_ratios(&ratios, children.len())?;
        Ok(Self {
            node_id,
            orientation,
            children,
            ratios,
        })
    }

    /// Split with every child getting the same share.
    pub fn even(
        node_id: NodeId,
        orientation: Orientation,
        children: Vec<PaneNode>,
    ) -> Result<Self, LayoutError> {
        let ratios = vec![1.0 / children.len().max(1) as f64; children.len()];
        Self::new(node_id, orientation, children, ratios)
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn children(&self) -> &[PaneNode] {
        &self.children
    }

    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaneNode {
    Leaf(LeafNode),
    Split(SplitNode),
}

impl PaneNode {
    pub fn node_id(&self) -> NodeId {
        match self {
            PaneNode::Leaf(leaf) => leaf.node_id,
            PaneNode::Split(split) => split.node_id,
        }
    }
}

/// Validate a ratio list against a child count and return it renormalized
/// so accumulated float drift never builds up across edits.
pub(crate) fn checked_ratios(ratios: &[f64], expected: usize) -> Result<Vec<f64>, LayoutError> {
    if ratios.len() != expected {
        return Err(LayoutError::RatioCountMismatch {
            expected,
            got: ratios.len(),
        });
    }
    if let Some(bad) = ratios.iter().find(|r| !r.is_finite() || **r <= 0.0) {
        return Err(LayoutError::InvalidRatio(*bad));
    }
    let sum: f64 = ratios.iter().sum();
    if (sum - 1.0).abs() >= RATIO_EPSILON {
        return Err(LayoutError::RatioSum(sum));
    }
    Ok(ratios.iter().map(|r| r / sum).collect())
}

/// The whole layout. `None` root means nothing has been initialized yet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutTree {
    root: Option<PaneNode>,
}

impl LayoutTree {
    pub fn empty() -> Self {
        Self { root: None }
    }

    pub fn with_root(root: PaneNode) -> Self {
        Self { root: Some(root) }
    }

    pub fn single(leaf: LeafNode) -> Self {
        Self::with_root(PaneNode::Leaf(leaf))
    }

    pub fn root(&self) -> Option<&PaneNode> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Pane ids in depth-first, first-child-first order (the tab order).
    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.leaves().iter().map(|leaf| leaf.pane_id).collect()
    }

    pub fn leaves(&self) -> Vec<&LeafNode> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            collect_leaves(root, &mut out);
        }
        out
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    pub fn contains_pane(&self, pane_id: PaneId) -> bool {
        self.find_leaf(pane_id).is_some()
    }

    pub fn find_leaf(&self, pane_id: PaneId) -> Option<&LeafNode> {
        self.leaves().into_iter().find(|leaf| leaf.pane_id == pane_id)
    }

    /// First pane (in tab order) showing the given widget id.
    pub fn pane_for_widget(&self, widget_id: &str) -> Option<PaneId> {
        self.leaves()
            .into_iter()
            .find(|leaf| leaf.widget_id == widget_id)
            .map(|leaf| leaf.pane_id)
    }

    pub fn find_split(&self, node_id: NodeId) -> Option<&SplitNode> {
        self.root.as_ref().and_then(|root| find_split(root, node_id))
    }

    /// Child-to-parent map, rebuilt from scratch on every call.
    pub fn parent_map(&self) -> HashMap<NodeId, NodeId> {
        let mut out = HashMap::new();
        if let Some(root) = &self.root {
            collect_parents(root, &mut out);
        }
        out
    }

    /// Split node directly containing the given pane, if any.
    pub fn parent_of_pane(&self, pane_id: PaneId) -> Option<&SplitNode> {
        let leaf = self.find_leaf(pane_id)?;
        let parent = *self.parent_map().get(&leaf.node_id)?;
        self.find_split(parent)
    }

    /// Every split node, outermost first.
    pub fn splits(&self) -> Vec<&SplitNode> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            collect_splits(root, &mut out);
        }
        out
    }

    /// Check the structural invariants: split shape, ratio sums and id uniqueness.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let Some(root) = &self.root else {
            return Ok(());
        };
        let mut panes = HashSet::new();
        let mut nodes = HashSet::new();
        validate_node(root, &mut panes, &mut nodes)
    }

    /// Replace `target` with a split holding the old leaf and `new_leaf`.
    pub(crate) fn with_split(
        &self,
        target: PaneId,
        new_leaf: LeafNode,
        split_id: NodeId,
        position: SplitPosition,
        ratio: f64,
    ) -> Result<LayoutTree, LayoutError> {
        if !ratio.is_finite() || ratio <= 0.0 || ratio >= 1.0 {
            return Err(LayoutError::InvalidRatio(ratio));
        }
        let mut next = self.clone();
        let slot = next
            .root
            .as_mut()
            .and_then(|root| find_leaf_slot(root, target))
            .ok_or(LayoutError::UnknownPane(target))?;

        let old = slot.clone();
        let new = PaneNode::Leaf(new_leaf);
        let (children, ratios) = if position.new_pane_first() {
            (vec![new, old], vec![ratio, 1.0 - ratio])
        } else {
            (vec![old, new], vec![1.0 - ratio, ratio])
        };
        *slot = PaneNode::Split(SplitNode::new(
            split_id,
            position.orientation(),
            children,
            ratios,
        )?);
        Ok(next)
    }

    /// Drop `target` from its parent, renormalizing the siblings' ratios and
    /// collapsing the parent into its sole remaining child if needed.
    pub(crate) fn without_pane(&self, target: PaneId) -> Result<LayoutTree, LayoutError> {
        let root = self.root.as_ref().ok_or(LayoutError::UnknownPane(target))?;
        let leaf = self
            .find_leaf(target)
            .ok_or(LayoutError::UnknownPane(target))?;
        if let PaneNode::Leaf(_) = root {
            return Err(LayoutError::LastPane(target));
        }
        let leaf_node = leaf.node_id;
        let parent_id = *self
            .parent_map()
            .get(&leaf_node)
            .ok_or_else(|| LayoutError::Invariant(format!("{} has no parent", leaf_node)))?;

        let mut next = self.clone();
        let slot = next
            .root
            .as_mut()
            .and_then(|root| find_node_slot(root, parent_id))
            .ok_or(LayoutError::UnknownNode(parent_id))?;
        let PaneNode::Split(parent) = &mut *slot else {
            return Err(LayoutError::UnknownNode(parent_id));
        };

        let index = parent
            .children
            .iter()
            .position(|child| child.node_id() == leaf_node)
            .ok_or_else(|| LayoutError::Invariant(format!("{} not under {}", leaf_node, parent_id)))?;
        parent.children.remove(index);
        parent.ratios.remove(index);

        if parent.children.len() == 1 {
            if let Some(only) = parent.children.pop() {
                *slot = only;
            }
        } else {
            let sum: f64 = parent.ratios.iter().sum();
            for ratio in &mut parent.ratios {
                *ratio /= sum;
            }
        }
        Ok(next)
    }

    pub(crate) fn with_ratios(&self, node_id: NodeId, ratios: &[f64]) -> Result<LayoutTree, LayoutError> {
        let mut next = self.clone();
        let split = next
            .root
            .as_mut()
            .and_then(|root| find_split_mut(root, node_id))
            .ok_or(LayoutError::UnknownNode(node_id))?;
        split.ratios = checked_ratios(ratios, split.children.len())?;
        Ok(next)
    }
}

fn collect_leaves<'a>(node: &'a PaneNode, out: &mut Vec<&'a LeafNode>) {
    match node {
        PaneNode::Leaf(leaf) => out.push(leaf),
        PaneNode::Split(split) => {
            for child in &split.children {
                collect_leaves(child, out);
            }
        }
    }
}

fn collect_splits<'a>(node: &'a PaneNode, out: &mut Vec<&'a SplitNode>) {
    if let PaneNode::Split(split) = node {
        out.push(split);
        for child in &split.children {
            collect_splits(child, out);
        }
    }
}

fn collect_parents(node: &PaneNode, out: &mut HashMap<NodeId, NodeId>) {
    if let PaneNode::Split(split) = node {
        for child in &split.children {
            out.insert(child.node_id(), split.node_id);
            collect_parents(child, out);
        }
    }
}

fn find_split(node: &PaneNode, node_id: NodeId) -> Option<&SplitNode> {
    match node {
        PaneNode::Leaf(_) => None,
        PaneNode::Split(split) if split.node_id == node_id => Some(split),
        PaneNode::Split(split) => split.children.iter().find_map(|c| find_split(c, node_id)),
    }
}

fn find_split_mut(node: &mut PaneNode, node_id: NodeId) -> Option<&mut SplitNode> {
    let PaneNode::Split(split) = node else {
        return None;
    };
    if split.node_id == node_id {
        return Some(split);
    }
    split
        .children
        .iter_mut()
        .find_map(|c| find_split_mut(c, node_id))
}

fn find_leaf_slot(node: &mut PaneNode, pane_id: PaneId) -> Option<&mut PaneNode> {
    if matches!(node, PaneNode::Leaf(leaf) if leaf.pane_id == pane_id) {
        return Some(node);
    }
    match node {
        PaneNode::Leaf(_) => None,
        PaneNode::Split(split) => split
            .children
            .iter_mut()
            .find_map(|c| find_leaf_slot(c, pane_id)),
    }
}

fn find_node_slot(node: &mut PaneNode, node_id: NodeId) -> Option<&mut PaneNode> {
    if node.node_id() == node_id {
        return Some(node);
    }
    match node {
        PaneNode::Leaf(_) => None,
        PaneNode::Split(split) => split
            .children
            .iter_mut()
            .find_map(|c| find_node_slot(c, node_id)),
    }
}

fn validate_node(
    node: &PaneNode,
    panes: &mut HashSet<PaneId>,
    nodes: &mut HashSet<NodeId>,
) -> Result<(), LayoutError> {
    if !nodes.insert(node.node_id()) {
        return Err(LayoutError::Invariant(format!(
            "duplicate node id {}",
            node.node_id()
        )));
    }
    match node {
        PaneNode::Leaf(leaf) => {
            if !panes.insert(leaf.pane_id) {
                return Err(LayoutError::Invariant(format!(
                    "duplicate pane id {}",
                    leaf.pane_id
                )));
            }
            Ok(())
        }
        PaneNode::Split(split) => {
            if split.children.len() < 2 {
                return Err(LayoutError::Invariant(format!(
                    "{} has {} children",
                    split.node_id,
                    split.children.len()
                )));
            }
            checked_ratios(&split.ratios, split.children.len())?;
            for child in &split.children {
                validate_node(child, panes, nodes)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(n: u64, widget: &str) -> LeafNode {
        LeafNode::new(NodeId(n * 100), PaneId(n), widget)
    }

    fn two_pane_tree() -> LayoutTree {
        LayoutTree::single(leaf(1, "A"))
            .with_split(PaneId(1), leaf(2, "B"), NodeId(900), SplitPosition::Right, 0.5)
            .unwrap()
    }

    #[test]
    fn split_right_puts_new_pane_second() {
        let tree = two_pane_tree();
        let split = tree.find_split(NodeId(900)).unwrap();
        assert_eq!(split.orientation(), Orientation::Horizontal);
        assert_eq!(split.ratios(), &[0.5, 0.5]);
        assert_eq!(tree.pane_ids(), vec![PaneId(1), PaneId(2)]);
    }

    #[test]
    fn split_top_puts_new_pane_first_with_its_ratio() {
        let tree = LayoutTree::single(leaf(1, "A"))
            .with_split(PaneId(1), leaf(2, "B"), NodeId(900), SplitPosition::Top, 0.25)
            .unwrap();
        let split = tree.find_split(NodeId(900)).unwrap();
        assert_eq!(split.orientation(), Orientation::Vertical);
        assert_eq!(tree.pane_ids(), vec![PaneId(2), PaneId(1)]);
        assert!((split.ratios()[0] - 0.25).abs() < RATIO_EPSILON);
        assert!((split.ratios()[1] - 0.75).abs() < RATIO_EPSILON);
    }

    #[test]
    fn split_rejects_degenerate_ratio() {
        let tree = LayoutTree::single(leaf(1, "A"));
        for ratio in [0.0, 1.0, -0.5, f64::NAN] {
            let result = tree.with_split(PaneId(1), leaf(2, "B"), NodeId(900), SplitPosition::Right, ratio);
            assert!(matches!(result, Err(LayoutError::InvalidRatio(_))));
        }
    }

    #[test]
    fn split_unknown_pane_fails() {
        let tree = LayoutTree::single(leaf(1, "A"));
        let result = tree.with_split(PaneId(7), leaf(2, "B"), NodeId(900), SplitPosition::Right, 0.5);
        assert_eq!(result, Err(LayoutError::UnknownPane(PaneId(7))));
    }

    #[test]
    fn removing_from_two_pane_split_collapses() {
        let tree = two_pane_tree().without_pane(PaneId(2)).unwrap();
        assert_eq!(tree, LayoutTree::single(leaf(1, "A")));
    }

    #[test]
    fn removing_last_pane_is_rejected() {
        let tree = LayoutTree::single(leaf(1, "A"));
        assert_eq!(tree.without_pane(PaneId(1)), Err(LayoutError::LastPane(PaneId(1))));
    }

    #[test]
    fn removing_from_three_way_split_renormalizes() {
        let root = SplitNode::new(
            NodeId(900),
            Orientation::Horizontal,
            vec![
                PaneNode::Leaf(leaf(1, "A")),
                PaneNode::Leaf(leaf(2, "B")),
                PaneNode::Leaf(leaf(3, "C")),
            ],
            vec![0.5, 0.25, 0.25],
        )
        .unwrap();
        let tree = LayoutTree::with_root(PaneNode::Split(root))
            .without_pane(PaneId(1))
            .unwrap();
        let split = tree.find_split(NodeId(900)).unwrap();
        assert_eq!(split.children().len(), 2);
        assert!((split.ratios()[0] - 0.5).abs() < RATIO_EPSILON);
        assert!((split.ratios()[1] - 0.5).abs() < RATIO_EPSILON);
        tree.validate().unwrap();
    }

    #[test]
    fn nested_collapse_replaces_parent_in_grandparent() {
        let tree = two_pane_tree()
            .with_split(PaneId(2), leaf(3, "C"), NodeId(901), SplitPosition::Bottom, 0.5)
            .unwrap();
        let tree = tree.without_pane(PaneId(3)).unwrap();
        assert_eq!(tree, two_pane_tree());
    }

    #[test]
    fn with_ratios_validates_shape() {
        let tree = two_pane_tree();
        assert!(matches!(
            tree.with_ratios(NodeId(900), &[1.0]),
            Err(LayoutError::RatioCountMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            tree.with_ratios(NodeId(900), &[0.7, 0.7]),
            Err(LayoutError::RatioSum(_))
        ));
        assert_eq!(
            tree.with_ratios(NodeId(5), &[0.5, 0.5]),
            Err(LayoutError::UnknownNode(NodeId(5)))
        );
        let updated = tree.with_ratios(NodeId(900), &[0.25, 0.75]).unwrap();
        assert_eq!(updated.find_split(NodeId(900)).unwrap().ratios(), &[0.25, 0.75]);
    }

    #[test]
    fn with_ratios_reaches_nested_split() {
        let tree = two_pane_tree()
            .with_split(PaneId(2), leaf(3, "C"), NodeId(901), SplitPosition::Bottom, 0.5)
            .unwrap();
        let updated = tree.with_ratios(NodeId(901), &[0.3, 0.7]).unwrap();
        assert_eq!(updated.find_split(NodeId(901)).unwrap().ratios(), &[0.3, 0.7]);
        assert_eq!(updated.find_split(NodeId(900)).unwrap().ratios(), &[0.5, 0.5]);
        updated.validate().unwrap();
    }

    #[test]
    fn parent_lookup_uses_rebuilt_map() {
        let tree = two_pane_tree();
        assert_eq!(tree.parent_of_pane(PaneId(2)).map(|s| s.node_id()), Some(NodeId(900)));
        assert!(LayoutTree::single(leaf(1, "A")).parent_of_pane(PaneId(1)).is_none());
    }

    #[test]
    fn validate_catches_duplicate_panes() {
        let root = SplitNode::even(
            NodeId(900),
            Orientation::Vertical,
            vec![PaneNode::Leaf(leaf(1, "A")), PaneNode::Leaf(LeafNode::new(NodeId(5), PaneId(1), "B"))],
        )
        .unwrap();
        let tree = LayoutTree::with_root(PaneNode::Split(root));
        assert!(matches!(tree.validate(), Err(LayoutError::Invariant(_))));
    }
}
