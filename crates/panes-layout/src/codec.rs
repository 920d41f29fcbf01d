// ABOUTME: Session codec: exports the pane tree to JSON and rebuilds it.
// ABOUTME: Restore is lenient per node; pane ids are regenerated on load.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use panes_core::{IdAllocator, Orientation, PaneId};

use crate::tree::{checked_ratios, LayoutTree, LeafNode, PaneNode, SplitNode};

/// Persisted form of one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionNode {
    Leaf {
        pane_id: u64,
        widget_id: String,
    },
    Split {
        orientation: Orientation,
        ratios: Vec<f64>,
        children: Vec<SessionNode>,
    },
}

/// Persisted layout document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    pub version: u32,
    pub focused_pane: Option<u64>,
    pub root: Option<SessionNode>,
}

impl SessionDocument {
    pub const CURRENT_VERSION: u32 = 1;
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session document is malformed: {0}")]
    Malformed(String),

    #[error("Unsupported session version: {0}")]
    UnsupportedVersion(u64),
}

/// Result of decoding a session document
#[derive(Debug, Clone)]
pub struct RestoredLayout {
    pub tree: LayoutTree,
    /// Persisted focused pane, remapped to its freshly assigned id
    pub focused: Option<PaneId>,
    /// Persisted pane id -> new pane id
    pub id_map: HashMap<u64, PaneId>,
    /// Panes rebuilt as placeholders because their node was unreadable
    pub substituted: Vec<PaneId>,
}

pub fn save(tree: &LayoutTree, focused: Option<PaneId>) -> SessionDocument {
    SessionDocument {
        version: SessionDocument::CURRENT_VERSION,
        focused_pane: focused.map(|id| id.0),
        root: tree.root().map(export_node),
    }
}

pub fn encode(tree: &LayoutTree, focused: Option<PaneId>) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(&save(tree, focused))?)
}

fn export_node(node: &PaneNode) -> SessionNode {
    match node {
        PaneNode::Leaf(leaf) => SessionNode::Leaf {
            pane_id: leaf.pane_id.0,
            widget_id: leaf.widget_id.clone(),
        },
        PaneNode::Split(split) => SessionNode::Split {
            orientation: split.orientation(),
            ratios: split.ratios().to_vec(),
            children: split.children().iter().map(export_node).collect(),
        },
    }
}

/// Parse and rebuild a layout. Fresh pane and node ids come from `ids`.
///
/// Only a document that isn't a versioned JSON object is rejected outright;
/// problems inside the tree are repaired node by node.
pub fn decode(text: &str, ids: &mut IdAllocator) -> Result<RestoredLayout, CodecError> {
    let value: Value = serde_json::from_str(text)?;
    load(&value, ids)
}

pub fn load(value: &Value, ids: &mut IdAllocator) -> Result<RestoredLayout, CodecError> {
    let object = value
        .as_object()
        .ok_or_else(|| CodecError::Malformed("top level is not an object".to_string()))?;
    let version = object
        .get("version")
        .and_then(Value::as_u64)
        .ok_or_else(|| CodecError::Malformed("missing version".to_string()))?;
    if version == 0 || version > SessionDocument::CURRENT_VERSION as u64 {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let mut restore = Restore {
        ids,
        id_map: HashMap::new(),
        substituted: Vec::new(),
    };
    let tree = match object.get("root") {
        None | Some(Value::Null) => LayoutTree::empty(),
        Some(root) => {
            let node = restore
                .node(root)
                .ok_or_else(|| CodecError::Malformed("root has no restorable panes".to_string()))?;
            LayoutTree::with_root(node)
        }
    };

    let focused = object
        .get("focused_pane")
        .and_then(Value::as_u64)
        .and_then(|old| restore.id_map.get(&old).copied());

    Ok(RestoredLayout {
        tree,
        focused,
        id_map: restore.id_map,
        substituted: restore.substituted,
    })
}

struct Restore<'a> {
    ids: &'a mut IdAllocator,
    id_map: HashMap<u64, PaneId>,
    substituted: Vec<PaneId>,
}

impl Restore<'_> {
    /// `None` only for a split with nothing restorable inside it.
    fn node(&mut self, value: &Value) -> Option<PaneNode> {
        match value.get("type").and_then(Value::as_str) {
            Some("leaf") => Some(self.leaf(value)),
            Some("split") => self.split(value),
            other => {
                tracing::warn!("Unknown session node type {:?}, substituting placeholder", other);
                Some(self.placeholder())
            }
        }
    }

    fn leaf(&mut self, value: &Value) -> PaneNode {
        let Some(widget_id) = value.get("widget_id").and_then(Value::as_str) else {
            tracing::warn!("Session leaf without widget_id, substituting placeholder");
            return self.placeholder();
        };
        let pane_id = self.ids.pane();
        if let Some(old) = value.get("pane_id").and_then(Value::as_u64) {
            self.id_map.entry(old).or_insert(pane_id);
        }
        PaneNode::Leaf(LeafNode::new(self.ids.node(), pane_id, widget_id))
    }

    fn placeholder(&mut self) -> PaneNode {
        let pane_id = self.ids.pane();
        self.substituted.push(pane_id);
        PaneNode::Leaf(LeafNode::new(self.ids.node(), pane_id, ""))
    }

    fn split(&mut self, value: &Value) -> Option<PaneNode> {
        let orientation = value
            .get("orientation")
            .cloned()
            .and_then(|o| serde_json::from_value::<Orientation>(o).ok())
            .unwrap_or_else(|| {
                tracing::warn!("Session split with bad orientation, assuming horizontal");
                Orientation::Horizontal
            });
        let stored_ratios: Vec<Option<f64>> = value
            .get("ratios")
            .and_then(Value::as_array)
            .map(|list| list.iter().map(Value::as_f64).collect())
            .unwrap_or_default();
        let raw_children = value
            .get("children")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut children = Vec::new();
        let mut ratios = Vec::new();
        let ratios_aligned = stored_ratios.len() == raw_children.len();
        for (index, raw) in raw_children.iter().enumerate() {
            if let Some(child) = self.node(raw) {
                children.push(child);
                ratios.push(if ratios_aligned { stored_ratios[index] } else { None });
            }
        }

        match children.len() {
            0 => {
                tracing::warn!("Dropping empty session split");
                None
            }
            1 => children.pop(),
            count => {
                let node_id = self.ids.node();
                let ratios = repaired_ratios(&ratios, count);
                SplitNode::new(node_id, orientation, children, ratios)
                    .ok()
                    .map(PaneNode::Split)
            }
        }
    }
}

/// Stored ratios if they are all present and positive (renormalized if some
/// children were dropped), otherwise an even split.
fn repaired_ratios(stored: &[Option<f64>], count: usize) -> Vec<f64> {
    let present: Option<Vec<f64>> = stored.iter().copied().collect();
    let even = vec![1.0 / count as f64; count];
    let Some(values) = present else {
        tracing::warn!("Session split has missing ratios, using even split");
        return even;
    };
    let sum: f64 = values.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return even;
    }
    let normalized: Vec<f64> = values.iter().map(|r| r / sum).collect();
    match checked_ratios(&normalized, count) {
        Ok(ratios) => ratios,
        Err(err) => {
            tracing::warn!("Session split has invalid ratios ({}), using even split", err);
            even
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panes_core::SplitPosition;

    fn nested_tree(ids: &mut IdAllocator) -> LayoutTree {
        let a = LeafNode::new(ids.node(), ids.pane(), "shell:A");
        let a_id = a.pane_id;
        let tree = LayoutTree::single(a);
        let tree = tree
            .with_split(a_id, LeafNode::new(ids.node(), ids.pane(), "shell:B"), ids.node(), SplitPosition::Right, 0.3)
            .unwrap();
        tree.with_split(a_id, LeafNode::new(ids.node(), ids.pane(), "log:C"), ids.node(), SplitPosition::Bottom, 0.6)
            .unwrap()
    }

    fn shape(node: &PaneNode) -> String {
        match node {
            PaneNode::Leaf(leaf) => leaf.widget_id.clone(),
            PaneNode::Split(split) => format!(
                "{:?}[{}]",
                split.orientation(),
                split
                    .children()
                    .iter()
                    .map(shape)
                    .collect::<Vec<_>>()
                    .join(",")
            ),
        }
    }

    #[test]
    fn roundtrip_preserves_structure_ratios_and_widgets() {
        let mut ids = IdAllocator::new();
        let tree = nested_tree(&mut ids);
        let text = encode(&tree, Some(tree.pane_ids()[0])).unwrap();

        let mut fresh = IdAllocator::new();
        fresh.observe(1000);
        let restored = decode(&text, &mut fresh).unwrap();
        restored.tree.validate().unwrap();

        assert_eq!(shape(restored.tree.root().unwrap()), shape(tree.root().unwrap()));
        for (old, new) in tree.splits().iter().zip(restored.tree.splits()) {
            for (a, b) in old.ratios().iter().zip(new.ratios()) {
                assert!((a - b).abs() < 1e-9);
            }
        }
        assert!(restored.substituted.is_empty());
    }

    #[test]
    fn pane_ids_are_regenerated_and_focus_remapped() {
        let mut ids = IdAllocator::new();
        let tree = nested_tree(&mut ids);
        let focused = tree.pane_ids()[1];
        let text = encode(&tree, Some(focused)).unwrap();

        let mut fresh = IdAllocator::new();
        fresh.observe(1000);
        let restored = decode(&text, &mut fresh).unwrap();

        let new_ids = restored.tree.pane_ids();
        assert!(new_ids.iter().all(|id| id.0 > 1000));
        assert_eq!(restored.focused, Some(new_ids[1]));
        assert_eq!(restored.id_map[&focused.0], new_ids[1]);
    }

    #[test]
    fn malformed_leaf_becomes_placeholder() {
        let text = r#"{
            "version": 1,
            "focused_pane": null,
            "root": {
                "type": "split",
                "orientation": "vertical",
                "ratios": [0.25, 0.75],
                "children": [
                    {"type": "leaf", "pane_id": 4, "widget_id": "ok"},
                    {"type": "leaf", "pane_id": 5}
                ]
            }
        }"#;
        let restored = decode(text, &mut IdAllocator::new()).unwrap();
        let leaves = restored.tree.leaves();
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].widget_id, "ok");
        assert!(leaves[1].is_placeholder());
        assert_eq!(restored.substituted, vec![leaves[1].pane_id]);
        assert_eq!(restored.tree.splits()[0].ratios(), &[0.25, 0.75]);
    }

    #[test]
    fn bad_ratios_fall_back_to_even_split() {
        let text = r#"{"version": 1, "root": {"type": "split", "orientation": "horizontal",
            "ratios": [0.9, -1.0, "x"],
            "children": [
                {"type": "leaf", "widget_id": "a"},
                {"type": "leaf", "widget_id": "b"},
                {"type": "leaf", "widget_id": "c"}
            ]}}"#;
        let restored = decode(text, &mut IdAllocator::new()).unwrap();
        let split = restored.tree.splits()[0];
        assert!(split.ratios().iter().all(|r| (r - 1.0 / 3.0).abs() < 1e-9));
    }

    #[test]
    fn single_child_split_collapses() {
        let text = r#"{"version": 1, "root": {"type": "split", "orientation": "horizontal",
            "ratios": [1.0], "children": [{"type": "leaf", "widget_id": "only"}]}}"#;
        let restored = decode(text, &mut IdAllocator::new()).unwrap();
        assert!(matches!(restored.tree.root(), Some(PaneNode::Leaf(leaf)) if leaf.widget_id == "only"));
    }

    #[test]
    fn null_root_is_empty_layout() {
        let restored = decode(r#"{"version": 1, "root": null}"#, &mut IdAllocator::new()).unwrap();
        assert!(restored.tree.is_empty());
    }

    #[test]
    fn rejects_non_documents() {
        assert!(matches!(decode("[1, 2]", &mut IdAllocator::new()), Err(CodecError::Malformed(_))));
        assert!(matches!(decode("not json", &mut IdAllocator::new()), Err(CodecError::Json(_))));
        assert!(matches!(
            decode(r#"{"version": 9, "root": null}"#, &mut IdAllocator::new()),
            Err(CodecError::UnsupportedVersion(9))
        ));
    }
}
