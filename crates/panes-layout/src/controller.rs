// ABOUTME: Sole mutation gateway for the layout tree, with undo and redo.
// ABOUTME: History entries keep the tree before and after each command.

use std::collections::{HashSet, VecDeque};

use panes_core::{IdAllocator, PaneId};

use crate::tree::{LayoutTree, LeafNode};
use crate::{Command, LayoutError};

/// What a committed transition did to the set of panes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructureDelta {
    pub added: Vec<PaneId>,
    pub removed: Vec<PaneId>,
    /// Tab order before the transition, used to pick a new focus target
    pub previous_order: Vec<PaneId>,
}

impl StructureDelta {
    fn between(before: &LayoutTree, after: &LayoutTree) -> Self {
        let previous_order = before.pane_ids();
        let next_order = after.pane_ids();
        let old: HashSet<PaneId> = previous_order.iter().copied().collect();
        let new: HashSet<PaneId> = next_order.iter().copied().collect();
        Self {
            added: next_order.iter().filter(|id| !old.contains(id)).copied().collect(),
            removed: previous_order
                .iter()
                .filter(|id| !new.contains(id))
                .copied()
                .collect(),
            previous_order,
        }
    }

    /// Whether panes were added or removed (a resize changes neither).
    pub fn changes_panes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    command: Command,
    before: LayoutTree,
    after: LayoutTree,
}

#[derive(Debug)]
pub struct CommandController {
    tree: LayoutTree,
    ids: IdAllocator,
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    history_limit: usize,
    max_panes: Option<usize>,
}

impl CommandController {
    pub fn new(history_limit: usize) -> Self {
        Self {
            tree: LayoutTree::empty(),
            ids: IdAllocator::new(),
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            history_limit,
            max_panes: None,
        }
    }

    pub fn with_max_panes(mut self, max_panes: Option<usize>) -> Self {
        self.max_panes = max_panes;
        self
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn ids_mut(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    /// Replace the whole tree with a single pane. Clears history.
    pub fn initialize(&mut self, widget_id: &str) -> (PaneId, StructureDelta) {
        let leaf = LeafNode::new(self.ids.node(), self.ids.pane(), widget_id);
        let pane_id = leaf.pane_id;
        let delta = self.replace_tree(LayoutTree::single(leaf));
        (pane_id, delta)
    }

    /// Swap in an externally built tree (e.g. a restored session). Clears history.
    pub fn replace_tree(&mut self, tree: LayoutTree) -> StructureDelta {
        for leaf in tree.leaves() {
            self.ids.observe(leaf.pane_id.0);
            self.ids.observe(leaf.node_id.0);
        }
        for split in tree.splits() {
            self.ids.observe(split.node_id().0);
        }
        let delta = StructureDelta::between(&self.tree, &tree);
        self.tree = tree;
        self.clear_history();
        delta
    }

    /// Run `command`; on success it lands on the undo stack and the redo
    /// stack is cleared. On failure nothing changes.
    pub fn execute(&mut self, command: Command) -> Result<StructureDelta, LayoutError> {
        if let (Command::Split { .. }, Some(limit)) = (&command, self.max_panes) {
            if self.tree.leaf_count() >= limit {
                return Err(LayoutError::PaneLimit(limit));
            }
        }

        let after = command.apply(&self.tree, &mut self.ids)?;
        after.validate()?;

        tracing::debug!("Executed {}", command.description());
        let before = std::mem::replace(&mut self.tree, after.clone());
        let delta = StructureDelta::between(&before, &after);
        self.push_undo(HistoryEntry {
            command,
            before,
            after,
        });
        self.redo_stack.clear();
        Ok(delta)
    }

    pub fn undo(&mut self) -> Option<StructureDelta> {
        let entry = self.undo_stack.pop_back()?;
        tracing::debug!("Undo {}", entry.command.description());
        let delta = StructureDelta::between(&self.tree, &entry.before);
        self.tree = entry.before.clone();
        self.redo_stack.push(entry);
        Some(delta)
    }

    pub fn redo(&mut self) -> Option<StructureDelta> {
        let entry = self.redo_stack.pop()?;
        tracing::debug!("Redo {}", entry.command.description());
        let delta = StructureDelta::between(&self.tree, &entry.after);
        self.tree = entry.after.clone();
        self.push_undo(entry);
        Some(delta)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Descriptions of undoable commands, most recent last
    pub fn undo_descriptions(&self) -> Vec<String> {
        self.undo_stack
            .iter()
            .map(|entry| entry.command.description())
            .collect()
    }

    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo_stack.push_back(entry);
        while self.undo_stack.len() > self.history_limit {
            self.undo_stack.pop_front();
        }
    }
}
