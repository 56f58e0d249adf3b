//! Structural commands: add, remove and reparent nodes.
//!
//! These record parent and sibling index explicitly so undo restores the
//! original sibling ordering, not just membership. A recorded parent that
//! has since vanished falls back to the document root; a recorded index
//! that no longer fits appends. Both are warnings, never failures.

use serde::{Deserialize, Serialize};

use umbra_scene::{NodeData, NodeId};

use crate::{CommandError, CommandResult, EditorEvent, EditorState};

/// Insert a node subtree under a parent at a recorded sibling index.
///
/// The command owns the full serialized subtree. That snapshot doubles as
/// the reconstruction fallback when the record is replayed into a document
/// that has never contained the object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddObjectCommand {
    pub parent: NodeId,
    pub index: Option<usize>,
    pub data: NodeData,
}

impl AddObjectCommand {
    /// Append `data` under `parent`.
    pub fn new(parent: NodeId, data: NodeData) -> Self {
        Self {
            parent,
            index: None,
            data,
        }
    }

    /// Insert at a specific sibling index instead of appending.
    pub fn at_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub(crate) fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        if state.graph.contains(self.data.id) {
            log::warn!("object {} already present; skipping add", self.data.id);
            return Ok(Vec::new());
        }
        let parent = resolve_parent(state, self.parent);
        warn_if_index_out_of_range(state, parent, self.index);
        match state.graph.add_data(parent, self.index, &self.data) {
            Ok(id) => Ok(vec![
                EditorEvent::ObjectAdded(id),
                EditorEvent::SceneGraphChanged,
            ]),
            Err(e) => Err(CommandError::InvalidOperation(e.to_string())),
        }
    }

    pub(crate) fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        remove_subtree(state, self.data.id)
    }
}

/// Remove a node subtree, remembering everything needed to put it back:
/// parent, sibling index, the serialized subtree and whether the node was
/// selected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoveObjectCommand {
    pub node: NodeId,
    pub parent: NodeId,
    pub index: usize,
    pub data: NodeData,
    pub was_selected: bool,
}

impl RemoveObjectCommand {
    /// Capture the node's location, subtree snapshot and selection state.
    pub fn new(state: &EditorState, node: NodeId) -> Result<Self, CommandError> {
        if node == state.graph.root() {
            return Err(CommandError::InvalidOperation(
                "the scene root cannot be removed".to_string(),
            ));
        }
        let (parent, index) = state
            .graph
            .location(node)
            .ok_or(CommandError::NodeNotFound(node))?;
        let data = state
            .graph
            .subtree_data(node)
            .ok_or(CommandError::NodeNotFound(node))?;
        Ok(Self {
            node,
            parent,
            index,
            data,
            was_selected: state.selection.is_selected(node),
        })
    }

    pub(crate) fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        remove_subtree(state, self.node)
    }

    pub(crate) fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        if state.graph.contains(self.node) {
            log::warn!("object {} already present; skipping re-insert", self.node);
            return Ok(Vec::new());
        }
        let parent = resolve_parent(state, self.parent);
        warn_if_index_out_of_range(state, parent, Some(self.index));
        match state.graph.add_data(parent, Some(self.index), &self.data) {
            Ok(id) => {
                let mut effects = vec![
                    EditorEvent::ObjectAdded(id),
                    EditorEvent::SceneGraphChanged,
                ];
                if self.was_selected {
                    state.selection.select(Some(id));
                    effects.push(EditorEvent::SelectionChanged(Some(id)));
                }
                Ok(effects)
            }
            Err(e) => Err(CommandError::InvalidOperation(e.to_string())),
        }
    }
}

/// Reparent a node, preserving exact sibling indices on both ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveObjectCommand {
    pub node: NodeId,
    pub old_parent: NodeId,
    pub old_index: usize,
    pub new_parent: NodeId,
    pub new_index: Option<usize>,
}

impl MoveObjectCommand {
    /// Capture the node's current location as the old state.
    pub fn new(
        state: &EditorState,
        node: NodeId,
        new_parent: NodeId,
        new_index: Option<usize>,
    ) -> Result<Self, CommandError> {
        let (old_parent, old_index) = state
            .graph
            .location(node)
            .ok_or(CommandError::NodeNotFound(node))?;
        if !state.graph.contains(new_parent) {
            return Err(CommandError::NodeNotFound(new_parent));
        }
        Ok(Self {
            node,
            old_parent,
            old_index,
            new_parent,
            new_index,
        })
    }

    pub(crate) fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        move_to(state, self.node, self.new_parent, self.new_index)
    }

    pub(crate) fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        move_to(state, self.node, self.old_parent, Some(self.old_index))
    }
}

fn move_to(
    state: &mut EditorState,
    node: NodeId,
    parent: NodeId,
    index: Option<usize>,
) -> CommandResult {
    if !state.graph.contains(node) {
        log::warn!("move target {node} is gone; skipping");
        return Ok(Vec::new());
    }
    let parent = resolve_parent(state, parent);
    warn_if_index_out_of_range(state, parent, index);
    match state.graph.move_node(node, parent, index) {
        Ok(()) => Ok(vec![
            EditorEvent::ObjectChanged(node),
            EditorEvent::SceneGraphChanged,
        ]),
        Err(e) => Err(CommandError::InvalidOperation(e.to_string())),
    }
}

fn remove_subtree(state: &mut EditorState, id: NodeId) -> CommandResult {
    if !state.graph.contains(id) {
        log::warn!("object {id} is gone; skipping removal");
        return Ok(Vec::new());
    }
    let selected = state.selection.is_selected(id);
    match state.graph.remove_node(id) {
        Ok(_) => {
            let mut effects = vec![
                EditorEvent::ObjectRemoved(id),
                EditorEvent::SceneGraphChanged,
            ];
            if selected {
                state.selection.remove_node(id);
                effects.push(EditorEvent::SelectionChanged(state.selection.primary()));
            }
            Ok(effects)
        }
        Err(e) => Err(CommandError::InvalidOperation(e.to_string())),
    }
}

// A vanished parent falls back to the document root rather than failing.
fn resolve_parent(state: &EditorState, parent: NodeId) -> NodeId {
    if state.graph.contains(parent) {
        parent
    } else {
        log::warn!("parent {parent} is gone; attaching under the scene root");
        state.graph.root()
    }
}

fn warn_if_index_out_of_range(state: &EditorState, parent: NodeId, index: Option<usize>) {
    if let Some(i) = index {
        let len = state.graph.get(parent).map_or(0, |p| p.children.len());
        if i > len {
            log::warn!("recorded sibling index {i} is out of range; appending");
        }
    }
}
