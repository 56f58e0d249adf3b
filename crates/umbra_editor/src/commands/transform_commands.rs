//! Transform commands (position, rotation, scale).
//!
//! All three follow the same shape: the constructor captures the old value
//! from the live node (or accepts one captured earlier, e.g. by a drag-start
//! handler), and execute/undo copy the stored components into the node's
//! transform and recompute world matrices for the subtree. The recompute is
//! part of the mutation; without it the change is invisible downstream.

use serde::{Deserialize, Serialize};

use umbra_math::{Euler, Vector3};
use umbra_scene::NodeId;

use crate::{CommandError, CommandResult, EditorEvent, EditorState};

/// Set a node's local position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetPositionCommand {
    pub node: NodeId,
    pub old_position: Vector3,
    pub new_position: Vector3,
}

impl SetPositionCommand {
    pub fn new(
        state: &EditorState,
        node: NodeId,
        new_position: Vector3,
    ) -> Result<Self, CommandError> {
        let current = state
            .graph
            .get(node)
            .ok_or(CommandError::NodeNotFound(node))?;
        Ok(Self {
            node,
            old_position: current.transform.position,
            new_position,
        })
    }

    /// Use an old value captured earlier instead of the one read at
    /// construction time.
    pub fn with_old_position(mut self, old: Vector3) -> Self {
        self.old_position = old;
        self
    }

    pub(crate) fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        apply_position(state, self.node, self.new_position)
    }

    pub(crate) fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        apply_position(state, self.node, self.old_position)
    }
}

fn apply_position(state: &mut EditorState, node: NodeId, position: Vector3) -> CommandResult {
    let Some(target) = state.graph.get_mut(node) else {
        log::warn!("set-position target {node} is gone; skipping");
        return Ok(Vec::new());
    };
    target.transform.position = position;
    state.graph.update_world_matrix(node);
    Ok(vec![EditorEvent::ObjectChanged(node)])
}

/// Set a node's local rotation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetRotationCommand {
    pub node: NodeId,
    pub old_rotation: Euler,
    pub new_rotation: Euler,
}

impl SetRotationCommand {
    pub fn new(
        state: &EditorState,
        node: NodeId,
        new_rotation: Euler,
    ) -> Result<Self, CommandError> {
        let current = state
            .graph
            .get(node)
            .ok_or(CommandError::NodeNotFound(node))?;
        Ok(Self {
            node,
            old_rotation: current.transform.rotation,
            new_rotation,
        })
    }

    /// Use an old value captured earlier instead of the one read at
    /// construction time.
    pub fn with_old_rotation(mut self, old: Euler) -> Self {
        self.old_rotation = old;
        self
    }

    pub(crate) fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        apply_rotation(state, self.node, self.new_rotation)
    }

    pub(crate) fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        apply_rotation(state, self.node, self.old_rotation)
    }
}

fn apply_rotation(state: &mut EditorState, node: NodeId, rotation: Euler) -> CommandResult {
    let Some(target) = state.graph.get_mut(node) else {
        log::warn!("set-rotation target {node} is gone; skipping");
        return Ok(Vec::new());
    };
    target.transform.rotation = rotation;
    state.graph.update_world_matrix(node);
    Ok(vec![EditorEvent::ObjectChanged(node)])
}

/// Set a node's local scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetScaleCommand {
    pub node: NodeId,
    pub old_scale: Vector3,
    pub new_scale: Vector3,
}

impl SetScaleCommand {
    pub fn new(
        state: &EditorState,
        node: NodeId,
        new_scale: Vector3,
    ) -> Result<Self, CommandError> {
        let current = state
            .graph
            .get(node)
            .ok_or(CommandError::NodeNotFound(node))?;
        Ok(Self {
            node,
            old_scale: current.transform.scale,
            new_scale,
        })
    }

    /// Use an old value captured earlier instead of the one read at
    /// construction time.
    pub fn with_old_scale(mut self, old: Vector3) -> Self {
        self.old_scale = old;
        self
    }

    pub(crate) fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        apply_scale(state, self.node, self.new_scale)
    }

    pub(crate) fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        apply_scale(state, self.node, self.old_scale)
    }
}

fn apply_scale(state: &mut EditorState, node: NodeId, scale: Vector3) -> CommandResult {
    let Some(target) = state.graph.get_mut(node) else {
        log::warn!("set-scale target {node} is gone; skipping");
        return Ok(Vec::new());
    };
    target.transform.scale = scale;
    state.graph.update_world_matrix(node);
    Ok(vec![EditorEvent::ObjectChanged(node)])
}
