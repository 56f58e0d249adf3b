//! Property-set commands: single named properties and the mesh sub-object.

use serde::{Deserialize, Serialize};

use umbra_scene::{MeshData, NodeId};

use crate::{CommandError, CommandResult, EditorEvent, EditorState};

/// A settable node property together with its value.
///
/// Old and new values of a [`SetValueCommand`] always name the same
/// property; the constructor enforces this by deriving the old value from
/// the new one's variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeProperty {
    Name(String),
    Visible(bool),
    Locked(bool),
}

impl NodeProperty {
    /// The property this value belongs to, as a stable field name.
    pub fn field(&self) -> &'static str {
        match self {
            NodeProperty::Name(_) => "name",
            NodeProperty::Visible(_) => "visible",
            NodeProperty::Locked(_) => "locked",
        }
    }

    pub fn same_property(&self, other: &NodeProperty) -> bool {
        self.field() == other.field()
    }
}

/// Set a single named property of a node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetValueCommand {
    pub node: NodeId,
    pub old: NodeProperty,
    pub new: NodeProperty,
}

impl SetValueCommand {
    /// Capture the node's current value for the property `new` names.
    pub fn new(
        state: &EditorState,
        node: NodeId,
        new: NodeProperty,
    ) -> Result<Self, CommandError> {
        let current = state
            .graph
            .get(node)
            .ok_or(CommandError::NodeNotFound(node))?;
        let old = match &new {
            NodeProperty::Name(_) => NodeProperty::Name(current.name.clone()),
            NodeProperty::Visible(_) => NodeProperty::Visible(current.visible),
            NodeProperty::Locked(_) => NodeProperty::Locked(current.locked),
        };
        Ok(Self { node, old, new })
    }

    pub fn label(&self) -> &'static str {
        match self.new {
            NodeProperty::Name(_) => "Rename",
            NodeProperty::Visible(_) => "Set Visibility",
            NodeProperty::Locked(_) => "Set Locked",
        }
    }

    pub(crate) fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        apply_property(state, self.node, &self.new)
    }

    pub(crate) fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        apply_property(state, self.node, &self.old)
    }
}

fn apply_property(state: &mut EditorState, node: NodeId, value: &NodeProperty) -> CommandResult {
    let Some(target) = state.graph.get_mut(node) else {
        log::warn!("set-value target {node} is gone; skipping");
        return Ok(Vec::new());
    };
    match value {
        NodeProperty::Name(v) => target.name = v.clone(),
        NodeProperty::Visible(v) => target.visible = *v,
        NodeProperty::Locked(v) => target.locked = *v,
    }
    Ok(vec![EditorEvent::ObjectChanged(node)])
}

/// Swap a node's mesh sub-object wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetMeshCommand {
    pub node: NodeId,
    pub old: Option<MeshData>,
    pub new: Option<MeshData>,
}

impl SetMeshCommand {
    /// Capture the node's current mesh as the old state.
    pub fn new(
        state: &EditorState,
        node: NodeId,
        new: Option<MeshData>,
    ) -> Result<Self, CommandError> {
        let current = state
            .graph
            .get(node)
            .ok_or(CommandError::NodeNotFound(node))?;
        Ok(Self {
            node,
            old: current.mesh,
            new,
        })
    }

    pub(crate) fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        apply_mesh(state, self.node, self.new)
    }

    pub(crate) fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        apply_mesh(state, self.node, self.old)
    }
}

fn apply_mesh(state: &mut EditorState, node: NodeId, mesh: Option<MeshData>) -> CommandResult {
    let Some(target) = state.graph.get_mut(node) else {
        log::warn!("set-mesh target {node} is gone; skipping");
        return Ok(Vec::new());
    };
    target.mesh = mesh;
    Ok(vec![EditorEvent::ObjectChanged(node)])
}
