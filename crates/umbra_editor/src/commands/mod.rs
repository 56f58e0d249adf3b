//! Command pattern implementation for undo/redo support.
//!
//! Every undoable document mutation is one of a closed set of command kinds.
//! A command captures its old state at construction time, applies its new
//! state in `execute`, restores the old state in `undo`, and serializes to a
//! tagged JSON record for session persistence and replay.
//!
//! Command bodies mutate the [`EditorState`] they are handed and return the
//! change notifications the mutation produced; dispatching those events is
//! the editor layer's job. A target that has vanished by execute/undo time
//! is a logged no-op, never an error.

mod object_commands;
mod property_commands;
mod transform_commands;

pub use object_commands::{AddObjectCommand, MoveObjectCommand, RemoveObjectCommand};
pub use property_commands::{NodeProperty, SetMeshCommand, SetValueCommand};
pub use transform_commands::{SetPositionCommand, SetRotationCommand, SetScaleCommand};

use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use umbra_scene::NodeId;

use crate::{EditorEvent, EditorState};

/// Result of a command body: the notifications the mutation produced.
pub type CommandResult = Result<Vec<EditorEvent>, CommandError>;

/// Caller bugs, as opposed to recoverable runtime conditions.
///
/// A stale target at execute/undo time is absorbed as a logged no-op; a
/// missing target at construction time, or a misuse of `update`, is one of
/// these.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The target did not exist when the command was constructed.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// `update` was called on a command kind that cannot coalesce.
    #[error("{0} commands are not updatable")]
    NotUpdatable(&'static str),

    /// Old and new values name different properties, or an update was fed a
    /// command of a different kind.
    #[error("old and new values name different properties")]
    PropertyMismatch,

    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

// Command ids are negative and decrease over time, so a smaller id always
// names a newer command. Deserialized histories push the watermark down so
// freshly constructed commands stay unique.
static NEXT_COMMAND_ID: AtomicI64 = AtomicI64::new(-1);

fn next_command_id() -> i64 {
    NEXT_COMMAND_ID.fetch_sub(1, Ordering::Relaxed)
}

pub(crate) fn claim_command_id(id: i64) {
    NEXT_COMMAND_ID.fetch_min(id - 1, Ordering::Relaxed);
}

/// One undoable mutation with its bookkeeping.
///
/// Serializes as `{ "id": ..., "name": ..., "type": ..., <kind fields> }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub kind: CommandKind,
}

impl Command {
    /// Wrap a kind with a fresh id and its default label.
    pub fn new(kind: impl Into<CommandKind>) -> Self {
        let kind = kind.into();
        Self {
            id: next_command_id(),
            name: kind.label().to_string(),
            kind,
        }
    }

    /// Override the user-facing label.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        self.kind.execute(state)
    }

    pub fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        self.kind.undo(state)
    }

    /// Merge a newer same-kind, same-target command into this one.
    ///
    /// Only the new state is taken; old state (and this command's id and
    /// name) stay as they were, so the eventual undo still restores the
    /// value from before the whole edit run.
    pub fn update(&mut self, newer: Command) -> Result<(), CommandError> {
        self.kind.merge(newer.kind)
    }
}

/// The closed set of command kinds.
///
/// The serde tag doubles as the persisted `type` field of the command
/// record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandKind {
    SetValue(SetValueCommand),
    SetMesh(SetMeshCommand),
    SetPosition(SetPositionCommand),
    SetRotation(SetRotationCommand),
    SetScale(SetScaleCommand),
    AddObject(AddObjectCommand),
    RemoveObject(RemoveObjectCommand),
    MoveObject(MoveObjectCommand),
    Multi(MultiCommand),
}

impl CommandKind {
    /// Default user-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            CommandKind::SetValue(c) => c.label(),
            CommandKind::SetMesh(_) => "Set Mesh",
            CommandKind::SetPosition(_) => "Set Position",
            CommandKind::SetRotation(_) => "Set Rotation",
            CommandKind::SetScale(_) => "Set Scale",
            CommandKind::AddObject(_) => "Add Object",
            CommandKind::RemoveObject(_) => "Remove Object",
            CommandKind::MoveObject(_) => "Move Object",
            CommandKind::Multi(_) => "Multiple Edits",
        }
    }

    /// Whether rapid same-target repeats may coalesce into one entry.
    pub fn updatable(&self) -> bool {
        matches!(
            self,
            CommandKind::SetValue(_)
                | CommandKind::SetMesh(_)
                | CommandKind::SetPosition(_)
                | CommandKind::SetRotation(_)
                | CommandKind::SetScale(_)
        )
    }

    /// The node this command mutates, when it has a single target.
    pub fn target(&self) -> Option<NodeId> {
        match self {
            CommandKind::SetValue(c) => Some(c.node),
            CommandKind::SetMesh(c) => Some(c.node),
            CommandKind::SetPosition(c) => Some(c.node),
            CommandKind::SetRotation(c) => Some(c.node),
            CommandKind::SetScale(c) => Some(c.node),
            CommandKind::AddObject(c) => Some(c.data.id),
            CommandKind::RemoveObject(c) => Some(c.node),
            CommandKind::MoveObject(c) => Some(c.node),
            CommandKind::Multi(_) => None,
        }
    }

    /// Whether `newer` edits the same thing as `self` and may be merged.
    pub fn can_coalesce(&self, newer: &CommandKind) -> bool {
        match (self, newer) {
            (CommandKind::SetValue(a), CommandKind::SetValue(b)) => {
                a.node == b.node && a.new.same_property(&b.new)
            }
            (CommandKind::SetMesh(a), CommandKind::SetMesh(b)) => a.node == b.node,
            (CommandKind::SetPosition(a), CommandKind::SetPosition(b)) => a.node == b.node,
            (CommandKind::SetRotation(a), CommandKind::SetRotation(b)) => a.node == b.node,
            (CommandKind::SetScale(a), CommandKind::SetScale(b)) => a.node == b.node,
            _ => false,
        }
    }

    pub(crate) fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        match self {
            CommandKind::SetValue(c) => c.execute(state),
            CommandKind::SetMesh(c) => c.execute(state),
            CommandKind::SetPosition(c) => c.execute(state),
            CommandKind::SetRotation(c) => c.execute(state),
            CommandKind::SetScale(c) => c.execute(state),
            CommandKind::AddObject(c) => c.execute(state),
            CommandKind::RemoveObject(c) => c.execute(state),
            CommandKind::MoveObject(c) => c.execute(state),
            CommandKind::Multi(c) => c.execute(state),
        }
    }

    pub(crate) fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        match self {
            CommandKind::SetValue(c) => c.undo(state),
            CommandKind::SetMesh(c) => c.undo(state),
            CommandKind::SetPosition(c) => c.undo(state),
            CommandKind::SetRotation(c) => c.undo(state),
            CommandKind::SetScale(c) => c.undo(state),
            CommandKind::AddObject(c) => c.undo(state),
            CommandKind::RemoveObject(c) => c.undo(state),
            CommandKind::MoveObject(c) => c.undo(state),
            CommandKind::Multi(c) => c.undo(state),
        }
    }

    pub(crate) fn merge(&mut self, newer: CommandKind) -> Result<(), CommandError> {
        if !self.updatable() {
            return Err(CommandError::NotUpdatable(self.label()));
        }
        match (self, newer) {
            (CommandKind::SetValue(a), CommandKind::SetValue(b)) => {
                if !a.new.same_property(&b.new) {
                    return Err(CommandError::PropertyMismatch);
                }
                a.new = b.new;
                Ok(())
            }
            (CommandKind::SetMesh(a), CommandKind::SetMesh(b)) => {
                a.new = b.new;
                Ok(())
            }
            (CommandKind::SetPosition(a), CommandKind::SetPosition(b)) => {
                a.new_position = b.new_position;
                Ok(())
            }
            (CommandKind::SetRotation(a), CommandKind::SetRotation(b)) => {
                a.new_rotation = b.new_rotation;
                Ok(())
            }
            (CommandKind::SetScale(a), CommandKind::SetScale(b)) => {
                a.new_scale = b.new_scale;
                Ok(())
            }
            _ => Err(CommandError::PropertyMismatch),
        }
    }
}

macro_rules! impl_from_kind {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for CommandKind {
            fn from(c: $ty) -> Self {
                CommandKind::$variant(c)
            }
        })*
    };
}

impl_from_kind! {
    SetValueCommand => SetValue,
    SetMeshCommand => SetMesh,
    SetPositionCommand => SetPosition,
    SetRotationCommand => SetRotation,
    SetScaleCommand => SetScale,
    AddObjectCommand => AddObject,
    RemoveObjectCommand => RemoveObject,
    MoveObjectCommand => MoveObject,
    MultiCommand => Multi,
}

/// A group of commands applied and undone as one history entry.
///
/// Execution is all-or-nothing: if a member fails, the already-applied
/// prefix is rolled back before the error surfaces, so the document is left
/// as it was.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiCommand {
    pub commands: Vec<Command>,
}

impl MultiCommand {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub(crate) fn execute(&mut self, state: &mut EditorState) -> CommandResult {
        let mut effects = Vec::new();
        for i in 0..self.commands.len() {
            match self.commands[i].execute(state) {
                Ok(ev) => effects.extend(ev),
                Err(e) => {
                    for done in self.commands[..i].iter_mut().rev() {
                        if let Err(rollback) = done.undo(state) {
                            log::warn!("rollback of '{}' failed: {}", done.name, rollback);
                        }
                    }
                    return Err(e);
                }
            }
        }
        Ok(effects)
    }

    pub(crate) fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        let mut effects = Vec::new();
        for i in (0..self.commands.len()).rev() {
            match self.commands[i].undo(state) {
                Ok(ev) => effects.extend(ev),
                Err(e) => {
                    for done in self.commands[i + 1..].iter_mut() {
                        if let Err(rollback) = done.execute(state) {
                            log::warn!("roll-forward of '{}' failed: {}", done.name, rollback);
                        }
                    }
                    return Err(e);
                }
            }
        }
        Ok(effects)
    }
}
