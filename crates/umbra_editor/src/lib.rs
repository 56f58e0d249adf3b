//! Umbra editor core: an undo/redo command history over a scene document.
//!
//! ## Architecture
//!
//! ```text
//! UI panel → Command → Editor::execute → History → EditorState mutation
//!                                            ↓
//!                                   EditorEvent dispatch → panels re-render
//! ```
//!
//! Every document mutation is a [`Command`]: one of a closed set of
//! reversible, serializable operation kinds. The [`History`] owns the
//! undo/redo stacks and the coalescing of rapid-fire edits; the [`Editor`]
//! facade wires document state, history and change notifications together.
//! Commands reference their targets by id and resolve them through the
//! scene graph at execute time, so a whole session can be serialized to
//! JSON and replayed against a freshly loaded document.
//!
//! Everything here is single-threaded and synchronous: commands run on the
//! caller's thread in direct response to input events, and notifications
//! are delivered before the triggering call returns.

pub mod commands;
mod editor;
mod events;
mod history;
mod selection;
mod state;

pub use commands::{
    AddObjectCommand, Command, CommandError, CommandKind, CommandResult, MoveObjectCommand,
    MultiCommand, NodeProperty, RemoveObjectCommand, SetMeshCommand, SetPositionCommand,
    SetRotationCommand, SetScaleCommand, SetValueCommand,
};
pub use editor::{Editor, EditorError};
pub use events::{EditorEvent, EventDispatcher, ListenerId};
pub use history::{History, HistoryData};
pub use selection::SelectionManager;
pub use state::EditorState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
