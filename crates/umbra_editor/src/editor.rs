//! Editor facade.
//!
//! The one entry point UI panels talk to: construct a command, hand it to
//! [`Editor::execute`], and re-render when the change notifications arrive.
//! The facade owns the document state, the history and the event
//! dispatcher, and wires them together: command bodies return the events
//! their mutation produced, and the facade dispatches them once the history
//! bookkeeping has committed.

use thiserror::Error;

use umbra_scene::{NodeId, SceneGraph, SceneNode};

use crate::{
    Command, CommandError, EditorEvent, EditorState, EventDispatcher, History, HistoryData,
    ListenerId,
};

/// Errors surfaced by facade-level operations.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("history record error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The editing session: document, history and change notifications.
pub struct Editor {
    state: EditorState,
    history: History,
    events: EventDispatcher,
}

impl Editor {
    pub fn new() -> Self {
        Self::with_scene(SceneGraph::new())
    }

    pub fn with_scene(graph: SceneGraph) -> Self {
        Self {
            state: EditorState::with_graph(graph),
            history: History::new(),
            events: EventDispatcher::new(),
        }
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.state.graph
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Command constructors read old state through this.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Resolve a node by its unique identifier.
    pub fn object_by_uuid(&self, id: NodeId) -> Option<&SceneNode> {
        self.state.graph.get(id)
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.state.selection.primary()
    }

    /// Replace the selection; `None` clears it. Selecting an unknown node is
    /// a logged no-op.
    pub fn select(&mut self, target: Option<NodeId>) {
        if let Some(id) = target {
            if !self.state.graph.contains(id) {
                log::warn!("cannot select unknown node {id}");
                return;
            }
        }
        self.state.selection.select(target);
        self.events.emit(&EditorEvent::SelectionChanged(target));
    }

    /// Run a command, record it and dispatch its change notifications.
    pub fn execute(&mut self, cmd: Command) -> Result<(), CommandError> {
        let effects = self.history.execute(&mut self.state, cmd)?;
        self.events.emit_all(&effects);
        Ok(())
    }

    pub fn undo(&mut self) -> Result<(), CommandError> {
        let effects = self.history.undo(&mut self.state)?;
        self.events.emit_all(&effects);
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), CommandError> {
        let effects = self.history.redo(&mut self.state)?;
        self.events.emit_all(&effects);
        Ok(())
    }

    /// Jump to an arbitrary history entry (see [`History::go_to_state`]).
    pub fn go_to_state(&mut self, id: i64) -> Result<(), CommandError> {
        let effects = self.history.go_to_state(&mut self.state, id)?;
        self.events.emit_all(&effects);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.history.undo_label()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.history.redo_label()
    }

    /// Open the coalescing bracket for a drag-style edit run.
    pub fn begin_gesture(&mut self) {
        self.history.begin_gesture();
    }

    pub fn end_gesture(&mut self) {
        self.history.end_gesture();
    }

    /// Drop all history. The caller confirms with the user first; this is
    /// irreversible.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.events.emit(&EditorEvent::HistoryChanged);
    }

    /// Replace the document, starting a fresh edit session.
    pub fn set_scene(&mut self, graph: SceneGraph) {
        self.state = EditorState::with_graph(graph);
        self.history.clear();
        self.events.emit(&EditorEvent::SceneGraphChanged);
        self.events.emit(&EditorEvent::HistoryChanged);
    }

    pub fn subscribe(&mut self, listener: impl Fn(&EditorEvent) + 'static) -> ListenerId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.events.unsubscribe(id);
    }

    /// Serialize the history record for persistence alongside the document.
    pub fn history_to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.history.to_data())
    }

    /// Restore the stacks from a record without executing anything (the
    /// saved document already reflects them).
    pub fn load_history_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let data: HistoryData = serde_json::from_str(json)?;
        self.history = History::from_data(data);
        self.events.emit(&EditorEvent::HistoryChanged);
        Ok(())
    }

    /// Re-execute a saved session against the current document (loaded from
    /// its pre-session base), then restore the stacks from the record.
    pub fn replay_history_json(&mut self, json: &str) -> Result<(), EditorError> {
        let data: HistoryData = serde_json::from_str(json)?;
        let effects = self.history.replay(&mut self.state, data)?;
        self.events.emit_all(&effects);
        Ok(())
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
