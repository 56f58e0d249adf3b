//! Undo/redo history.
//!
//! Two stacks of executed commands. Executing a new command clears the redo
//! stack; undo moves the top entry across; redo moves it back by re-running
//! `execute`. Stack mutations commit only after the command body succeeds,
//! so a failing command leaves both stacks exactly as they were.
//!
//! Rapid-fire edits (a slider drag) coalesce into a single entry while an
//! explicit gesture bracket is open: the newest command's new state is
//! merged into the entry at the top of the stack, whose old state is left
//! untouched. The bracket replaces the wall-clock window the web editors in
//! this family use, so a pause mid-drag cannot split an edit in two.

use serde::{Deserialize, Serialize};

use crate::commands::claim_command_id;
use crate::{Command, CommandResult, EditorEvent, EditorState};

/// Serialized form of the history: both stacks, oldest first.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HistoryData {
    pub undos: Vec<Command>,
    pub redos: Vec<Command>,
}

/// Undo/redo stack pair for one document.
pub struct History {
    undos: Vec<Command>,
    redos: Vec<Command>,
    /// When false, `execute` applies commands without recording them.
    /// Replay uses this; callers can too (e.g. scripted imports).
    enabled: bool,
    /// Open coalescing bracket; see [`History::begin_gesture`].
    gesture_open: bool,
    limit: usize,
}

impl History {
    /// Default maximum number of undo entries.
    pub const DEFAULT_LIMIT: usize = 100;

    pub fn new() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            undos: Vec::new(),
            redos: Vec::new(),
            enabled: true,
            gesture_open: false,
            limit,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undos.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redos.is_empty()
    }

    /// Label of the next command to undo, for menu items.
    pub fn undo_label(&self) -> Option<&str> {
        self.undos.last().map(|c| c.name.as_str())
    }

    /// Label of the next command to redo.
    pub fn redo_label(&self) -> Option<&str> {
        self.redos.last().map(|c| c.name.as_str())
    }

    pub fn undo_count(&self) -> usize {
        self.undos.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redos.len()
    }

    /// Suppress or resume recording. While disabled, `execute` still applies
    /// commands but the stacks stay untouched.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Open the coalescing bracket. Until [`Self::end_gesture`], consecutive
    /// updatable commands against the same target merge into one entry.
    pub fn begin_gesture(&mut self) {
        if self.gesture_open {
            log::warn!("beginning a gesture while one is already open");
        }
        self.gesture_open = true;
    }

    /// Close the coalescing bracket.
    pub fn end_gesture(&mut self) {
        self.gesture_open = false;
    }

    pub fn in_gesture(&self) -> bool {
        self.gesture_open
    }

    /// Run a command and record it.
    ///
    /// The command body runs first; only on success is the entry pushed (or
    /// merged into the top entry when coalescing applies) and the redo stack
    /// cleared.
    pub fn execute(&mut self, state: &mut EditorState, mut cmd: Command) -> CommandResult {
        if !self.enabled {
            return cmd.execute(state);
        }

        let coalesce = self.gesture_open
            && cmd.kind.updatable()
            && self
                .undos
                .last()
                .is_some_and(|top| top.kind.can_coalesce(&cmd.kind));

        let mut effects = cmd.execute(state)?;

        if coalesce {
            if let Some(top) = self.undos.last_mut() {
                top.update(cmd)?;
            }
        } else {
            self.undos.push(cmd);
            if self.undos.len() > self.limit {
                self.undos.remove(0);
            }
        }
        self.redos.clear();

        effects.push(EditorEvent::HistoryChanged);
        Ok(effects)
    }

    /// Undo the most recent command. A no-op on an empty stack.
    pub fn undo(&mut self, state: &mut EditorState) -> CommandResult {
        let Some(top) = self.undos.last_mut() else {
            return Ok(Vec::new());
        };
        let mut effects = top.undo(state)?;
        if let Some(cmd) = self.undos.pop() {
            self.redos.push(cmd);
        }
        effects.push(EditorEvent::HistoryChanged);
        Ok(effects)
    }

    /// Re-apply the most recently undone command. A no-op on an empty stack.
    pub fn redo(&mut self, state: &mut EditorState) -> CommandResult {
        let Some(top) = self.redos.last_mut() else {
            return Ok(Vec::new());
        };
        let mut effects = top.execute(state)?;
        if let Some(cmd) = self.redos.pop() {
            self.undos.push(cmd);
        }
        effects.push(EditorEvent::HistoryChanged);
        Ok(effects)
    }

    /// Undo or redo until the command with the given id is the last applied
    /// one. Ids decrease over time, so a smaller id names a newer command;
    /// `go_to_state(0)` rolls everything back.
    pub fn go_to_state(&mut self, state: &mut EditorState, id: i64) -> CommandResult {
        let mut effects = Vec::new();
        loop {
            let top = self.undos.last().map(|c| c.id);
            let done = match top {
                Some(t) => t == id,
                None => id == 0 || self.redos.is_empty(),
            };
            if done {
                break;
            }
            let target_is_newer = top.map_or(true, |t| id < t);
            if target_is_newer {
                if self.redos.is_empty() {
                    break;
                }
                effects.extend(self.redo(state)?);
            } else {
                effects.extend(self.undo(state)?);
            }
        }
        Ok(effects)
    }

    /// Drop all history. Irreversible; callers confirm with the user first.
    pub fn clear(&mut self) {
        self.undos.clear();
        self.redos.clear();
        self.gesture_open = false;
    }

    /// Snapshot both stacks for persistence.
    pub fn to_data(&self) -> HistoryData {
        HistoryData {
            undos: self.undos.clone(),
            redos: self.redos.clone(),
        }
    }

    /// Restore stacks from a snapshot without executing anything (the saved
    /// document already reflects them). Pushes the command-id watermark down
    /// so fresh commands stay unique.
    pub fn from_data(data: HistoryData) -> Self {
        for cmd in data.undos.iter().chain(data.redos.iter()) {
            claim_command_id(cmd.id);
        }
        Self {
            undos: data.undos,
            redos: data.redos,
            enabled: true,
            gesture_open: false,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    /// Re-execute a serialized session against a freshly loaded base
    /// document, then restore the stacks from the record.
    ///
    /// Commands run oldest-first with recording suppressed. A command that
    /// fails (its target cannot be resolved or reconstructed) is skipped
    /// with a warning rather than aborting the replay.
    pub fn replay(&mut self, state: &mut EditorState, data: HistoryData) -> CommandResult {
        let mut effects = Vec::new();
        self.enabled = false;
        for cmd in data.undos.iter().cloned() {
            let name = cmd.name.clone();
            match self.execute(state, cmd) {
                Ok(ev) => effects.extend(ev),
                Err(e) => log::warn!("skipping '{name}' during replay: {e}"),
            }
        }
        self.enabled = true;

        *self = Self::from_data(data);
        effects.push(EditorEvent::HistoryChanged);
        Ok(effects)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
