//! Editable document state.

use umbra_scene::SceneGraph;

use crate::SelectionManager;

/// The state a command mutates: the scene graph plus selection.
///
/// This is the explicit context handed to every command body. It
/// deliberately does not contain the [`crate::History`], so a command cannot
/// recursively record new history entries while one is executing.
pub struct EditorState {
    pub graph: SceneGraph,
    pub selection: SelectionManager,
}

impl EditorState {
    pub fn new() -> Self {
        Self::with_graph(SceneGraph::new())
    }

    pub fn with_graph(graph: SceneGraph) -> Self {
        Self {
            graph,
            selection: SelectionManager::new(),
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}
