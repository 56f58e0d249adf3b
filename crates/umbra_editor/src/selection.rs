//! Selection tracking.

use umbra_scene::NodeId;

/// Tracks which nodes are selected.
///
/// The primary entry is what property panels edit and what structural
/// commands consult when deciding whether a removal disturbs the selection.
#[derive(Clone, Debug, Default)]
pub struct SelectionManager {
    selected: Vec<NodeId>,
    primary: Option<NodeId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The primary (most recently selected) node.
    pub fn primary(&self) -> Option<NodeId> {
        self.primary
    }

    pub fn selected(&self) -> &[NodeId] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected.contains(&id)
    }

    /// Replace the selection; `None` clears it.
    pub fn select(&mut self, target: Option<NodeId>) {
        self.selected.clear();
        if let Some(id) = target {
            self.selected.push(id);
        }
        self.primary = target;
    }

    /// Add a node to the selection and make it primary.
    pub fn add(&mut self, id: NodeId) {
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
        self.primary = Some(id);
    }

    /// Drop a node from the selection (e.g. when it is removed from the
    /// document).
    pub fn remove_node(&mut self, id: NodeId) {
        self.selected.retain(|&s| s != id);
        if self.primary == Some(id) {
            self.primary = self.selected.last().copied();
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.primary = None;
    }
}
