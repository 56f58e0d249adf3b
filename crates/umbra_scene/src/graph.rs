//! The scene graph: an id-addressed node tree.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use umbra_math::Matrix4;

use crate::{NodeData, NodeId, SceneError, SceneNode};

/// Serialized form of a whole document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneData {
    pub name: String,
    pub root: NodeData,
}

/// The scene-graph document.
///
/// Nodes live in a lookup table keyed by [`NodeId`]; the tree structure is
/// expressed through each node's `parent` and ordered `children` ids, which
/// only this type mutates. Sibling order is significant and preserved exactly
/// across remove/undo cycles.
pub struct SceneGraph {
    pub name: String,
    nodes: HashMap<NodeId, SceneNode>,
    root: NodeId,
}

impl SceneGraph {
    /// Create an empty document with a fresh root node.
    pub fn new() -> Self {
        let root = SceneNode::new("Scene");
        let root_id = root.id;
        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);
        Self {
            name: "Untitled Scene".to_string(),
            nodes,
            root: root_id,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Number of nodes in the document, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// A node's parent and sibling index, if it has a parent.
    pub fn location(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.nodes.get(&id)?.parent?;
        let index = self
            .nodes
            .get(&parent)?
            .children
            .iter()
            .position(|&c| c == id)?;
        Some((parent, index))
    }

    /// Whether `ancestor` is on `node`'s path to the root.
    pub fn is_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        while let Some(parent) = self.nodes.get(&node).and_then(|n| n.parent) {
            if parent == ancestor {
                return true;
            }
            node = parent;
        }
        false
    }

    /// Append a single fresh node under `parent`.
    pub fn add_node(&mut self, parent: NodeId, mut node: SceneNode) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        if self.nodes.contains_key(&node.id) {
            return Err(SceneError::DuplicateNode(node.id));
        }

        let id = node.id;
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.insert(id, node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        self.update_world_matrix(id);
        Ok(id)
    }

    /// Insert a serialized subtree under `parent` at the given sibling index.
    ///
    /// `None` or an out-of-range index appends. All ids in the snapshot must
    /// be absent from the document.
    pub fn add_data(
        &mut self,
        parent: NodeId,
        index: Option<usize>,
        data: &NodeData,
    ) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        self.check_insertable(data)?;

        self.materialize(Some(parent), data);
        if let Some(p) = self.nodes.get_mut(&parent) {
            let at = index.unwrap_or(p.children.len()).min(p.children.len());
            p.children.insert(at, data.id);
        }
        self.update_world_matrix(data.id);
        Ok(data.id)
    }

    /// Remove a node and its descendants, returning the subtree snapshot.
    pub fn remove_node(&mut self, id: NodeId) -> Result<NodeData, SceneError> {
        if id == self.root {
            return Err(SceneError::RootImmutable);
        }
        let data = self.subtree_data(id).ok_or(SceneError::UnknownNode(id))?;

        if let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|&c| c != id);
            }
        }
        self.discard_subtree(id);
        Ok(data)
    }

    /// Reparent a node, inserting at the given sibling index (append if
    /// `None` or out of range).
    pub fn move_node(
        &mut self,
        id: NodeId,
        new_parent: NodeId,
        index: Option<usize>,
    ) -> Result<(), SceneError> {
        if id == self.root {
            return Err(SceneError::RootImmutable);
        }
        if !self.nodes.contains_key(&id) {
            return Err(SceneError::UnknownNode(id));
        }
        if !self.nodes.contains_key(&new_parent) {
            return Err(SceneError::UnknownNode(new_parent));
        }
        if id == new_parent || self.is_ancestor(id, new_parent) {
            return Err(SceneError::CycleDetected {
                node: id,
                target: new_parent,
            });
        }

        if let Some((old_parent, _)) = self.location(id) {
            if let Some(p) = self.nodes.get_mut(&old_parent) {
                p.children.retain(|&c| c != id);
            }
        }
        if let Some(p) = self.nodes.get_mut(&new_parent) {
            let at = index.unwrap_or(p.children.len()).min(p.children.len());
            p.children.insert(at, id);
        }
        if let Some(n) = self.nodes.get_mut(&id) {
            n.parent = Some(new_parent);
        }
        self.update_world_matrix(id);
        Ok(())
    }

    /// Snapshot a subtree without removing it.
    pub fn subtree_data(&self, id: NodeId) -> Option<NodeData> {
        let node = self.nodes.get(&id)?;
        let mut data = NodeData::from_node(node);
        data.children = node
            .children
            .iter()
            .filter_map(|&c| self.subtree_data(c))
            .collect();
        Some(data)
    }

    /// Recompute world matrices for a node and all its descendants.
    ///
    /// Transform mutations are not visible downstream until this runs; the
    /// command layer calls it as part of every transform change.
    pub fn update_world_matrix(&mut self, id: NodeId) {
        let parent_world = self
            .nodes
            .get(&id)
            .and_then(|n| n.parent)
            .and_then(|p| self.nodes.get(&p))
            .map(|p| p.world_matrix)
            .unwrap_or(Matrix4::IDENTITY);
        self.update_world_recursive(id, parent_world);
    }

    /// Whole-document serialization.
    pub fn to_data(&self) -> SceneData {
        let root = self
            .subtree_data(self.root)
            .unwrap_or_else(|| NodeData::from_node(&SceneNode::new("Scene")));
        SceneData {
            name: self.name.clone(),
            root,
        }
    }

    /// Rebuild a document from its serialized form.
    pub fn from_data(data: &SceneData) -> Result<Self, SceneError> {
        let mut graph = Self {
            name: data.name.clone(),
            nodes: HashMap::new(),
            root: data.root.id,
        };
        graph.check_insertable(&data.root)?;
        graph.materialize(None, &data.root);
        graph.update_world_matrix(data.root.id);
        Ok(graph)
    }

    /// Save the document as JSON.
    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        let json = serde_json::to_string_pretty(&self.to_data())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        let data: SceneData = serde_json::from_str(&content)?;
        Self::from_data(&data)
    }

    fn update_world_recursive(&mut self, id: NodeId, parent_world: Matrix4) {
        let (world, children) = match self.nodes.get_mut(&id) {
            Some(node) => {
                node.world_matrix = parent_world.multiply(&node.transform.local_matrix());
                (node.world_matrix, node.children.clone())
            }
            None => return,
        };
        for child in children {
            self.update_world_recursive(child, world);
        }
    }

    fn materialize(&mut self, parent: Option<NodeId>, data: &NodeData) {
        let mut node = data.to_node();
        node.parent = parent;
        node.children = data.children.iter().map(|c| c.id).collect();
        self.nodes.insert(data.id, node);
        for child in &data.children {
            self.materialize(Some(data.id), child);
        }
    }

    fn discard_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.discard_subtree(child);
            }
        }
    }

    fn check_insertable(&self, data: &NodeData) -> Result<(), SceneError> {
        let mut seen = HashSet::new();
        let mut stack = vec![data];
        while let Some(d) = stack.pop() {
            if self.nodes.contains_key(&d.id) || !seen.insert(d.id) {
                return Err(SceneError::DuplicateNode(d.id));
            }
            stack.extend(d.children.iter());
        }
        Ok(())
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_math::Vector3;

    use crate::Transform;

    fn graph_with_children(names: &[&str]) -> (SceneGraph, Vec<NodeId>) {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let ids = names
            .iter()
            .map(|&n| graph.add_node(root, SceneNode::new(n)).unwrap())
            .collect();
        (graph, ids)
    }

    #[test]
    fn test_add_preserves_sibling_order() {
        let (graph, ids) = graph_with_children(&["a", "b", "c"]);
        let root = graph.root();
        assert_eq!(graph.get(root).unwrap().children, ids);
        assert_eq!(graph.location(ids[1]), Some((root, 1)));
    }

    #[test]
    fn test_remove_and_reinsert_at_index() {
        let (mut graph, ids) = graph_with_children(&["a", "b", "c"]);
        let root = graph.root();

        let data = graph.remove_node(ids[1]).unwrap();
        assert_eq!(graph.get(root).unwrap().children, vec![ids[0], ids[2]]);
        assert!(!graph.contains(ids[1]));

        graph.add_data(root, Some(1), &data).unwrap();
        assert_eq!(graph.get(root).unwrap().children, ids);
    }

    #[test]
    fn test_remove_takes_descendants() {
        let (mut graph, ids) = graph_with_children(&["a"]);
        let child = graph.add_node(ids[0], SceneNode::new("leaf")).unwrap();

        let data = graph.remove_node(ids[0]).unwrap();
        assert_eq!(data.node_count(), 2);
        assert!(!graph.contains(child));
    }

    #[test]
    fn test_move_detects_cycles() {
        let (mut graph, ids) = graph_with_children(&["a"]);
        let child = graph.add_node(ids[0], SceneNode::new("leaf")).unwrap();

        let err = graph.move_node(ids[0], child, None).unwrap_err();
        assert!(matches!(err, SceneError::CycleDetected { .. }));
    }

    #[test]
    fn test_root_is_immutable() {
        let (mut graph, ids) = graph_with_children(&["a"]);
        assert!(matches!(
            graph.remove_node(graph.root()),
            Err(SceneError::RootImmutable)
        ));
        assert!(matches!(
            graph.move_node(graph.root(), ids[0], None),
            Err(SceneError::RootImmutable)
        ));
    }

    #[test]
    fn test_world_matrix_propagates_to_children() {
        let (mut graph, ids) = graph_with_children(&["a"]);
        let child = graph
            .add_node(
                ids[0],
                SceneNode::new("leaf").with_transform(
                    Transform::new().with_position(Vector3::new(0.0, 1.0, 0.0)),
                ),
            )
            .unwrap();

        if let Some(node) = graph.get_mut(ids[0]) {
            node.transform.position = Vector3::new(5.0, 0.0, 0.0);
        }
        graph.update_world_matrix(ids[0]);

        let world = graph.get(child).unwrap().world_matrix;
        assert_eq!(world.translation(), Vector3::new(5.0, 1.0, 0.0));
    }

    #[test]
    fn test_save_load_round_trip() {
        let (mut graph, ids) = graph_with_children(&["a", "b"]);
        graph.add_node(ids[0], SceneNode::new("leaf")).unwrap();
        graph.name = "fixture".to_string();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        graph.save(&path).unwrap();

        let loaded = SceneGraph::load(&path).unwrap();
        assert_eq!(loaded.name, "fixture");
        assert_eq!(loaded.node_count(), graph.node_count());
        assert_eq!(loaded.to_data().root, graph.to_data().root);
    }
}
