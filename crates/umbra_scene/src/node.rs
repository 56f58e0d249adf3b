//! Scene nodes and their serialized form.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use umbra_math::{Euler, Matrix4, Quaternion, Vector3};

use crate::MeshData;

/// Process-unique node identifier.
///
/// Stable across save/load; commands persist these in their JSON records and
/// resolve them through the graph's lookup table at execute time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Local transform of a node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vector3,
    pub rotation: Euler,
    pub scale: Vector3,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vector3::ZERO,
            rotation: Euler::ZERO,
            scale: Vector3::ONE,
        }
    }

    pub fn with_position(mut self, position: Vector3) -> Self {
        self.position = position;
        self
    }

    /// The local matrix composed from position, rotation and scale.
    pub fn local_matrix(&self) -> Matrix4 {
        Matrix4::compose(
            self.position,
            Quaternion::from_euler(self.rotation),
            self.scale,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// A node in the scene graph.
///
/// `world_matrix` is derived state; the graph recomputes it whenever the
/// node's transform or ancestry changes. Parent/children links are stored as
/// ids and maintained by [`crate::SceneGraph`] only.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub transform: Transform,
    pub world_matrix: Matrix4,
    pub mesh: Option<MeshData>,
    pub visible: bool,
    pub locked: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            transform: Transform::new(),
            world_matrix: Matrix4::IDENTITY,
            mesh: None,
            visible: true,
            locked: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_mesh(mut self, mesh: MeshData) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Serialized snapshot of a node subtree.
///
/// This is the node's own serialization contract: the scene file, structural
/// command records and clipboard-style copies all carry it. World matrices
/// are omitted and recomputed on insert.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: NodeId,
    pub name: String,
    pub transform: Transform,
    #[serde(default)]
    pub mesh: Option<MeshData>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub children: Vec<NodeData>,
}

fn default_visible() -> bool {
    true
}

impl NodeData {
    /// Snapshot a single node (children filled in by the graph walk).
    pub fn from_node(node: &SceneNode) -> Self {
        Self {
            id: node.id,
            name: node.name.clone(),
            transform: node.transform,
            mesh: node.mesh,
            visible: node.visible,
            locked: node.locked,
            children: Vec::new(),
        }
    }

    /// Rebuild a live node from the snapshot (without children links).
    pub fn to_node(&self) -> SceneNode {
        SceneNode {
            id: self.id,
            name: self.name.clone(),
            transform: self.transform,
            world_matrix: Matrix4::IDENTITY,
            mesh: self.mesh,
            visible: self.visible,
            locked: self.locked,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Number of nodes in the snapshot, this node included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeData::node_count).sum::<usize>()
    }
}
