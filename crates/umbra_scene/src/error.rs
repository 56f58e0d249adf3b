//! Scene document error types.

use thiserror::Error;

use crate::NodeId;

/// Errors raised by scene-graph operations.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The referenced node is not in the document.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// A node with this id is already in the document.
    #[error("node already present: {0}")]
    DuplicateNode(NodeId),

    /// The scene root cannot be removed or reparented.
    #[error("the scene root cannot be removed or reparented")]
    RootImmutable,

    /// Reparenting would make a node its own ancestor.
    #[error("moving {node} under {target} would create a cycle")]
    CycleDetected { node: NodeId, target: NodeId },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("scene parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
