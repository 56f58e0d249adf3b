//! Scene-graph document model for the Umbra editor.
//!
//! A scene is a tree of nodes addressed by UUID through an explicit lookup
//! table. Commands never hold node references across calls; they store
//! `NodeId`s and resolve them against the [`SceneGraph`] at execute time.
//! Nodes carry their own serialization contract ([`NodeData`]), which is also
//! what structural commands embed as their undo snapshot.

mod error;
mod graph;
mod mesh;
mod node;

pub use error::SceneError;
pub use graph::{SceneData, SceneGraph};
pub use mesh::{MeshData, MeshKind};
pub use node::{NodeData, NodeId, SceneNode, Transform};
