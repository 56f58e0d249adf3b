//! Mesh sub-object attached to scene nodes.

use serde::{Deserialize, Serialize};

/// Primitive mesh shapes the editor can author.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeshKind {
    Cube,
    Sphere,
    Cylinder,
    Torus,
    Plane,
}

impl MeshKind {
    pub fn name(&self) -> &'static str {
        match self {
            MeshKind::Cube => "Cube",
            MeshKind::Sphere => "Sphere",
            MeshKind::Cylinder => "Cylinder",
            MeshKind::Torus => "Torus",
            MeshKind::Plane => "Plane",
        }
    }

    pub fn all() -> &'static [MeshKind] {
        &[
            MeshKind::Cube,
            MeshKind::Sphere,
            MeshKind::Cylinder,
            MeshKind::Torus,
            MeshKind::Plane,
        ]
    }
}

/// The replaceable mesh/material sub-object of a node.
///
/// Commands swap this wholesale rather than editing it field by field, so it
/// doubles as its own undo snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub kind: MeshKind,
    pub color: [f32; 3],
}

impl MeshData {
    pub fn new(kind: MeshKind) -> Self {
        Self {
            kind,
            color: [0.8, 0.8, 0.8],
        }
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }
}
