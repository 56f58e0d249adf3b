//! Minimal 3D math for the Umbra scene document.
//!
//! Only the types the document model and command records actually carry:
//! vectors, Euler angles, quaternions and 4x4 matrices. Everything is plain
//! `f32`, column-major, and serde-serializable, since transform state travels
//! through command JSON records.

mod euler;
mod matrix;
mod quaternion;
mod vector;

pub use euler::Euler;
pub use matrix::Matrix4;
pub use quaternion::Quaternion;
pub use vector::Vector3;
