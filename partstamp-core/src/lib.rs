/// Partstamp Core Library - Mesh picking engine
///
/// This library provides the stateless core of the STL viewer: STL
/// parsing, mesh normalization, the camera transform shared by rendering
/// and picking, and screen-to-surface picking (unprojection plus
/// Möller–Trumbore ray/triangle intersection).

pub mod geometry;
pub mod normalize;
pub mod pick;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use geometry::{Mesh, Triangle};
pub use normalize::{normalize, DegenerateMeshError, NormalizationParams};
pub use pick::{intersect_triangle, pick, pick_nearest, unproject, Hit, Ray};
pub use transform::CameraTransform;
