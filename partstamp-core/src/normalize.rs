/// Mesh normalization: fit an arbitrarily sized/offset mesh into the
/// canonical view volume.
use nalgebra::Point3;
use thiserror::Error;

use crate::geometry::Mesh;

/// Meshes whose bounding box cannot produce a finite scale factor.
#[derive(Debug, Error, PartialEq)]
pub enum DegenerateMeshError {
    #[error("mesh contains no triangles")]
    Empty,
    #[error("mesh bounding box has zero extent on every axis")]
    ZeroExtent,
}

/// Bounding-box center and uniform scale derived once per loaded mesh.
///
/// `scale` maps the mesh's largest extent onto a length of 2, the span of
/// the canonical view volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationParams {
    pub center: Point3<f32>,
    pub scale: f32,
}

impl NormalizationParams {
    /// Parameters that leave a mesh untouched, for meshes already in the
    /// canonical frame.
    pub fn identity() -> Self {
        Self {
            center: Point3::origin(),
            scale: 1.0,
        }
    }
}

/// Compute centering and scaling parameters for a mesh.
///
/// Pure function of the mesh: `center` is the midpoint of the axis-aligned
/// bounding box, `scale = 2 / max_extent`. Must be re-run when a new file
/// is loaded, never per frame.
pub fn normalize(mesh: &Mesh) -> Result<NormalizationParams, DegenerateMeshError> {
    let (min, max) = mesh.bounds().ok_or(DegenerateMeshError::Empty)?;
    let extent = max - min;
    let max_extent = extent.x.max(extent.y).max(extent.z);
    if max_extent <= 0.0 {
        return Err(DegenerateMeshError::ZeroExtent);
    }
    let center = Point3::from((min.coords + max.coords) / 2.0);
    Ok(NormalizationParams {
        center,
        scale: 2.0 / max_extent,
    })
}
