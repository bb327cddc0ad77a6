/// Geometry primitives for mesh viewing and picking
use nalgebra::{Point3, Vector3};

/// A triangle face defined by three vertices and a facet normal.
///
/// The normal comes from the STL facet record (or is derived from the
/// vertex order) and is used for shading only; picking ignores winding.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub vertices: [Point3<f32>; 3],
    pub normal: Vector3<f32>,
}

impl Triangle {
    /// Build a triangle, deriving the normal from the vertex order.
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        let normal = geometric_normal(&v0, &v1, &v2);
        Self {
            vertices: [v0, v1, v2],
            normal,
        }
    }

    /// Build a triangle with an explicit facet normal (as read from a file).
    pub fn with_normal(
        v0: Point3<f32>,
        v1: Point3<f32>,
        v2: Point3<f32>,
        normal: Vector3<f32>,
    ) -> Self {
        Self {
            vertices: [v0, v1, v2],
            normal,
        }
    }

    /// Recompute the face normal from the triangle's vertices.
    pub fn geometric_normal(&self) -> Vector3<f32> {
        geometric_normal(&self.vertices[0], &self.vertices[1], &self.vertices[2])
    }
}

fn geometric_normal(v0: &Point3<f32>, v1: &Point3<f32>, v2: &Point3<f32>) -> Vector3<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let cross = edge1.cross(&edge2);
    let norm = cross.norm();
    if norm > f32::EPSILON {
        cross / norm
    } else {
        Vector3::zeros()
    }
}

/// A triangle-soup mesh, immutable once loaded.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Axis-aligned bounding box over every vertex of every triangle.
    /// Returns `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut iter = self
            .triangles
            .iter()
            .flat_map(|triangle| triangle.vertices.iter());
        let first = iter.next()?;
        let mut min = *first;
        let mut max = *first;
        for vertex in iter {
            for axis in 0..3 {
                min[axis] = min[axis].min(vertex[axis]);
                max[axis] = max[axis].max(vertex[axis]);
            }
        }
        Some((min, max))
    }

    /// Create a simple cube mesh, used as the built-in demo model and in tests.
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let p = |x: f32, y: f32, z: f32| Point3::new(x, y, z);
        let mut mesh = Self::with_capacity(12);

        // Front face
        mesh.add_triangle(Triangle::new(
            p(-half, -half, half),
            p(half, -half, half),
            p(half, half, half),
        ));
        mesh.add_triangle(Triangle::new(
            p(-half, -half, half),
            p(half, half, half),
            p(-half, half, half),
        ));

        // Back face
        mesh.add_triangle(Triangle::new(
            p(-half, -half, -half),
            p(-half, half, -half),
            p(half, half, -half),
        ));
        mesh.add_triangle(Triangle::new(
            p(-half, -half, -half),
            p(half, half, -half),
            p(half, -half, -half),
        ));

        // Top face
        mesh.add_triangle(Triangle::new(
            p(-half, half, -half),
            p(-half, half, half),
            p(half, half, half),
        ));
        mesh.add_triangle(Triangle::new(
            p(-half, half, -half),
            p(half, half, half),
            p(half, half, -half),
        ));

        // Bottom face
        mesh.add_triangle(Triangle::new(
            p(-half, -half, -half),
            p(half, -half, -half),
            p(half, -half, half),
        ));
        mesh.add_triangle(Triangle::new(
            p(-half, -half, -half),
            p(half, -half, half),
            p(-half, -half, half),
        ));

        // Right face
        mesh.add_triangle(Triangle::new(
            p(half, -half, -half),
            p(half, half, -half),
            p(half, half, half),
        ));
        mesh.add_triangle(Triangle::new(
            p(half, -half, -half),
            p(half, half, half),
            p(half, -half, half),
        ));

        // Left face
        mesh.add_triangle(Triangle::new(
            p(-half, -half, -half),
            p(-half, -half, half),
            p(-half, half, half),
        ));
        mesh.add_triangle(Triangle::new(
            p(-half, -half, -half),
            p(-half, half, half),
            p(-half, half, -half),
        ));

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_bounds() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.triangles.len(), 12);
        let (min, max) = cube.bounds().unwrap();
        assert_eq!(min, Point3::new(-1.0, -1.0, -1.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_empty_mesh_bounds() {
        let mesh = Mesh::new();
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn test_triangle_normal() {
        let triangle = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let normal = triangle.geometric_normal();
        assert!((normal - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_degenerate_triangle_normal_is_zero() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let triangle = Triangle::new(p, p, p);
        assert_eq!(triangle.geometric_normal(), Vector3::zeros());
    }
}
