/// Mesh picking: screen-to-ray unprojection, ray/triangle intersection
/// (Möller–Trumbore) and the nearest-hit scan over the full mesh.
use nalgebra::{Point3, Vector3};

use crate::geometry::{Mesh, Triangle};
use crate::normalize::NormalizationParams;
use crate::transform::CameraTransform;

/// Tolerance for the parallel-ray and behind-origin tests.
const EPSILON: f32 = 1e-8;

/// Minimum usable length for an unprojected ray direction.
const MIN_DIRECTION_LENGTH: f32 = 1e-6;

/// A world-space ray with a unit-length direction, built fresh per query.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

/// A surface point hit by a pick ray and its distance from the ray origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub point: Point3<f32>,
    pub distance: f32,
}

/// Map a screen coordinate plus a depth-buffer sample back to a ray in
/// mesh space.
///
/// The inverse of the exact matrices used for the forward draw is applied,
/// so the resulting ray already accounts for centering, scaling, rotation,
/// zoom and perspective. Coordinates outside the viewport and degenerate
/// (non-invertible) transforms yield `None`, never a panic.
pub fn unproject(
    screen_x: f32,
    screen_y: f32,
    depth: f32,
    camera: &CameraTransform,
    params: &NormalizationParams,
) -> Option<Ray> {
    let width = camera.viewport_width as f32;
    let height = camera.viewport_height as f32;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    if !(0.0..=width).contains(&screen_x) || !(0.0..=height).contains(&screen_y) {
        return None;
    }

    // Window space to normalized device coordinates, flipping y to match
    // the depth buffer's bottom-left origin.
    let ndc = Point3::new(
        2.0 * screen_x / width - 1.0,
        1.0 - 2.0 * screen_y / height,
        2.0 * depth - 1.0,
    );

    let inverse_mvp = camera.mvp(params).try_inverse()?;
    let surface_point = Point3::from_homogeneous(inverse_mvp * ndc.to_homogeneous())?;

    // The eye is the view-space origin; map it through the inverse of
    // view * model so the ray lives in untransformed mesh space.
    let inverse_mv = (camera.view_matrix() * camera.model_matrix(params)).try_inverse()?;
    let origin = Point3::from_homogeneous(inverse_mv * Point3::origin().to_homogeneous())?;

    let direction = surface_point - origin;
    let length = direction.norm();
    if length < MIN_DIRECTION_LENGTH {
        return None;
    }

    Some(Ray {
        origin,
        direction: direction / length,
    })
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the hit point on the triangle's surface, or `None` for the
/// frequent, benign miss cases: parallel ray, barycentric coordinates
/// outside the triangle, or an intersection at/behind the ray origin.
pub fn intersect_triangle(ray: &Ray, triangle: &Triangle) -> Option<Hit> {
    let [v0, v1, v2] = triangle.vertices;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(&edge2);
    let a = edge1.dot(&h);
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    if t <= EPSILON {
        return None;
    }

    Some(Hit {
        point: ray.origin + ray.direction * t,
        distance: t,
    })
}

/// Exhaustive linear scan over every triangle, keeping the closest hit.
///
/// Strict `<` comparison means the first-encountered triangle wins an
/// exact distance tie. Stateless between calls.
pub fn pick_nearest(ray: &Ray, mesh: &Mesh) -> Option<Hit> {
    let mut nearest: Option<Hit> = None;
    for triangle in &mesh.triangles {
        if let Some(hit) = intersect_triangle(ray, triangle) {
            match nearest {
                Some(best) if hit.distance >= best.distance => {}
                _ => nearest = Some(hit),
            }
        }
    }
    nearest
}

/// Full pick query: unproject the cursor, then scan the mesh.
///
/// Called once per hover event by the shell; runs to completion with no
/// retained state. An empty mesh or a miss is `None`, not an error.
pub fn pick(
    screen_x: f32,
    screen_y: f32,
    camera: &CameraTransform,
    params: &NormalizationParams,
    mesh: &Mesh,
    depth_sample: f32,
) -> Option<Hit> {
    let ray = unproject(screen_x, screen_y, depth_sample, camera, params)?;
    log::trace!(
        "pick ray origin ({:.3}, {:.3}, {:.3}) direction ({:.3}, {:.3}, {:.3})",
        ray.origin.x,
        ray.origin.y,
        ray.origin.z,
        ray.direction.x,
        ray.direction.y,
        ray.direction.z,
    );
    pick_nearest(&ray, mesh)
}
