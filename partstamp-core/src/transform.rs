/// Camera transform: rotation/zoom state and the model/view/projection
/// matrices shared by rendering and picking.
use nalgebra::{Matrix4, Point3, Vector3};

use crate::normalize::NormalizationParams;

/// Distance of the eye from the origin at `zoom_factor == 1.0`.
const ZOOM_DISTANCE: f32 = 10.0;

/// One consistent snapshot of the viewing state.
///
/// Mutated by navigation input between pick queries; a query takes the
/// whole struct by reference once and never re-reads live state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    /// Rotation about the x axis, radians, unbounded.
    pub rotation_x: f32,
    /// Rotation about the y axis, radians, unbounded.
    pub rotation_y: f32,
    /// Strictly positive; smaller values move the eye closer.
    pub zoom_factor: f32,
    /// Vertical field of view, radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl CameraTransform {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            rotation_x: 0.0,
            rotation_y: 0.0,
            zoom_factor: 1.0,
            fov_y: std::f32::consts::FRAC_PI_4, // 45 degrees
            near: 1.0,
            far: 100.0,
            viewport_width,
            viewport_height,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.viewport_width as f32 / self.viewport_height.max(1) as f32
    }

    /// Rotate by delta amounts (in radians).
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.rotation_x += dx;
        self.rotation_y += dy;
    }

    pub fn zoom_in(&mut self) {
        self.zoom_factor *= 0.9;
    }

    pub fn zoom_out(&mut self) {
        self.zoom_factor *= 1.1;
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Model matrix: rotate, then uniform-scale, then re-center the mesh.
    pub fn model_matrix(&self, params: &NormalizationParams) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::x() * self.rotation_x);
        let ry = Matrix4::new_rotation(Vector3::y() * self.rotation_y);
        let scale = Matrix4::new_scaling(params.scale);
        let center = Matrix4::new_translation(&(-params.center.coords));
        rx * ry * scale * center
    }

    /// View matrix: the eye sits `ZOOM_DISTANCE * zoom_factor` back along
    /// the view axis.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(0.0, 0.0, -ZOOM_DISTANCE * self.zoom_factor))
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect(), self.fov_y, self.near, self.far)
    }

    /// Full model-view-projection matrix for the current snapshot.
    pub fn mvp(&self, params: &NormalizationParams) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix() * self.model_matrix(params)
    }

    /// Project a mesh-space point to window coordinates.
    ///
    /// Returns `(screen_x, screen_y, depth)` with depth in `[0, 1]`
    /// matching the depth-buffer convention, or `None` when the point is
    /// behind the camera or outside the clip volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        params: &NormalizationParams,
    ) -> Option<(f32, f32, f32)> {
        let clip = self.mvp(params) * point.to_homogeneous();
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let ndc_z = clip.z / clip.w;

        if !(-1.0..=1.0).contains(&ndc_x)
            || !(-1.0..=1.0).contains(&ndc_y)
            || !(-1.0..=1.0).contains(&ndc_z)
        {
            return None;
        }

        let screen_x = (ndc_x + 1.0) * 0.5 * self.viewport_width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * self.viewport_height as f32;
        let depth = (ndc_z + 1.0) * 0.5;
        Some((screen_x, screen_y, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = CameraTransform::new(800, 600);
        assert!((camera.aspect() - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(camera.zoom_factor, 1.0);
    }

    #[test]
    fn test_identity_rotation_model_matrix() {
        let camera = CameraTransform::new(800, 600);
        let model = camera.model_matrix(&NormalizationParams::identity());
        assert!((model - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_rotation_accumulates() {
        let mut camera = CameraTransform::new(800, 600);
        camera.rotate(0.1, -0.2);
        camera.rotate(0.1, -0.2);
        assert!((camera.rotation_x - 0.2).abs() < 1e-6);
        assert!((camera.rotation_y + 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_stays_positive() {
        let mut camera = CameraTransform::new(800, 600);
        for _ in 0..50 {
            camera.zoom_in();
        }
        assert!(camera.zoom_factor > 0.0);
        camera.zoom_out();
        assert!(camera.zoom_factor > 0.0);
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let camera = CameraTransform::new(800, 600);
        let (sx, sy, depth) = camera
            .project_to_screen(&Point3::origin(), &NormalizationParams::identity())
            .unwrap();
        assert!((sx - 400.0).abs() < 1e-3);
        assert!((sy - 300.0).abs() < 1e-3);
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let camera = CameraTransform::new(800, 600);
        let behind = Point3::new(0.0, 0.0, 50.0);
        assert!(camera
            .project_to_screen(&behind, &NormalizationParams::identity())
            .is_none());
    }
}
