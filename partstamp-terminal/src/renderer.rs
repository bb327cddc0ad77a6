/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Vector3;
use partstamp_core::{CameraTransform, Mesh, NormalizationParams, Triangle};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Depth value for empty cells, the far plane in window-depth units.
const FAR_DEPTH: f32 = 1.0;

/// ASCII renderer that converts 3D meshes to terminal characters.
///
/// The depth buffer holds window-space depth in `[0, 1]`, the same values
/// the picking engine consumes through `depth_at`.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![FAR_DEPTH; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(FAR_DEPTH);
        self.char_buffer.fill(' ');
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.depth_buffer = vec![FAR_DEPTH; width * height];
        self.char_buffer = vec![' '; width * height];
    }

    /// Depth-buffer sample at a cell, `FAR_DEPTH` when nothing was drawn
    /// there or the cell is out of bounds.
    pub fn depth_at(&self, x: u16, y: u16) -> f32 {
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return FAR_DEPTH;
        }
        self.depth_buffer[y * self.width + x]
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        camera: &CameraTransform,
        params: &NormalizationParams,
    ) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, camera, params);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        camera: &CameraTransform,
        params: &NormalizationParams,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0f32, 0.0f32, 0.0f32); 3];
        for (coord, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(vertex, params) {
                Some(projected) => *coord = projected,
                None => return, // Triangle is clipped
            }
        }

        // Shade by the rotated facet normal against a fixed headlight.
        let normal = if triangle.normal.norm() > 1e-6 {
            triangle.normal
        } else {
            triangle.geometric_normal()
        };
        let rotated = camera.model_matrix(params).transform_vector(&normal);
        let light_dir = Vector3::new(0.0, 0.0, 1.0);
        let brightness = if rotated.norm() > 1e-6 {
            rotated.normalize().dot(&light_dir).abs()
        } else {
            0.0
        };

        // Map brightness to character
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        self.rasterize_triangle(&screen_coords, character);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate window depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                        }
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.char_buffer[idx];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_empty_buffer_is_far() {
        let renderer = AsciiRenderer::new(80, 24);
        assert_eq!(renderer.depth_at(40, 12), FAR_DEPTH);
        assert_eq!(renderer.depth_at(200, 200), FAR_DEPTH);
    }

    #[test]
    fn test_rendered_triangle_writes_depth() {
        let mut renderer = AsciiRenderer::new(80, 24);
        let camera = CameraTransform::new(80, 24);
        let params = NormalizationParams::identity();

        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::new(
            Point3::new(-2.0, -2.0, 0.0),
            Point3::new(2.0, -2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ));
        renderer.render_mesh(&mesh, &camera, &params);

        let depth = renderer.depth_at(40, 12);
        assert!(depth < FAR_DEPTH);

        // The picked depth must unproject back onto the surface.
        let hit = partstamp_core::pick(40.5, 12.5, &camera, &params, &mesh, depth);
        assert!(hit.is_some());

        renderer.clear();
        assert_eq!(renderer.depth_at(40, 12), FAR_DEPTH);
    }
}
