/// Terminal STL viewer with hover picking
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseEvent,
        MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use partstamp_core::{pick, CameraTransform, Hit, Mesh, NormalizationParams};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Rotation step per arrow key press, matching the original viewer's 5°.
const ROTATION_STEP: f32 = 5.0 * std::f32::consts::PI / 180.0;

/// Interactive viewer: renders the mesh, rotates/zooms on key input and
/// reports the surface point under the mouse cursor.
pub struct ViewerApp {
    mesh: Mesh,
    params: NormalizationParams,
    camera: CameraTransform,
    renderer: AsciiRenderer,
    hover: Option<Hit>,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl ViewerApp {
    pub fn new(mesh: Mesh, params: NormalizationParams) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            mesh,
            params,
            camera: CameraTransform::new(width as u32, height as u32),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            hover: None,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, .. }) => self.handle_key(code),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Moved,
                column,
                row,
                ..
            }) => self.pick_at(column, row),
            Event::Resize(width, height) => {
                self.camera.set_viewport(width as u32, height as u32);
                self.renderer.resize(width as usize, height as usize);
                self.hover = None;
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Left => {
                self.camera.rotate(0.0, -ROTATION_STEP);
            }
            KeyCode::Right => {
                self.camera.rotate(0.0, ROTATION_STEP);
            }
            KeyCode::Up => {
                self.camera.rotate(-ROTATION_STEP, 0.0);
            }
            KeyCode::Down => {
                self.camera.rotate(ROTATION_STEP, 0.0);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.camera.zoom_in();
            }
            KeyCode::Char('-') => {
                self.camera.zoom_out();
            }
            _ => {}
        }
    }

    /// One pick query: sample last frame's depth buffer at the cursor cell
    /// and cast a ray through it. The camera snapshot is taken once here.
    fn pick_at(&mut self, column: u16, row: u16) {
        let camera = self.camera;
        let depth = self.renderer.depth_at(column, row);
        if depth >= 1.0 {
            // Background cell, nothing under the cursor.
            self.hover = None;
            return;
        }
        self.hover = pick(
            column as f32 + 0.5,
            row as f32 + 0.5,
            &camera,
            &self.params,
            &self.mesh,
            depth,
        );
        if let Some(hit) = self.hover {
            log::debug!(
                "hover hit at ({:.3}, {:.3}, {:.3}), distance {:.3}",
                hit.point.x,
                hit.point.y,
                hit.point.z,
                hit.distance
            );
        }
    }

    fn render(&mut self) -> io::Result<()> {
        // Clear renderer
        self.renderer.clear();

        // Render mesh
        self.renderer.render_mesh(&self.mesh, &self.camera, &self.params);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let hover_text = match self.hover {
            Some(hit) => format!(
                "hover: ({:.3}, {:.3}, {:.3})",
                hit.point.x, hit.point.y, hit.point.z
            ),
            None => "hover: -".to_string(),
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "partstamp | {} tris | FPS: {:.1} | {} | Arrows=Rotate +/-=Zoom Q=Quit",
                self.mesh.triangles.len(),
                self.fps,
                hover_text
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
