//! Clothgrid - a GPU cloth sheet you can orbit, sag and tug
//!
//! Drag with the left mouse button to orbit, scroll to zoom.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use clothgrid::camera::InputEvent;
use clothgrid::cli::Args;
use clothgrid::cloth::SimulationState;
use clothgrid::frame::FrameDriver;
use clothgrid::params::RenderConfig;
use clothgrid::rendering::{capture_texture, GpuContext, GpuSimulation, WindowSurface};

/// Subdivision change per arrow key press
const SUBDIVISION_STEP: i32 = 2;

/// Center offset change per arrow key press
const CENTER_OFFSET_STEP: f32 = 0.05;

/// Main application state
struct App {
    // Window and presentation
    window: Option<Arc<Window>>,
    surface: Option<WindowSurface>,

    // Simulation loop
    driver: FrameDriver<GpuSimulation>,

    // Configuration
    render_config: RenderConfig,

    // Pointer position, needed to anchor a drag on button press
    cursor: (f32, f32),

    capture_next_frame: bool,
    screenshots_taken: u32,

    init_error: Option<String>,

    // Time tracking
    start_time: Instant,
}

impl App {
    fn new(args: &Args) -> Self {
        Self {
            window: None,
            surface: None,
            driver: FrameDriver::new(args.simulation_state()),
            render_config: args.render_config(),
            cursor: (0.0, 0.0),
            capture_next_frame: false,
            screenshots_taken: 0,
            init_error: None,
            start_time: Instant::now(),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, message: String) {
        log::error!("{}", message);
        self.init_error = Some(message);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("clothgrid")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, format!("Failed to create window: {}", e)),
        };

        // Initialize GPU resources
        let (gpu, surface) = match pollster::block_on(GpuContext::with_window(Arc::clone(&window)))
        {
            Ok(pair) => pair,
            Err(e) => return self.fail(event_loop, format!("GPU initialization failed: {}", e)),
        };

        let (width, height) = surface.size();
        let simulation = GpuSimulation::new(gpu, surface.format(), self.render_config.clear_color());
        self.driver.set_viewport(width, height);
        self.driver.initialize(simulation, self.start_time.elapsed());

        println!("\nclothgrid is running!");
        println!("  Drag: orbit   Wheel: zoom");
        println!("  Up/Down: subdivision   Left/Right: center offset");
        println!("  G: gravity   A: animate center   P: screenshot   ESC: quit\n");

        self.window = Some(window);
        self.surface = Some(surface);
        self.refresh_title();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => self.handle_key(code),
            WindowEvent::Resized(size) => {
                if let (Some(surface), Some(simulation)) = (&mut self.surface, self.driver.backend())
                {
                    surface.resize(&simulation.gpu().device, size.width, size.height);
                }
                if size.width > 0 && size.height > 0 {
                    self.driver.set_viewport(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                let (x, y) = self.cursor;
                self.driver.handle_input(InputEvent::PointerMove { x, y });
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = self.cursor;
                let event = match state {
                    ElementState::Pressed => InputEvent::PointerDown { x, y },
                    ElementState::Released => InputEvent::PointerUp,
                };
                self.driver.handle_input(event);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports scrolling away from the user as positive
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y,
                    MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32),
                };
                self.driver.handle_input(InputEvent::Wheel { delta_y });
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

impl App {
    fn handle_key(&mut self, code: KeyCode) {
        let state = self.driver.state_mut();
        match code {
            KeyCode::ArrowUp => {
                state.step_subdivision(SUBDIVISION_STEP);
            }
            KeyCode::ArrowDown => {
                state.step_subdivision(-SUBDIVISION_STEP);
            }
            KeyCode::ArrowLeft => {
                let offset = state.center_offset() - CENTER_OFFSET_STEP;
                state.set_center_offset(offset);
            }
            KeyCode::ArrowRight => {
                let offset = state.center_offset() + CENTER_OFFSET_STEP;
                state.set_center_offset(offset);
            }
            KeyCode::KeyG => {
                state.toggle_gravity();
            }
            KeyCode::KeyA => {
                state.toggle_center_animation();
            }
            KeyCode::KeyP => {
                self.capture_next_frame = true;
            }
            _ => return,
        }
        self.refresh_title();
    }

    fn refresh_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        window.set_title(&window_title(self.driver.state()));
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(surface) = &self.surface else {
            return;
        };

        let output = match surface.acquire() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let Some(simulation) = self.driver.backend() {
                    surface.reconfigure(&simulation.gpu().device);
                }
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory, exiting");
                event_loop.exit();
                return;
            }
            Err(e) => {
                log::warn!("Dropped frame: {}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let Some(report) = self.driver.tick(self.start_time.elapsed(), &view) else {
            return;
        };
        if report.rebuilt {
            log::debug!("Rebuilt for subdivision {}", report.params.subdivision);
        }

        if std::mem::take(&mut self.capture_next_frame) {
            if surface.supports_capture() {
                self.save_screenshot(&output.texture);
            } else {
                log::warn!("Surface does not support frame capture");
            }
        }

        output.present();
    }

    /// Capture a frame to disk
    fn save_screenshot(&mut self, texture: &wgpu::Texture) {
        let Some(simulation) = self.driver.backend() else {
            return;
        };
        let gpu = simulation.gpu();
        let dir = &self.render_config.screenshot_dir;
        let path = dir.join(format!("frame_{:05}.png", self.screenshots_taken));

        let result = std::fs::create_dir_all(dir)
            .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))
            .and_then(|_| {
                capture_texture(&gpu.device, &gpu.queue, texture)
                    .and_then(|frame| frame.save_png(&path))
                    .map_err(|e| e.to_string())
            });

        match result {
            Ok(()) => {
                log::info!("Saved screenshot {}", path.display());
                self.screenshots_taken += 1;
            }
            Err(e) => log::error!("Screenshot failed: {}", e),
        }
    }
}

/// Window title for the current settings. Only changes on key presses, so the
/// animated offset is shown as "animated" rather than its current value.
fn window_title(state: &SimulationState) -> String {
    let center = if state.is_center_animated() {
        "animated".to_string()
    } else {
        format!("{:+.2}", state.center_offset())
    };
    format!(
        "clothgrid - subdivision {} | gravity {} | center offset {}",
        state.pending_subdivision(),
        if state.gravity() != 0.0 { "on" } else { "off" },
        center,
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,clothgrid=info"),
    )
    .init();

    let args = Args::parse();
    log::info!("Starting with {:?}", args);

    let mut app = App::new(&args);
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop
        .run_app(&mut app)
        .context("Event loop exited with an error")?;

    if let Some(message) = app.init_error.take() {
        anyhow::bail!(message);
    }
    Ok(())
}
