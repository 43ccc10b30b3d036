//! Rendering and window configuration.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Background colour the frame is cleared to before drawing (linear RGBA)
    pub clear_color: [f64; 4],

    /// Directory screenshots are written to
    pub screenshot_dir: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1200,
            window_height: 720,
            clear_color: [0.3, 0.3, 0.3, 1.0],
            screenshot_dir: PathBuf::from("screenshots"),
        }
    }
}

impl RenderConfig {
    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color { r, g, b, a }
    }
}
