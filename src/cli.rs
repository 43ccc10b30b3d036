//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::cloth::SimulationState;
use crate::params::{ClothPhysics, OrbitCameraParams, RenderConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "clothgrid")]
#[command(about = "GPU cloth grid simulation with an orbit camera", long_about = None)]
pub struct Args {
    /// Grid subdivisions per side (even, 2-120)
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub subdivision: u32,

    /// Horizontal offset of the sheet's rest center (-0.5 to 0.5)
    #[arg(long, value_name = "OFFSET", default_value_t = 0.0, allow_negative_numbers = true)]
    pub center_offset: f32,

    /// Start with gravity switched on
    #[arg(long)]
    pub gravity: bool,

    /// Start with the center offset oscillating
    #[arg(long)]
    pub animate_center: bool,

    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 1200)]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 720)]
    pub height: u32,

    /// Directory for screenshots taken with P
    #[arg(long, value_name = "DIR", default_value = "screenshots")]
    pub screenshot_dir: PathBuf,
}

impl Args {
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width.max(1),
            window_height: self.height.max(1),
            screenshot_dir: self.screenshot_dir.clone(),
            ..RenderConfig::default()
        }
    }

    pub fn cloth_physics(&self) -> ClothPhysics {
        ClothPhysics {
            initial_subdivision: self.subdivision,
            ..ClothPhysics::default()
        }
    }

    /// Initial simulation state with every flag applied
    pub fn simulation_state(&self) -> SimulationState {
        let render = self.render_config();
        let mut state = SimulationState::new(
            self.cloth_physics(),
            OrbitCameraParams::default(),
            (render.window_width, render.window_height),
        );
        state.set_center_offset(self.center_offset);
        state.set_gravity_enabled(self.gravity);
        state.set_center_animation(self.animate_center);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_interactive_session() {
        let args = Args::parse_from(["clothgrid"]);
        let state = args.simulation_state();

        assert_eq!(state.pending_subdivision(), 10);
        assert_eq!(state.center_offset(), 0.0);
        assert_eq!(state.gravity(), 0.0);
        assert!(!state.is_center_animated());
        assert_eq!(args.render_config().window_width, 1200);
        assert_eq!(args.render_config().window_height, 720);
    }

    #[test]
    fn test_flags_reach_simulation_state() {
        let args = Args::parse_from([
            "clothgrid",
            "--subdivision",
            "7",
            "--center-offset",
            "-0.9",
            "--gravity",
            "--animate-center",
        ]);
        let state = args.simulation_state();

        assert_eq!(state.pending_subdivision(), 6);
        assert_eq!(state.center_offset(), -0.5);
        assert_eq!(state.gravity(), -9.8);
        assert!(state.is_center_animated());
    }
}
