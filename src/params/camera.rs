//! Orbit camera configuration.

use std::f32::consts::{FRAC_PI_2, PI};

/// Orbit camera parameters (angles in radians, distances in object-space units)
#[derive(Debug, Clone)]
pub struct OrbitCameraParams {
    /// Starting rotation about the vertical axis
    pub initial_yaw: f32,

    /// Starting rotation about the camera X axis (negative looks down on the sheet)
    pub initial_pitch: f32,

    /// Starting distance from the look-at target
    pub initial_arm_length: f32,

    /// Radians of rotation per pixel of pointer drag
    pub drag_sensitivity: f32,

    /// Arm length multiplier when scrolling toward the user (zoom out)
    pub zoom_out_factor: f32,

    /// Arm length multiplier when scrolling away from the user (zoom in)
    pub zoom_in_factor: f32,

    /// Lowest pitch (just above straight down)
    pub min_pitch: f32,

    /// Highest pitch (well short of looking straight up)
    pub max_pitch: f32,

    /// Closest arm length
    pub min_arm_length: f32,

    /// Farthest arm length
    pub max_arm_length: f32,

    /// Vertical field of view (radians)
    pub fov_y: f32,

    /// Near clipping plane
    pub near_plane: f32,

    /// Far clipping plane
    pub far_plane: f32,
}

impl Default for OrbitCameraParams {
    fn default() -> Self {
        Self {
            initial_yaw: 0.0,
            initial_pitch: -0.7,
            initial_arm_length: 2.5,
            drag_sensitivity: 0.007,
            zoom_out_factor: 1.4,
            zoom_in_factor: 0.71,
            min_pitch: -FRAC_PI_2 + 0.1,
            max_pitch: FRAC_PI_2 - 1.0,
            min_arm_length: 1.0,
            max_arm_length: 10.0,
            fov_y: PI / 3.0,
            near_plane: 0.001,
            far_plane: 100.0,
        }
    }
}
