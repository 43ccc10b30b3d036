//! Orbit camera driven by pointer drag and wheel input.

use glam::{Mat4, Vec3};

use crate::params::OrbitCameraParams;

/// Pointer input in window coordinates.
///
/// `Wheel::delta_y` follows the browser convention: positive when scrolling
/// toward the user (zoom out), negative when scrolling away (zoom in).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    Wheel { delta_y: f32 },
}

/// Orbit camera: yaw, pitch and arm length around the origin
#[derive(Debug, Clone)]
pub struct CameraState {
    yaw: f32,
    pitch: f32,
    arm_length: f32,
    /// Last cursor position while a drag is in progress
    drag_anchor: Option<(f32, f32)>,
    params: OrbitCameraParams,
}

impl CameraState {
    pub fn new(params: OrbitCameraParams) -> Self {
        let mut camera = Self {
            yaw: params.initial_yaw,
            pitch: params.initial_pitch,
            arm_length: params.initial_arm_length,
            drag_anchor: None,
            params,
        };
        camera.clamp();
        camera
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn arm_length(&self) -> f32 {
        self.arm_length
    }

    /// Single entry point for all pointer input
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => {
                self.drag_anchor = Some((x, y));
            }
            InputEvent::PointerMove { x, y } => {
                let Some((last_x, last_y)) = self.drag_anchor else {
                    return;
                };
                let k = self.params.drag_sensitivity;
                self.yaw += k * (last_x - x);
                self.pitch += k * (last_y - y);
                self.drag_anchor = Some((x, y));
                self.clamp();
            }
            InputEvent::PointerUp => {
                self.drag_anchor = None;
            }
            InputEvent::Wheel { delta_y } => {
                if delta_y > 0.0 {
                    self.arm_length *= self.params.zoom_out_factor;
                } else if delta_y < 0.0 {
                    self.arm_length *= self.params.zoom_in_factor;
                }
                self.clamp();
            }
        }
    }

    fn clamp(&mut self) {
        let p = &self.params;
        self.pitch = self.pitch.clamp(p.min_pitch, p.max_pitch);
        self.arm_length = self.arm_length.clamp(p.min_arm_length, p.max_arm_length);
    }

    /// World-to-view transform: back off along the view axis, then pitch, then yaw
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.arm_length))
            * Mat4::from_rotation_x(-self.pitch)
            * Mat4::from_rotation_y(-self.yaw)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.params.fov_y,
            aspect,
            self.params.near_plane,
            self.params.far_plane,
        )
    }

    /// Combined view-projection matrix for the render stage
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(OrbitCameraParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use std::f32::consts::FRAC_PI_2;

    fn drag(camera: &mut CameraState, from: (f32, f32), to: (f32, f32)) {
        camera.handle_input(InputEvent::PointerDown { x: from.0, y: from.1 });
        camera.handle_input(InputEvent::PointerMove { x: to.0, y: to.1 });
        camera.handle_input(InputEvent::PointerUp);
    }

    #[test]
    fn test_defaults() {
        let camera = CameraState::default();
        assert_eq!(camera.yaw(), 0.0);
        assert_eq!(camera.pitch(), -0.7);
        assert_eq!(camera.arm_length(), 2.5);
        assert!(camera.drag_anchor.is_none());
    }

    #[test]
    fn test_drag_rotates_by_sensitivity() {
        let mut camera = CameraState::default();
        drag(&mut camera, (100.0, 100.0), (90.0, 110.0));

        assert!((camera.yaw() - 0.07).abs() < 1e-6);
        assert!((camera.pitch() - (-0.7 - 0.07)).abs() < 1e-6);
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut camera = CameraState::default();
        camera.handle_input(InputEvent::PointerMove { x: 500.0, y: 500.0 });
        assert_eq!(camera.yaw(), 0.0);
        assert_eq!(camera.pitch(), -0.7);

        drag(&mut camera, (0.0, 0.0), (0.0, 0.0));
        camera.handle_input(InputEvent::PointerMove { x: -500.0, y: -500.0 });
        assert_eq!(camera.yaw(), 0.0);
    }

    #[test]
    fn test_pitch_clamped_for_any_drag_sequence() {
        let mut camera = CameraState::default();
        let (lo, hi) = (-FRAC_PI_2 + 0.1, FRAC_PI_2 - 1.0);

        camera.handle_input(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        let mut y = 0.0;
        for step in [1e6, -3e6, 250.0, -17.0, 4e4, -9e5, 3.0, 1e9, -1e9] {
            y += step;
            camera.handle_input(InputEvent::PointerMove { x: step, y });
            assert!(camera.pitch() >= lo && camera.pitch() <= hi);
        }

        // Large upward drag pins to the lower bound, downward to the upper
        drag(&mut camera, (0.0, 0.0), (0.0, 1e5));
        assert_eq!(camera.pitch(), lo);
        drag(&mut camera, (0.0, 1e5), (0.0, 0.0));
        assert_eq!(camera.pitch(), hi);
    }

    #[test]
    fn test_wheel_scales_and_clamps_arm_length() {
        let mut camera = CameraState::default();

        camera.handle_input(InputEvent::Wheel { delta_y: 1.0 });
        assert!((camera.arm_length() - 3.5).abs() < 1e-5);
        camera.handle_input(InputEvent::Wheel { delta_y: -1.0 });
        assert!((camera.arm_length() - 3.5 * 0.71).abs() < 1e-5);

        for _ in 0..50 {
            camera.handle_input(InputEvent::Wheel { delta_y: 3.0 });
            assert!(camera.arm_length() <= 10.0);
        }
        assert_eq!(camera.arm_length(), 10.0);

        for _ in 0..50 {
            camera.handle_input(InputEvent::Wheel { delta_y: -3.0 });
            assert!(camera.arm_length() >= 1.0);
        }
        assert_eq!(camera.arm_length(), 1.0);

        camera.handle_input(InputEvent::Wheel { delta_y: 0.0 });
        assert_eq!(camera.arm_length(), 1.0);
    }

    #[test]
    fn test_view_places_origin_arm_length_ahead() {
        let camera = CameraState::default();
        let origin_in_view = camera.view_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);

        assert!(origin_in_view.x.abs() < 1e-6);
        assert!(origin_in_view.y.abs() < 1e-6);
        assert!((origin_in_view.z + 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_default_view_looks_down_on_sheet() {
        let camera = CameraState::default();
        let clip = camera.view_proj(1.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;

        assert!(clip.w > 0.0);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);

        // Near edge of the sheet (z = +1) appears below the far edge (z = -1)
        let near = camera.view_proj(1.0) * Vec4::new(0.0, 0.0, 1.0, 1.0);
        let far = camera.view_proj(1.0) * Vec4::new(0.0, 0.0, -1.0, 1.0);
        assert!(near.y / near.w < far.y / far.w);
    }
}
