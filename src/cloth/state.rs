//! Host-facing simulation state and the per-frame parameter block.

use std::time::Duration;

use bytemuck::{Pod, Zeroable};

use crate::camera::{CameraState, InputEvent};
use crate::params::{CenterAnimation, ClothPhysics, OrbitCameraParams};

/// Uniform block read by the compute step (16 bytes, matches `SimParams` in WGSL)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SimParams {
    pub subdivision: u32,
    pub gravity: f32,
    pub center_offset: f32,
    /// Frame delta in seconds
    pub delta_time: f32,
}

/// Everything the host can change between frames.
///
/// Owned by the frame driver; input callbacks mutate it between ticks and the
/// driver reads it at fixed points inside a tick.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub camera: CameraState,
    gravity: f32,
    center_offset: f32,
    pending_subdivision: u32,
    animate_center: bool,
    viewport: (u32, u32),
    physics: ClothPhysics,
    animation: CenterAnimation,
}

impl SimulationState {
    pub fn new(physics: ClothPhysics, camera: OrbitCameraParams, viewport: (u32, u32)) -> Self {
        let mut state = Self {
            camera: CameraState::new(camera),
            gravity: 0.0,
            center_offset: 0.0,
            pending_subdivision: 0,
            animate_center: false,
            viewport,
            animation: CenterAnimation::default(),
            physics,
        };
        state.set_subdivision(state.physics.initial_subdivision);
        state
    }

    pub fn physics(&self) -> &ClothPhysics {
        &self.physics
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn center_offset(&self) -> f32 {
        self.center_offset
    }

    /// Subdivision requested by the host, adopted by the driver on its next tick
    pub fn pending_subdivision(&self) -> u32 {
        self.pending_subdivision
    }

    pub fn is_center_animated(&self) -> bool {
        self.animate_center
    }

    /// Request a new subdivision. Values above the range clamp to its top and odd
    /// values round down to even, so 1 becomes the degenerate single-point grid.
    /// Returns the value actually stored.
    pub fn set_subdivision(&mut self, requested: u32) -> u32 {
        let max = *self.physics.subdivision_range.end();
        let adjusted = requested.min(max) & !1;
        if adjusted != requested {
            log::warn!("Subdivision {} adjusted to {}", requested, adjusted);
        }
        self.pending_subdivision = adjusted;
        log::debug!("Pending subdivision: {}", adjusted);
        adjusted
    }

    /// Step the pending subdivision by `delta` within the accepted range
    pub fn step_subdivision(&mut self, delta: i32) -> u32 {
        let range = &self.physics.subdivision_range;
        let next = (self.pending_subdivision as i64 + delta as i64)
            .clamp(*range.start() as i64, *range.end() as i64);
        self.set_subdivision(next as u32)
    }

    /// Set the horizontal offset of the sheet's rest center
    pub fn set_center_offset(&mut self, offset: f32) -> f32 {
        let range = &self.physics.center_offset_range;
        self.center_offset = if offset.is_nan() {
            0.0
        } else {
            offset.clamp(*range.start(), *range.end())
        };
        self.center_offset
    }

    /// Flip gravity between off and on: `gravity := g_on - gravity`
    pub fn toggle_gravity(&mut self) -> f32 {
        self.gravity = self.physics.gravity_on - self.gravity;
        log::debug!("Gravity: {}", self.gravity);
        self.gravity
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        let on = self.gravity != 0.0;
        if on != enabled {
            self.toggle_gravity();
        }
    }

    /// Toggle the automatic center offset oscillation
    pub fn toggle_center_animation(&mut self) -> bool {
        self.animate_center = !self.animate_center;
        log::debug!("Center animation: {}", self.animate_center);
        self.animate_center
    }

    pub fn set_center_animation(&mut self, enabled: bool) {
        self.animate_center = enabled;
    }

    /// Advance the center animation (no-op while it is off)
    pub fn animate(&mut self, elapsed: Duration) {
        if self.animate_center {
            let offset = self.animation.offset_at(elapsed);
            self.set_center_offset(offset);
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        self.camera.handle_input(event);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (width, height) = self.viewport;
        width.max(1) as f32 / height.max(1) as f32
    }

    /// Parameter block for a frame of `delta` at the given subdivision
    pub fn sim_params(&self, subdivision: u32, delta: Duration) -> SimParams {
        SimParams {
            subdivision,
            gravity: self.gravity,
            center_offset: self.center_offset,
            delta_time: delta.as_secs_f32(),
        }
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(ClothPhysics::default(), OrbitCameraParams::default(), (1200, 720))
    }
}
