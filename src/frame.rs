//! Frame driver: per-tick ordering of rebuild, parameter upload, compute and render.
//!
//! The driver owns the `SimulationState` and the front/back designation of the
//! vertex buffers. It talks to the GPU only through `FrameBackend`, so the tick
//! ordering can be exercised without a device.

use std::time::Duration;

use glam::Mat4;

use crate::camera::InputEvent;
use crate::cloth::{GridMesh, SimParams, SimulationState};
use crate::rendering::{BufferRoles, BufferSlot, WORKGROUP_SIZE};

/// GPU side of a frame, as seen by the driver
pub trait FrameBackend {
    /// Where the render stage draws (a texture view for the wgpu backend)
    type Target: ?Sized;

    /// Replace both vertex buffers and the index buffer with `mesh`'s rest pose
    fn rebuild(&mut self, mesh: &GridMesh);

    fn write_sim_params(&mut self, params: &SimParams);

    fn write_view_proj(&mut self, view_proj: Mat4);

    /// Encode compute then render for `plan` into one submission
    fn submit(&mut self, plan: &FramePlan, target: &Self::Target);
}

/// Buffer roles and work sizes for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePlan {
    /// Buffer the compute stage writes (the back buffer)
    pub compute_write: BufferSlot,
    /// Buffer the render stage reads (the front buffer, last tick's result)
    pub render_read: BufferSlot,
    pub vertex_count: u32,
    pub index_count: u32,
    /// Compute workgroups to dispatch (0 when the grid is degenerate)
    pub workgroups: u32,
}

impl FramePlan {
    pub fn new(roles: BufferRoles, vertex_count: u32, index_count: u32) -> Self {
        let workgroups = if index_count == 0 {
            0
        } else {
            vertex_count.div_ceil(WORKGROUP_SIZE)
        };
        Self {
            compute_write: roles.back(),
            render_read: roles.front(),
            vertex_count,
            index_count,
            workgroups,
        }
    }

    /// Degenerate grid: no dispatch and no draw this tick
    pub fn skips_work(&self) -> bool {
        self.index_count == 0
    }
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Buffers were reallocated for a new subdivision before this tick's compute
    pub rebuilt: bool,
    pub plan: FramePlan,
    pub params: SimParams,
}

struct Running<B> {
    backend: B,
    subdivision: u32,
    vertex_count: u32,
    index_count: u32,
    roles: BufferRoles,
    last_frame: Duration,
}

impl<B: FrameBackend> Running<B> {
    fn rebuild(&mut self, subdivision: u32) {
        let mesh = GridMesh::generate(subdivision);
        self.backend.rebuild(&mesh);
        self.subdivision = subdivision;
        self.vertex_count = mesh.vertex_count();
        self.index_count = mesh.index_count();
        self.roles.reset();

        log::info!(
            "Grid rebuilt: subdivision {}, {} vertices, {} indices",
            subdivision,
            self.vertex_count,
            self.index_count
        );
    }
}

enum Phase<B> {
    Uninitialized,
    Running(Running<B>),
}

/// Drives the simulation one display refresh at a time
pub struct FrameDriver<B: FrameBackend> {
    state: SimulationState,
    phase: Phase<B>,
}

impl<B: FrameBackend> FrameDriver<B> {
    pub fn new(state: SimulationState) -> Self {
        Self {
            state,
            phase: Phase::Uninitialized,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    pub fn backend(&self) -> Option<&B> {
        match &self.phase {
            Phase::Running(running) => Some(&running.backend),
            Phase::Uninitialized => None,
        }
    }

    /// Subdivision the GPU buffers currently hold
    pub fn current_subdivision(&self) -> Option<u32> {
        match &self.phase {
            Phase::Running(running) => Some(running.subdivision),
            Phase::Uninitialized => None,
        }
    }

    /// Build the buffers for the pending subdivision and start running.
    ///
    /// Only the first call has an effect; later calls drop `backend` and return
    /// `false`.
    pub fn initialize(&mut self, backend: B, now: Duration) -> bool {
        if self.is_running() {
            log::debug!("Frame driver already initialized, ignoring");
            return false;
        }

        let mut running = Running {
            backend,
            subdivision: 0,
            vertex_count: 0,
            index_count: 0,
            roles: BufferRoles::default(),
            last_frame: now,
        };
        running.rebuild(self.state.pending_subdivision());
        self.phase = Phase::Running(running);
        true
    }

    /// Run one frame. Returns `None` until the driver is initialized.
    pub fn tick(&mut self, now: Duration, target: &B::Target) -> Option<FrameReport> {
        let Phase::Running(running) = &mut self.phase else {
            return None;
        };

        // 1. Adopt a pending subdivision before anything touches the buffers
        let pending = self.state.pending_subdivision();
        let rebuilt = pending != running.subdivision;
        if rebuilt {
            running.rebuild(pending);
        }

        // 2. Frame delta
        let delta = now
            .saturating_sub(running.last_frame)
            .min(self.state.physics().max_frame_delta());
        running.last_frame = now;

        // 3. Parameters
        self.state.animate(now);
        let params = self.state.sim_params(running.subdivision, delta);
        running.backend.write_sim_params(&params);

        // 4. Camera
        let view_proj = self.state.camera.view_proj(self.state.aspect_ratio());
        running.backend.write_view_proj(view_proj);

        // 5-6. Compute into the back buffer, render last tick's front buffer
        let plan = FramePlan::new(running.roles, running.vertex_count, running.index_count);
        running.backend.submit(&plan, target);
        log::trace!("Frame submitted: {:?}", plan);

        // 7. The freshly written buffer is rendered next tick
        running.roles.swap();

        Some(FrameReport {
            rebuilt,
            plan,
            params,
        })
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        self.state.handle_input(event);
    }

    pub fn set_subdivision(&mut self, subdivision: u32) -> u32 {
        self.state.set_subdivision(subdivision)
    }

    pub fn set_center_offset(&mut self, offset: f32) -> f32 {
        self.state.set_center_offset(offset)
    }

    pub fn toggle_gravity(&mut self) -> f32 {
        self.state.toggle_gravity()
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.state.set_viewport(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_uses_distinct_buffers() {
        let mut roles = BufferRoles::default();
        for _ in 0..4 {
            let plan = FramePlan::new(roles, 121, 220);
            assert_ne!(plan.compute_write, plan.render_read);
            assert_eq!(plan.render_read, roles.front());
            roles.swap();
        }
    }

    #[test]
    fn test_plan_workgroup_rounding() {
        let roles = BufferRoles::default();
        assert_eq!(FramePlan::new(roles, 121, 220).workgroups, 2);
        assert_eq!(FramePlan::new(roles, 64, 10).workgroups, 1);
        assert_eq!(FramePlan::new(roles, 65, 10).workgroups, 2);
        assert_eq!(FramePlan::new(roles, 121 * 121, 2 * 120 * 121).workgroups, 229);
    }

    #[test]
    fn test_degenerate_plan_skips_work() {
        let plan = FramePlan::new(BufferRoles::default(), 1, 0);
        assert!(plan.skips_work());
        assert_eq!(plan.workgroups, 0);
    }
}
