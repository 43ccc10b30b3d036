//! wgpu implementation of the cloth frame: compute step, wireframe pass and
//! the double-buffered vertex store they share.

mod compute;
mod context;
mod readback;
mod vertex_store;
mod wireframe;

pub use compute::{ComputeStage, WORKGROUP_SIZE};
pub use context::{GpuContext, InitError, WindowSurface};
pub use readback::{capture_texture, read_buffer, CaptureError, RgbaFrame};
pub use vertex_store::{BufferRoles, BufferSlot, PingPong, VertexStore};
pub use wireframe::{Uniforms, WireframeStage};

use glam::Mat4;

use crate::cloth::{ClothVertex, GridMesh, SimParams};
use crate::frame::{FrameBackend, FramePlan};

/// GPU resources for the simulation loop
pub struct GpuSimulation {
    gpu: GpuContext,
    compute: ComputeStage,
    wireframe: WireframeStage,
    /// Created by the first `rebuild`
    store: Option<VertexStore>,
    clear_color: wgpu::Color,
}

impl GpuSimulation {
    /// Build pipelines rendering into textures of `target_format`
    pub fn new(
        gpu: GpuContext,
        target_format: wgpu::TextureFormat,
        clear_color: wgpu::Color,
    ) -> Self {
        let compute = ComputeStage::new(&gpu.device);
        let wireframe = WireframeStage::new(&gpu.device, target_format);

        Self {
            gpu,
            compute,
            wireframe,
            store: None,
            clear_color,
        }
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    pub fn store(&self) -> Option<&VertexStore> {
        self.store.as_ref()
    }

    /// Read one vertex buffer back to the host (blocks on the device)
    pub fn read_vertices(&self, slot: BufferSlot) -> Result<Vec<ClothVertex>, CaptureError> {
        let Some(store) = &self.store else {
            return Ok(Vec::new());
        };
        let bytes = read_buffer(
            &self.gpu.device,
            &self.gpu.queue,
            store.vertex_buffer(slot),
            store.buffer_size(),
        )?;
        Ok(bytes
            .chunks_exact(ClothVertex::STRIDE as usize)
            .map(bytemuck::pod_read_unaligned)
            .collect())
    }
}

impl FrameBackend for GpuSimulation {
    type Target = wgpu::TextureView;

    fn rebuild(&mut self, mesh: &GridMesh) {
        // Replace the whole store so both buffers always match one topology
        self.store = Some(VertexStore::new(&self.gpu.device, &self.compute, mesh));
    }

    fn write_sim_params(&mut self, params: &SimParams) {
        self.compute.write_params(&self.gpu.queue, params);
    }

    fn write_view_proj(&mut self, view_proj: Mat4) {
        self.wireframe.write_view_proj(&self.gpu.queue, view_proj);
    }

    fn submit(&mut self, plan: &FramePlan, target: &wgpu::TextureView) {
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Cloth Frame Encoder"),
            });

        let drawable = self.store.as_ref().filter(|_| !plan.skips_work());

        // Compute first: the render pass reads the other buffer, so no barrier is needed
        if let Some(store) = drawable {
            self.compute.encode(
                &mut encoder,
                store.compute_bind_group(plan.compute_write),
                plan.workgroups,
            );
        }

        self.wireframe.encode(
            &mut encoder,
            target,
            self.clear_color,
            drawable.map(|store| (store, plan.render_read)),
        );

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
    }
}
