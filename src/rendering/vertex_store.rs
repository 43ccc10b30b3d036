//! Double-buffered vertex storage shared by the compute and render stages.

use std::ops::Index;

use wgpu::util::DeviceExt;

use super::compute::ComputeStage;
use crate::cloth::{ClothVertex, GridMesh};

/// One of the two ping-pong vertex buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferSlot {
    A,
    B,
}

impl BufferSlot {
    pub const ALL: [BufferSlot; 2] = [BufferSlot::A, BufferSlot::B];

    pub fn other(self) -> Self {
        match self {
            BufferSlot::A => BufferSlot::B,
            BufferSlot::B => BufferSlot::A,
        }
    }

    fn index(self) -> usize {
        match self {
            BufferSlot::A => 0,
            BufferSlot::B => 1,
        }
    }
}

/// Which slot is rendered (front) and which is written by compute (back)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferRoles {
    front: BufferSlot,
}

impl Default for BufferRoles {
    fn default() -> Self {
        Self {
            front: BufferSlot::A,
        }
    }
}

impl BufferRoles {
    pub fn front(&self) -> BufferSlot {
        self.front
    }

    pub fn back(&self) -> BufferSlot {
        self.front.other()
    }

    pub fn swap(&mut self) {
        self.front = self.front.other();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A value per buffer slot
#[derive(Debug, Clone, PartialEq)]
pub struct PingPong<T> {
    slots: [T; 2],
}

impl<T> PingPong<T> {
    pub fn from_fn(mut f: impl FnMut(BufferSlot) -> T) -> Self {
        Self {
            slots: [f(BufferSlot::A), f(BufferSlot::B)],
        }
    }
}

impl<T> Index<BufferSlot> for PingPong<T> {
    type Output = T;

    fn index(&self, slot: BufferSlot) -> &T {
        &self.slots[slot.index()]
    }
}

/// GPU buffers for one grid topology.
///
/// Both vertex buffers, the index buffer and both compute bind groups are built
/// together from the same mesh; a subdivision change replaces the whole store.
pub struct VertexStore {
    buffers: PingPong<wgpu::Buffer>,
    /// Keyed by the slot the compute pass writes
    bind_groups: PingPong<wgpu::BindGroup>,
    index_buffer: wgpu::Buffer,
    vertex_count: u32,
    index_count: u32,
}

impl VertexStore {
    /// Allocate and seed both buffers with `mesh`'s rest pose
    pub fn new(device: &wgpu::Device, compute: &ComputeStage, mesh: &GridMesh) -> Self {
        let buffers = PingPong::from_fn(|slot| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(match slot {
                    BufferSlot::A => "Cloth Vertex Buffer A",
                    BufferSlot::B => "Cloth Vertex Buffer B",
                }),
                contents: mesh.vertex_bytes(),
                usage: wgpu::BufferUsages::VERTEX
                    | wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC,
            })
        });

        let bind_groups = PingPong::from_fn(|write| {
            compute.create_bind_group(device, &buffers[write], &buffers[write.other()])
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cloth Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.index_upload()),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            buffers,
            bind_groups,
            index_buffer,
            vertex_count: mesh.vertex_count(),
            index_count: mesh.index_count(),
        }
    }

    pub fn vertex_buffer(&self, slot: BufferSlot) -> &wgpu::Buffer {
        &self.buffers[slot]
    }

    /// Bind group that writes `slot` and reads the other buffer
    pub fn compute_bind_group(&self, write: BufferSlot) -> &wgpu::BindGroup {
        &self.bind_groups[write]
    }

    pub fn index_buffer(&self) -> &wgpu::Buffer {
        &self.index_buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Size in bytes of each vertex buffer
    pub fn buffer_size(&self) -> u64 {
        self.vertex_count as u64 * ClothVertex::STRIDE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_swap_and_reset() {
        let mut roles = BufferRoles::default();
        assert_eq!(roles.front(), BufferSlot::A);
        assert_eq!(roles.back(), BufferSlot::B);

        roles.swap();
        assert_eq!(roles.front(), BufferSlot::B);
        assert_eq!(roles.back(), BufferSlot::A);

        roles.swap();
        roles.swap();
        roles.reset();
        assert_eq!(roles.front(), BufferSlot::A);
    }

    #[test]
    fn test_front_and_back_never_coincide() {
        let mut roles = BufferRoles::default();
        for _ in 0..5 {
            assert_ne!(roles.front(), roles.back());
            roles.swap();
        }
    }

    #[test]
    fn test_ping_pong_indexing() {
        let pair = PingPong::from_fn(|slot| match slot {
            BufferSlot::A => "first",
            BufferSlot::B => "second",
        });
        assert_eq!(pair[BufferSlot::A], "first");
        assert_eq!(pair[BufferSlot::B], "second");
        assert_eq!(pair[BufferSlot::B.other()], "first");
    }
}
