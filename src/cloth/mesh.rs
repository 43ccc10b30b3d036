//! Flat grid mesh with line-list topology for the cloth sheet.

use bytemuck::{Pod, Zeroable};

/// Per-point record shared by the compute and render stages.
///
/// The compute step reads `position` and `previous` from last frame's buffer and
/// writes the integrated point back with the old position shifted into `previous`.
/// The render stage only reads `position` (Float32x4 at offset 0, 32-byte stride).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ClothVertex {
    pub position: [f32; 4],
    pub previous: [f32; 4],
}

impl ClothVertex {
    /// Byte stride of one record in the vertex/storage buffers
    pub const STRIDE: u64 = std::mem::size_of::<Self>() as u64;

    /// Vertex at rest: both slots hold the same point with w = 1
    pub fn at_rest(x: f32, z: f32) -> Self {
        let p = [x, 0.0, z, 1.0];
        Self {
            position: p,
            previous: p,
        }
    }
}

/// Regular grid spanning [-1, 1] x [-1, 1] on the XZ plane
#[derive(Debug, Clone, PartialEq)]
pub struct GridMesh {
    pub subdivision: u32,
    pub vertices: Vec<ClothVertex>,
    pub indices: Vec<u32>,
}

impl GridMesh {
    /// Generate the rest-pose grid for `subdivision` segments per side.
    ///
    /// Points are stored row-major: column `i` of row `j` lives at
    /// `i + j * (subdivision + 1)`. Indices list every row's horizontal segments
    /// first, then every column's vertical segments.
    ///
    /// `subdivision == 0` yields a single point at (-1, 0, -1) and no segments.
    pub fn generate(subdivision: u32) -> Self {
        let side = subdivision as usize + 1;
        let step = if subdivision == 0 {
            0.0
        } else {
            2.0 / subdivision as f32
        };

        let mut vertices = Vec::with_capacity(side * side);
        for j in 0..side {
            let z = -1.0 + j as f32 * step;
            for i in 0..side {
                let x = -1.0 + i as f32 * step;
                vertices.push(ClothVertex::at_rest(x, z));
            }
        }

        let n = subdivision;
        let row = n + 1;
        let mut indices = Vec::with_capacity(Self::index_count_for(n) as usize);

        // Horizontal segments (right neighbour)
        for j in 0..row {
            for i in 0..n {
                let k = i + j * row;
                indices.extend_from_slice(&[k, k + 1]);
            }
        }

        // Vertical segments (neighbour below)
        for i in 0..row {
            for j in 0..n {
                let k = i + j * row;
                indices.extend_from_slice(&[k, k + row]);
            }
        }

        Self {
            subdivision,
            vertices,
            indices,
        }
    }

    /// Number of indices a grid with `subdivision` segments per side draws
    pub fn index_count_for(subdivision: u32) -> u32 {
        2 * subdivision * (subdivision + 1)
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Vertex data as bytes, ready for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data for upload. Never empty: a degenerate grid uploads one padding
    /// index so the GPU buffer is not zero-sized, while `index_count()` stays 0.
    pub fn index_upload(&self) -> Vec<u32> {
        if self.indices.is_empty() {
            vec![0]
        } else {
            self.indices.clone()
        }
    }
}
