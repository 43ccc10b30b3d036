//! GPU-to-host copies: vertex buffer inspection and frame capture.

use std::path::Path;
use std::sync::mpsc;

/// Failure while reading GPU memory back or saving it
#[derive(Debug)]
pub enum CaptureError {
    BufferMapFailed(wgpu::BufferAsyncError),
    ChannelDisconnected,
    UnsupportedFormat(wgpu::TextureFormat),
    Save(image::ImageError),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::BufferMapFailed(e) => write!(f, "Buffer map failed: {:?}", e),
            CaptureError::ChannelDisconnected => write!(f, "Buffer map channel disconnected"),
            CaptureError::UnsupportedFormat(format) => {
                write!(f, "Cannot capture texture format {:?}", format)
            }
            CaptureError::Save(e) => write!(f, "Failed to save image: {}", e),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Save(e) => Some(e),
            _ => None,
        }
    }
}

/// Tightly packed RGBA8 pixels
#[derive(Debug, Clone)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaFrame {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
            self.pixels[offset + 3],
        ]
    }

    pub fn save_png(&self, path: &Path) -> Result<(), CaptureError> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )
        .map_err(CaptureError::Save)
    }
}

/// Block until `buffer` is mapped for reading
fn map_read(device: &wgpu::Device, buffer: &wgpu::Buffer) -> Result<(), CaptureError> {
    let (tx, rx) = mpsc::channel();
    buffer.slice(..).map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device.poll(wgpu::Maintain::Wait);

    match rx.recv() {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(CaptureError::BufferMapFailed(e)),
        Err(_) => Err(CaptureError::ChannelDisconnected),
    }
}

/// Copy `size` bytes of `source` to the host
pub fn read_buffer(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    source: &wgpu::Buffer,
    size: u64,
) -> Result<Vec<u8>, CaptureError> {
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Buffer"),
        size,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Readback Encoder"),
    });
    encoder.copy_buffer_to_buffer(source, 0, &staging, 0, size);
    queue.submit(std::iter::once(encoder.finish()));

    map_read(device, &staging)?;
    let data = staging.slice(..).get_mapped_range().to_vec();
    staging.unmap();
    Ok(data)
}

/// Copy a rendered 8-bit colour texture to the host as RGBA
pub fn capture_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
) -> Result<RgbaFrame, CaptureError> {
    let format = texture.format();
    let swap_red_blue = match format {
        wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb => false,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => true,
        other => return Err(CaptureError::UnsupportedFormat(other)),
    };

    let width = texture.width();
    let height = texture.height();
    let bytes_per_pixel = 4;
    let unpadded_bytes_per_row = width * bytes_per_pixel;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Frame Capture Buffer"),
        size: (padded_bytes_per_row * height) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Frame Capture Encoder"),
    });

    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &buffer,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded_bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    queue.submit(std::iter::once(encoder.finish()));
    map_read(device, &buffer)?;

    let data = buffer.slice(..).get_mapped_range();
    let mut pixels = Vec::with_capacity((unpadded_bytes_per_row * height) as usize);

    // Remove row padding
    for row in 0..height {
        let start = (row * padded_bytes_per_row) as usize;
        pixels.extend_from_slice(&data[start..start + unpadded_bytes_per_row as usize]);
    }

    drop(data);
    buffer.unmap();

    if swap_red_blue {
        for px in pixels.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
    }

    Ok(RgbaFrame {
        width,
        height,
        pixels,
    })
}
