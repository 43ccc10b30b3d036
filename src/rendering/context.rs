//! Adapter, device and window surface acquisition.

use std::sync::Arc;

use winit::window::Window;

/// Reasons the GPU could not be brought up. Fatal to initialization.
#[derive(Debug)]
pub enum InitError {
    CreateSurface(wgpu::CreateSurfaceError),
    NoAdapter,
    RequestDevice(wgpu::RequestDeviceError),
    UnsupportedSurface,
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitError::CreateSurface(e) => write!(f, "Failed to create surface: {}", e),
            InitError::NoAdapter => write!(f, "Failed to find suitable GPU adapter"),
            InitError::RequestDevice(e) => write!(f, "Failed to request device: {}", e),
            InitError::UnsupportedSurface => {
                write!(f, "Surface reports no formats compatible with the adapter")
            }
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::CreateSurface(e) => Some(e),
            InitError::RequestDevice(e) => Some(e),
            InitError::NoAdapter | InitError::UnsupportedSurface => None,
        }
    }
}

/// Device and queue shared by every GPU stage
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub adapter_info: wgpu::AdapterInfo,
}

impl GpuContext {
    /// Acquire a device without a surface (offscreen rendering and tests)
    pub async fn headless() -> Result<Self, InitError> {
        let instance = create_instance();
        let (_, context) = Self::request(&instance, None).await?;
        Ok(context)
    }

    /// Acquire a device able to present to `window`
    pub async fn with_window(window: Arc<Window>) -> Result<(Self, WindowSurface), InitError> {
        let size = window.inner_size();
        let instance = create_instance();

        // Window must have 'static lifetime via Arc
        let surface = instance
            .create_surface(window)
            .map_err(InitError::CreateSurface)?;

        let (adapter, context) = Self::request(&instance, Some(&surface)).await?;
        let surface = WindowSurface::configure(surface, &adapter, &context.device, size)?;
        Ok((context, surface))
    }

    async fn request(
        instance: &wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<(wgpu::Adapter, Self), InitError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(InitError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        log::info!("Using GPU: {} ({:?})", adapter_info.name, adapter_info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Cloth Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(InitError::RequestDevice)?;

        device.on_uncaptured_error(Box::new(|error| {
            log::error!("GPU uncaptured error: {}", error);
        }));

        Ok((
            adapter,
            Self {
                device,
                queue,
                adapter_info,
            },
        ))
    }
}

fn create_instance() -> wgpu::Instance {
    wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}

/// Window surface and its current configuration
pub struct WindowSurface {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
}

impl WindowSurface {
    fn configure(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> Result<Self, InitError> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(InitError::UnsupportedSurface)?;

        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;

        // COPY_SRC lets screenshots read the presented frame back
        if surface_caps.usages.contains(wgpu::TextureUsages::COPY_SRC) {
            usage |= wgpu::TextureUsages::COPY_SRC;
        }

        let config = wgpu::SurfaceConfiguration {
            usage,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(device, &config);

        Ok(Self { surface, config })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn supports_capture(&self) -> bool {
        self.config.usage.contains(wgpu::TextureUsages::COPY_SRC)
    }

    /// Reconfigure for a new window size (zero-sized windows are ignored)
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(device, &self.config);
        }
    }

    /// Reapply the current configuration after the surface was lost or outdated
    pub fn reconfigure(&self, device: &wgpu::Device) {
        self.surface.configure(device, &self.config);
    }

    pub fn acquire(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }
}
