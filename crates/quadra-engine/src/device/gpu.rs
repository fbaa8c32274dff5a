use std::sync::Arc;

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::{self, SurfaceErrorAction};
use super::GpuInit;

/// Swapchain image acquired for one frame, plus the encoder recording into it.
///
/// [`Gpu::submit`] presents it. Dropping it unsubmitted discards the frame.
pub struct GpuFrame {
    surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Window surface plus the device and queue that render into it.
///
/// Device and queue are `Arc`s so renderers can keep them beyond a single frame.
pub struct Gpu<'w> {
    // Kept alive for the surface.
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'w>,
    adapter_info: wgpu::AdapterInfo,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    /// Drawable size in physical pixels; may be zero while minimized.
    size: PhysicalSize<u32>,
}

impl<'w> Gpu<'w> {
    /// Opens a device compatible with `window` and configures its surface.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let (adapter, device, queue) = open_device(&instance, &surface, &init).await?;
        let config = surface::surface_config(&surface.get_capabilities(&adapter), &init, size)?;
        surface.configure(&device, &config);

        log::info!(
            "surface {}x{} {:?}, {:?}, vsync wait {} frames",
            config.width,
            config.height,
            config.format,
            config.present_mode,
            init.vsync.frames()
        );

        Ok(Self {
            _instance: instance,
            surface,
            adapter_info: adapter.get_info(),
            device: Arc::new(device),
            queue: Arc::new(queue),
            config,
            size,
        })
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    /// Tracks the new drawable size; a zero-area size leaves the surface as configured.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.size = size;
        if self.is_drawable() {
            self.config.width = size.width;
            self.config.height = size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Acquires the next swapchain image and an encoder for it.
    pub fn begin_frame(&self) -> Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quadra frame encoder"),
            });

        Ok(GpuFrame { surface_texture, view, encoder })
    }

    /// Submits the frame's commands and presents its surface texture.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame { surface_texture, view, encoder } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    /// Classifies an acquire failure, reconfiguring the surface when that recovers it.
    pub fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = SurfaceErrorAction::for_error(&err);
        if action == SurfaceErrorAction::Reconfigured && self.is_drawable() {
            self.surface.configure(&self.device, &self.config);
        }
        action
    }

    fn is_drawable(&self) -> bool {
        self.size.width > 0 && self.size.height > 0
    }
}

async fn open_device(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'_>,
    init: &GpuInit,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .context("failed to find a suitable GPU adapter")?;

    let info = adapter.get_info();
    log::info!("adapter: {} ({:?})", info.name, info.backend);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("quadra device"),
            required_features: init.required_features,
            required_limits: init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to create wgpu device/queue")?;

    Ok((adapter, device, queue))
}
