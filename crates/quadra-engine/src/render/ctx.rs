use std::sync::Arc;

use crate::coords::Viewport;

/// Renderer-facing context (device/queue + surface format + viewport).
///
/// Device and queue are shared handles so renderers can keep them past the frame.
pub struct RenderCtx<'a> {
    pub device: &'a Arc<wgpu::Device>,
    pub queue: &'a Arc<wgpu::Queue>,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport, // physical px
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a Arc<wgpu::Device>,
        queue: &'a Arc<wgpu::Queue>,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
        }
    }
}

/// Target for drawing (encoder + color view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
