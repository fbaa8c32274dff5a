use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;

use super::GpuInit;

/// What the frame loop should do after failing to acquire a surface texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated surface, reconfigured in place; the next frame can proceed.
    Reconfigured,
    /// Timeout or transient failure; drop this frame only.
    SkipFrame,
    /// Out of memory; the loop should exit.
    Fatal,
}

impl SurfaceErrorAction {
    pub(crate) fn for_error(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigured,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => Self::SkipFrame,
        }
    }
}

/// Builds the swapchain configuration for a `size` drawable from the surface's capabilities.
///
/// Present mode and frame latency come from `init.vsync`; the `Auto*` present modes and
/// FIFO are supported everywhere, so they are not checked against `caps`.
pub(crate) fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    init: &GpuInit,
    size: PhysicalSize<u32>,
) -> Result<wgpu::SurfaceConfiguration> {
    let format = pick_format(&caps.formats, init.prefer_srgb).context("no supported surface formats")?;

    let alpha_mode = init
        .alpha_mode
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: init.vsync.present_mode(),
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: init.vsync.frame_latency(),
    })
}

fn pick_format(formats: &[wgpu::TextureFormat], prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    const SRGB: [wgpu::TextureFormat; 2] = [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ];

    prefer_srgb
        .then(|| SRGB.into_iter().find(|f| formats.contains(f)))
        .flatten()
        .or_else(|| formats.first().copied())
}
