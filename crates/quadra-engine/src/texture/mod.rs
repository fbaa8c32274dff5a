//! GPU textures for sprites.
//!
//! Textures are immutable once uploaded. [`Texture`] is a cheap, clonable handle; the GPU
//! allocation is released when the last clone is dropped.

mod decode;

use std::sync::Arc;

use anyhow::{ensure, Result};

use crate::render::sprite::{SpriteTexture, TextureId};

pub use decode::{decode_rgba8, DecodedImage};

struct GpuTexture {
    // Kept alive for the view.
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Sampled RGBA8 texture plus its size in texels.
#[derive(Clone)]
pub struct Texture {
    id: TextureId,
    width: u32,
    height: u32,
    gpu: Arc<GpuTexture>,
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Texture {
    /// Uploads tightly packed RGBA8 pixels (`width * height * 4` bytes, rows top to bottom).
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self> {
        ensure!(width > 0 && height > 0, "{label}: empty texture ({width}x{height})");
        let expected = width as usize * height as usize * 4;
        ensure!(
            pixels.len() == expected,
            "{label}: expected {expected} bytes of RGBA8, got {}",
            pixels.len()
        );

        let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::debug!("texture '{label}' uploaded ({width}x{height})");

        Ok(Self {
            id: TextureId::next(),
            width,
            height,
            gpu: Arc::new(GpuTexture { _texture: texture, view }),
        })
    }

    /// Decodes an encoded image (PNG, JPEG, BMP) and uploads it.
    pub fn from_image_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        bytes: &[u8],
    ) -> Result<Self> {
        let image = decode_rgba8(bytes)?;
        Self::from_rgba8(device, queue, label, image.width, image.height, &image.pixels)
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.gpu.view
    }
}

impl SpriteTexture for Texture {
    fn id(&self) -> TextureId {
        self.id
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
