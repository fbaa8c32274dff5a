use std::num::NonZeroU64;
use std::sync::Arc;

use anyhow::{bail, ensure, Result};

use crate::coords::Viewport;
use crate::debug;
use crate::render::{RenderCtx, RenderTarget};
use crate::texture::Texture;

use super::instance::INSTANCE_SIZE;
use super::shader::{ShaderStage, SpriteShader};
use super::{SpriteBatch, SpriteDevice, SpriteInstance};

const INSTANCE_BINDING_SIZE: Option<NonZeroU64> = NonZeroU64::new(INSTANCE_SIZE as u64);

/// Sampler used for every sprite texture.
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    pub filter: wgpu::FilterMode,
    pub address_mode: wgpu::AddressMode,
}

impl Default for SamplerConfig {
    /// Point sampling, clamped: texels stay crisp at integer scales.
    fn default() -> Self {
        Self {
            filter: wgpu::FilterMode::Nearest,
            address_mode: wgpu::AddressMode::ClampToEdge,
        }
    }
}

struct RecordedDraw {
    bind_group: wgpu::BindGroup,
    vertices: u32,
    instances: u32,
}

/// [`SpriteDevice`] on top of wgpu.
///
/// Instance buffer:
/// - a ring of `STORAGE | COPY_DST` buffers, each `capacity` records long
/// - every `map_discard` takes the next ring slot, growing the ring on first use, so a
///   mapping never waits on a slot the GPU may still read this frame
/// - `unmap` uploads the written records with `Queue::write_buffer`
///
/// Draw calls are recorded as `(bind group, counts)` and replayed into one render pass by
/// [`encode`](Self::encode). Slots stay taken across any number of sessions and encodes
/// until [`frame_submitted`](Self::frame_submitted) reports that the encoder holding their
/// draws went to the queue; only then does the ring rewind. Uploads after that point are
/// ordered behind the submission, so a reused slot never changes data a pending draw reads.
pub struct WgpuSpriteDevice {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,

    shader: SpriteShader,
    pipeline_format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    viewport: Viewport,

    capacity: usize,
    ring: Vec<wgpu::Buffer>,
    next_slot: usize,
    mapped_slot: Option<usize>,
    readable_slot: Option<usize>,

    pipeline_bound: bool,
    bound: Option<wgpu::BindGroup>,
    recorded: Vec<RecordedDraw>,
}

impl WgpuSpriteDevice {
    /// Compiles `shader` for `ctx.surface_format` and creates the sampler.
    ///
    /// The instance ring is allocated later by `SpriteBatch::init`.
    pub fn new(ctx: &RenderCtx<'_>, shader: SpriteShader, sampler: &SamplerConfig) -> Result<Self> {
        shader.validate()?;

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quadra sprite bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStage::Vertex.wgpu_stages(),
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: INSTANCE_BINDING_SIZE,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStage::Fragment.wgpu_stages(),
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: ShaderStage::Fragment.wgpu_stages(),
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline = build_pipeline(ctx.device, &bind_group_layout, &shader, ctx.surface_format);

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("quadra sprite sampler"),
            address_mode_u: sampler.address_mode,
            address_mode_v: sampler.address_mode,
            address_mode_w: sampler.address_mode,
            mag_filter: sampler.filter,
            min_filter: sampler.filter,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            device: Arc::clone(ctx.device),
            queue: Arc::clone(ctx.queue),
            shader,
            pipeline_format: ctx.surface_format,
            pipeline,
            bind_group_layout,
            sampler,
            viewport: ctx.viewport,
            capacity: 0,
            ring: Vec::new(),
            next_slot: 0,
            mapped_slot: None,
            readable_slot: None,
            pipeline_bound: false,
            bound: None,
            recorded: Vec::new(),
        })
    }

    /// Adopts the frame's viewport and rebuilds the pipeline if the surface format changed.
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>) {
        self.viewport = ctx.viewport;
        if self.pipeline_format != ctx.surface_format {
            log::debug!(
                "sprite pipeline: surface format {:?} -> {:?}",
                self.pipeline_format,
                ctx.surface_format
            );
            self.pipeline = build_pipeline(&self.device, &self.bind_group_layout, &self.shader, ctx.surface_format);
            self.pipeline_format = ctx.surface_format;
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Ring slots allocated so far.
    pub fn ring_len(&self) -> usize {
        self.ring.len()
    }

    /// Replays recorded draws into a single render pass on `target`.
    ///
    /// Returns the number of draws encoded. The pass loads the existing target contents.
    /// The slots those draws read stay reserved until [`frame_submitted`](Self::frame_submitted).
    pub fn encode(&mut self, target: &mut RenderTarget<'_>) -> usize {
        debug::invariant(self.mapped_slot.is_none(), "sprite draws encoded while the instance buffer is mapped");

        let count = self.recorded.len();
        if count > 0 {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quadra sprite pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(&self.pipeline);
            for draw in &self.recorded {
                rpass.set_bind_group(0, &draw.bind_group, &[]);
                rpass.draw(0..draw.vertices, 0..draw.instances);
            }
        }

        self.recorded.clear();
        self.bound = None;
        self.readable_slot = None;
        self.pipeline_bound = false;
        count
    }

    /// Marks every encoded draw as submitted and rewinds the ring to its first slot.
    ///
    /// Call after the `queue.submit` that carries the encoders passed to `encode`. Draws
    /// recorded but never encoded are dropped.
    pub fn frame_submitted(&mut self) {
        debug::invariant(self.mapped_slot.is_none(), "frame submitted while the sprite buffer is mapped");

        if !self.recorded.is_empty() {
            log::warn!("dropping {} sprite draws that were never encoded", self.recorded.len());
            self.recorded.clear();
        }
        self.bound = None;
        self.readable_slot = None;
        self.next_slot = 0;
    }

    /// Ring slots handed out since the last submit.
    pub fn slots_in_flight(&self) -> usize {
        self.next_slot
    }

    fn create_slot(&self, slot: usize) -> wgpu::Buffer {
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("quadra sprite instances #{slot}")),
            size: (self.capacity * INSTANCE_SIZE) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }
}

impl SpriteDevice for WgpuSpriteDevice {
    type Texture = Texture;

    fn allocate(&mut self, capacity: usize) -> Result<()> {
        ensure!(capacity > 0, "zero-capacity sprite buffer");
        let bytes = (capacity * INSTANCE_SIZE) as u64;
        let max = self.device.limits().max_storage_buffer_binding_size as u64;
        ensure!(bytes <= max, "sprite buffer of {bytes} bytes exceeds the device limit of {max}");

        self.capacity = capacity;
        self.ring.clear();
        self.ring.push(self.create_slot(0));
        self.next_slot = 0;
        Ok(())
    }

    fn map_discard(&mut self) -> Result<()> {
        ensure!(self.capacity > 0, "sprite buffer not allocated");
        ensure!(self.mapped_slot.is_none(), "sprite buffer is already mapped");

        let slot = self.next_slot;
        if slot == self.ring.len() {
            let buffer = self.create_slot(slot);
            self.ring.push(buffer);
            log::debug!("sprite ring grew to {} buffers", self.ring.len());
        }
        self.next_slot += 1;
        self.mapped_slot = Some(slot);
        self.readable_slot = None;
        Ok(())
    }

    fn unmap(&mut self, written: &[SpriteInstance]) -> Result<()> {
        let Some(slot) = self.mapped_slot.take() else {
            bail!("sprite buffer is not mapped");
        };
        ensure!(
            written.len() <= self.capacity,
            "{} sprites written into a {}-sprite buffer",
            written.len(),
            self.capacity
        );

        if !written.is_empty() {
            self.queue.write_buffer(&self.ring[slot], 0, bytemuck::cast_slice(written));
            self.readable_slot = Some(slot);
        }
        Ok(())
    }

    fn bind_pipeline(&mut self) -> Result<()> {
        self.pipeline_bound = true;
        Ok(())
    }

    fn bind_resources(&mut self, texture: &Texture) -> Result<()> {
        ensure!(self.mapped_slot.is_none(), "sprite buffer bound while mapped");
        let Some(slot) = self.readable_slot else {
            bail!("no sprite instances published since the last map");
        };

        self.bound = Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quadra sprite bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.ring[slot].as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        }));
        Ok(())
    }

    fn draw_instanced(&mut self, vertices_per_instance: u32, instance_count: u32) -> Result<()> {
        ensure!(self.pipeline_bound, "sprite pipeline not bound");
        let Some(bind_group) = self.bound.take() else {
            bail!("sprite draw without bound resources");
        };
        self.recorded.push(RecordedDraw {
            bind_group,
            vertices: vertices_per_instance,
            instances: instance_count,
        });
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl SpriteBatch<WgpuSpriteDevice> {
    /// Runs one recording session and encodes its draws into `target`.
    ///
    /// `record` issues `draw` calls on the batch; `begin`/`end` are handled here. Several
    /// sessions may target one frame; call [`frame_submitted`](Self::frame_submitted) once
    /// the frame's commands are submitted.
    pub fn render_with<F>(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, record: F)
    where
        F: FnOnce(&mut Self),
    {
        self.device_mut().prepare(ctx);
        self.begin();
        record(self);
        self.end();
        self.device_mut().encode(target);
    }

    /// Releases the instance slots of every session encoded since the last submit.
    pub fn frame_submitted(&mut self) {
        debug::invariant(!self.is_recording(), "frame submitted during a sprite session");
        self.device_mut().frame_submitted();
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    shader: &SpriteShader,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&*shader.label),
        source: wgpu::ShaderSource::Wgsl(shader.source.clone()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("quadra sprite pipeline layout"),
        bind_group_layouts: &[bind_group_layout],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("quadra sprite pipeline"),
        layout: Some(&pipeline_layout),

        // No vertex buffers: corners come from vertex_index, records from the storage buffer.
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some(shader.entry_point(ShaderStage::Vertex)),
            compilation_options: Default::default(),
            buffers: &[],
        },

        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some(shader.entry_point(ShaderStage::Fragment)),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
