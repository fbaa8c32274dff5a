use winit::window::{Window, WindowId};

use crate::coords::{ColorRgba, Viewport};
use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};
use crate::render::sprite::{SpriteBatch, WgpuSpriteDevice};
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Drawable size in physical pixels, the space sprite destination rects live in.
    pub fn physical_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Renderer context for creating GPU resources outside a frame (textures, batches).
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        let size = self.gpu.size();
        RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            Viewport::from_physical(size.width, size.height),
        )
    }

    /// Clears the surface and draws one sprite session into it.
    ///
    /// The batch's instance slots are released once the frame is submitted, including when
    /// the frame was skipped.
    pub fn render_sprites<F>(
        &mut self,
        clear: ColorRgba,
        batch: &mut SpriteBatch<WgpuSpriteDevice>,
        record: F,
    ) -> AppControl
    where
        F: FnOnce(&mut SpriteBatch<WgpuSpriteDevice>),
    {
        let control = self.render(clear, |ctx, target| batch.render_with(ctx, target, record));
        batch.frame_submitted();
        control
    }

    /// Clears the surface with `clear`, calls `draw` with a ready [`RenderCtx`] and
    /// [`RenderTarget`], then presents the frame.
    ///
    /// The viewport handed to `draw` is the surface size in physical pixels. A lost or
    /// outdated surface skips the frame; an out-of-memory surface asks the runtime to exit.
    pub fn render<F>(&mut self, clear: ColorRgba, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            // Minimized.
            return AppControl::Continue;
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::warn!("surface error: {err}");
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        AppControl::Continue
                    }
                };
            }
        };

        clear_pass(&mut frame, clear);

        let rctx = self.render_ctx();
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}

fn clear_pass(frame: &mut GpuFrame, clear: ColorRgba) {
    let _pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("quadra clear"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: &frame.view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });
}
