//! Sprite batch demo.
//!
//! Fills the window with scrolling 16 px checkerboard tiles, then draws a strip of large
//! sprites from a second texture (an image given on the command line, or a warm
//! checkerboard) on top. The background alone holds more sprites than one instance buffer,
//! and the overlay switches texture, so each frame exercises both flush triggers.
//!
//! `RUST_LOG=quadra_engine=trace` logs every flush.

mod grid;

use anyhow::{Context, Result};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use quadra_engine::coords::{ColorRgba, Rect};
use quadra_engine::core::{App, AppControl, FrameCtx};
use quadra_engine::device::{GpuInit, VsyncWait};
use quadra_engine::logging::{init_logging, LoggingConfig};
use quadra_engine::render::RenderCtx;
use quadra_engine::render::sprite::{
    SamplerConfig, SpriteBatch, SpriteBatchConfig, SpriteShader, WgpuSpriteDevice,
};
use quadra_engine::texture::Texture;
use quadra_engine::window::{Runtime, RuntimeConfig};

const TILE: f32 = 16.0;
const BADGE: f32 = 96.0;
const BADGES: u32 = 8;
const SCROLL_SPEED: f32 = 40.0; // px/s

struct Resources {
    batch: SpriteBatch<WgpuSpriteDevice>,
    textures: [Texture; 2],
}

impl Resources {
    fn create(ctx: &RenderCtx<'_>, image: Option<&[u8]>) -> Result<Self> {
        let device = WgpuSpriteDevice::new(ctx, SpriteShader::builtin(), &SamplerConfig::default())?;
        let batch = SpriteBatch::init(device, &SpriteBatchConfig::default())?;

        let checker = Texture::from_rgba8(
            ctx.device,
            ctx.queue,
            "checker",
            64,
            64,
            &grid::checkerboard(64, 8, [230, 230, 230, 255], [40, 40, 48, 255]),
        )?;

        let second = match image {
            Some(bytes) => Texture::from_image_bytes(ctx.device, ctx.queue, "image", bytes)?,
            None => Texture::from_rgba8(
                ctx.device,
                ctx.queue,
                "checker-warm",
                32,
                32,
                &grid::checkerboard(32, 4, [250, 170, 60, 255], [120, 40, 20, 255]),
            )?,
        };

        Ok(Self { batch, textures: [checker, second] })
    }
}

struct Demo {
    image: Option<Vec<u8>>,
    resources: Option<Resources>,
    scroll: f32,
}

impl App for Demo {
    fn on_window_event(&mut self, _id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.resources.is_none() {
            match Resources::create(&ctx.render_ctx(), self.image.as_deref()) {
                Ok(resources) => self.resources = Some(resources),
                Err(e) => {
                    log::error!("failed to create sprite resources: {e:#}");
                    return AppControl::Exit;
                }
            }
        }
        let Some(Resources { batch, textures }) = self.resources.as_mut() else {
            return AppControl::Exit;
        };

        self.scroll += SCROLL_SPEED * ctx.time.dt;
        let scroll = self.scroll;
        let (width, height) = ctx.window.physical_size();
        let (cols, rows) = grid::cover(width, height, TILE);
        let [checker, badge] = &*textures;

        let control = ctx.render_sprites(ColorRgba::from_u8(18, 18, 24, 255), batch, |batch| {
            let tile_src = Rect::from_size(checker.width(), checker.height());
            for dst in grid::layout(cols, rows, TILE, scroll) {
                batch.draw(checker, dst, tile_src);
            }

            let badge_src = Rect::from_size(badge.width(), badge.height());
            for dst in grid::badges(BADGES, BADGE, width as f32, height as f32, scroll) {
                batch.draw(badge, dst, badge_src);
            }
        });

        let frame_index = ctx.time.frame_index;
        if frame_index % 300 == 0 {
            let stats = batch.stats();
            log::info!(
                "frame {frame_index}: {} sprites in {} draws, {:.0} fps",
                stats.sprites,
                stats.flushes,
                ctx.time.fps()
            );
        }

        control
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let image = std::env::args()
        .nth(1)
        .map(|path| std::fs::read(&path).with_context(|| format!("failed to read image '{path}'")))
        .transpose()?;

    let demo = Demo { image, resources: None, scroll: 0.0 };

    Runtime::run(
        RuntimeConfig {
            title: "quadra sprite batch".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            resizable: true,
        },
        GpuInit { vsync: VsyncWait::Frames1, ..GpuInit::default() },
        demo,
    )
}
