use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::FrameClock;

/// Window configuration for [`Runtime::run`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "quadra".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            resizable: true,
        }
    }
}

impl RuntimeConfig {
    fn window_attributes(&self) -> WindowAttributes {
        Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(self.initial_size)
            .with_resizable(self.resizable)
    }
}

/// Drives a single window: opens it with its GPU surface on resume, forwards events to the
/// [`App`], and renders one frame per redraw.
pub struct Runtime;

impl Runtime {
    /// Runs until the app returns [`AppControl::Exit`] or the window is closed.
    ///
    /// A window or GPU initialization failure stops the loop and is returned.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut host = Host {
            config,
            gpu_init,
            app,
            display: None,
            failure: None,
        };

        event_loop
            .run_app(&mut host)
            .context("winit event loop terminated with error")?;

        host.failure.map_or(Ok(()), Err)
    }
}

/// The window and the GPU surface borrowing it.
#[self_referencing]
struct Display {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl Display {
    fn open(event_loop: &ActiveEventLoop, config: &RuntimeConfig, gpu_init: GpuInit) -> Result<Self> {
        let window = event_loop
            .create_window(config.window_attributes())
            .context("failed to create window")?;

        DisplayTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")
    }

    fn id(&self) -> WindowId {
        self.borrow_window().id()
    }

    fn inner_size(&self) -> PhysicalSize<u32> {
        self.borrow_window().inner_size()
    }

    fn request_redraw(&self) {
        self.borrow_window().request_redraw();
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        log::debug!("surface resized to {}x{}", size.width, size.height);
        self.with_gpu_mut(|gpu| gpu.resize(size));
    }

    fn frame<A: App>(&mut self, app: &mut A) -> AppControl {
        self.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: fields.window.id(),
                    window: fields.window,
                },
                gpu: fields.gpu,
                time: fields.clock.tick(),
            };
            app.on_frame(&mut ctx)
        })
    }
}

struct Host<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    display: Option<Display>,
    failure: Option<anyhow::Error>,
}

impl<A> ApplicationHandler for Host<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.display.is_some() {
            return;
        }

        match Display::open(event_loop, &self.config, self.gpu_init.clone()) {
            Ok(display) => {
                display.request_redraw();
                self.display = Some(display);
            }
            Err(err) => {
                log::error!("{err:#}");
                self.failure = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Continuous redraw; pacing comes from the surface present mode.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(display) = &self.display {
            display.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(display) = self.display.as_mut() else {
            return;
        };
        if display.id() != window_id {
            return;
        }

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.display = None;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                display.resize(size);
                display.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = display.inner_size();
                display.resize(size);
            }
            WindowEvent::RedrawRequested => {
                if display.frame(&mut self.app) == AppControl::Exit {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::Size;

    #[test]
    fn default_config_is_resizable() {
        let cfg = RuntimeConfig::default();
        assert!(cfg.resizable);
        assert_eq!(cfg.title, "quadra");
    }

    #[test]
    fn window_attributes_follow_config() {
        let cfg = RuntimeConfig {
            title: "sprites".to_string(),
            initial_size: LogicalSize::new(640.0, 480.0),
            resizable: false,
        };
        let attrs = cfg.window_attributes();

        assert_eq!(attrs.title, "sprites");
        assert!(!attrs.resizable);
        assert_eq!(attrs.inner_size, Some(Size::Logical(LogicalSize::new(640.0, 480.0))));
    }
}
