//! Recording device + texture doubles for sprite batch tests.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{ensure, Result};

use crate::coords::Viewport;

use super::{SpriteDevice, SpriteInstance, SpriteTexture, TextureId};

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    Allocate(usize),
    Map,
    Unmap(usize),
    BindPipeline,
    BindResources(TextureId),
    Draw { vertices: u32, instances: u32 },
}

/// Everything a [`MockDevice`] saw. Shared with the test so it outlives the device.
#[derive(Debug, Default, Clone)]
pub struct DeviceLog {
    pub calls: Vec<DeviceCall>,
    /// Records received by each `unmap`, in call order.
    pub published: Vec<Vec<SpriteInstance>>,
    pub mapped: bool,
    pub released: bool,
    /// Makes every following `map_discard` fail, as a lost device would.
    pub fail_maps: bool,
}

impl DeviceLog {
    /// `(vertices_per_instance, instance_count)` of every draw.
    pub fn draws(&self) -> Vec<(u32, u32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DeviceCall::Draw { vertices, instances } => Some((*vertices, *instances)),
                _ => None,
            })
            .collect()
    }

    /// Texture bound for each draw, in order.
    pub fn bound_textures(&self) -> Vec<TextureId> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DeviceCall::BindResources(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &DeviceCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

/// Device double that records calls and enforces the map/unmap access windows.
pub struct MockDevice {
    log: Rc<RefCell<DeviceLog>>,
    viewport: Viewport,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::with_viewport(Viewport::new(1920.0, 1080.0))
    }

    pub fn with_viewport(viewport: Viewport) -> Self {
        Self { log: Rc::default(), viewport }
    }

    /// Shared handle to the call log; stays readable after the device is dropped.
    pub fn handle(&self) -> Rc<RefCell<DeviceLog>> {
        Rc::clone(&self.log)
    }

    pub fn log(&self) -> DeviceLog {
        self.log.borrow().clone()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
}

impl SpriteDevice for MockDevice {
    type Texture = MockTexture;

    fn allocate(&mut self, capacity: usize) -> Result<()> {
        ensure!(capacity > 0, "zero-capacity instance buffer");
        self.log.borrow_mut().calls.push(DeviceCall::Allocate(capacity));
        Ok(())
    }

    fn map_discard(&mut self) -> Result<()> {
        let mut log = self.log.borrow_mut();
        ensure!(!log.fail_maps, "device lost");
        ensure!(!log.mapped, "map while mapped");
        log.mapped = true;
        log.calls.push(DeviceCall::Map);
        Ok(())
    }

    fn unmap(&mut self, written: &[SpriteInstance]) -> Result<()> {
        let mut log = self.log.borrow_mut();
        ensure!(log.mapped, "unmap while unmapped");
        log.mapped = false;
        log.calls.push(DeviceCall::Unmap(written.len()));
        log.published.push(written.to_vec());
        Ok(())
    }

    fn bind_pipeline(&mut self) -> Result<()> {
        self.log.borrow_mut().calls.push(DeviceCall::BindPipeline);
        Ok(())
    }

    fn bind_resources(&mut self, texture: &MockTexture) -> Result<()> {
        let mut log = self.log.borrow_mut();
        ensure!(!log.mapped, "instance buffer bound for reading while mapped");
        log.calls.push(DeviceCall::BindResources(texture.id));
        Ok(())
    }

    fn draw_instanced(&mut self, vertices_per_instance: u32, instance_count: u32) -> Result<()> {
        let mut log = self.log.borrow_mut();
        ensure!(!log.mapped, "draw issued while the instance buffer is mapped");
        log.calls.push(DeviceCall::Draw { vertices: vertices_per_instance, instances: instance_count });
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.log.borrow_mut().released = true;
    }
}

#[derive(Debug, Clone)]
pub struct MockTexture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

impl MockTexture {
    pub fn new(width: u32, height: u32) -> Self {
        Self { id: TextureId::next(), width, height }
    }
}

impl SpriteTexture for MockTexture {
    fn id(&self) -> TextureId {
        self.id
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
