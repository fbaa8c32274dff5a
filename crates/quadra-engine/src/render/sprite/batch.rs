use anyhow::{ensure, Result};

use crate::coords::Rect;
use crate::debug;

use super::buffer::InstanceBuffer;
use super::instance::INSTANCE_SIZE;
use super::quad::VERTICES_PER_SPRITE;
use super::{SpriteDevice, SpriteInstance, SpriteTexture};

/// Sprite batch configuration.
#[derive(Debug, Clone)]
pub struct SpriteBatchConfig {
    /// Instance buffer size in bytes. Capacity is `buffer_bytes / 32` sprites.
    pub buffer_bytes: usize,
}

impl SpriteBatchConfig {
    /// Sprites that fit in one mapping of the instance buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer_bytes / INSTANCE_SIZE
    }
}

impl Default for SpriteBatchConfig {
    fn default() -> Self {
        Self { buffer_bytes: 64 * 1024 }
    }
}

/// Counters for the current (or last finished) recording session.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct BatchStats {
    pub sprites: u32,
    pub flushes: u32,
    pub largest_flush: u32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum BatchState {
    Idle,
    Recording,
}

/// Coalesces textured rectangle draws into as few instanced GPU draws as possible.
///
/// A session is `begin()`, any number of `draw()`, then `end()`. Consecutive draws with the
/// same texture share one GPU draw; a texture change or a full instance buffer flushes the
/// pending run first. Sessions cannot nest.
///
/// Call order is a precondition: it is asserted in debug builds and unchecked in release
/// builds (see [`crate::debug`]).
///
/// Dropping the batch releases the device, unmapping the instance buffer first if a
/// session is still open. Pending sprites of an unfinished session are discarded.
pub struct SpriteBatch<D: SpriteDevice> {
    device: D,
    buffer: InstanceBuffer,
    current_texture: Option<D::Texture>,
    state: BatchState,
    stats: BatchStats,
}

impl<D: SpriteDevice> SpriteBatch<D> {
    /// Allocates the instance buffer on `device` and takes ownership of it.
    pub fn init(mut device: D, config: &SpriteBatchConfig) -> Result<Self> {
        let capacity = config.capacity();
        ensure!(
            capacity > 0,
            "sprite buffer of {} bytes holds no {INSTANCE_SIZE}-byte instance",
            config.buffer_bytes
        );

        device.allocate(capacity)?;
        log::debug!(
            "sprite batch: {capacity} instances per buffer ({} bytes)",
            capacity * INSTANCE_SIZE
        );

        Ok(Self {
            device,
            buffer: InstanceBuffer::new(capacity),
            current_texture: None,
            state: BatchState::Idle,
            stats: BatchStats::default(),
        })
    }

    /// Releases the batch and its device resources.
    pub fn term(self) {
        drop(self);
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.state == BatchState::Recording
    }

    #[inline]
    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    #[inline]
    pub fn device(&self) -> &D {
        &self.device
    }

    #[inline]
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Starts a recording session: maps the instance buffer and binds the sprite pipeline.
    pub fn begin(&mut self) {
        debug::invariant(self.state == BatchState::Idle, "SpriteBatch::begin while already recording");

        debug::check(self.buffer.map(&mut self.device), "map sprite buffer");
        self.current_texture = None;
        debug::check(self.device.bind_pipeline(), "bind sprite pipeline");

        self.stats = BatchStats::default();
        self.state = BatchState::Recording;
    }

    /// Records one sprite: texels `src` of `texture` drawn into pixels `dst`.
    ///
    /// Flushes first when the buffer is full or `texture` differs from the texture of the
    /// pending run.
    pub fn draw(&mut self, texture: &D::Texture, dst: Rect, src: Rect) {
        debug::invariant(self.state == BatchState::Recording, "SpriteBatch::draw outside begin/end");

        let texture_changed = self
            .current_texture
            .as_ref()
            .is_none_or(|current| current.id() != texture.id());

        if self.buffer.is_full() || texture_changed {
            self.flush();
        }
        if !self.buffer.is_mapped() {
            debug::check(self.buffer.map(&mut self.device), "map sprite buffer");
        }
        if texture_changed {
            self.current_texture = Some(texture.clone());
        }

        let instance = SpriteInstance::new(dst, src, self.device.viewport(), texture.size());
        if debug::check(self.buffer.push(instance), "append sprite instance").is_some() {
            self.stats.sprites += 1;
        }
    }

    /// Ends the session, submitting whatever is pending. The buffer is left unmapped.
    pub fn end(&mut self) {
        debug::invariant(self.state == BatchState::Recording, "SpriteBatch::end without begin");

        self.flush();
        if self.buffer.is_mapped() {
            debug::check(self.buffer.release(&mut self.device), "unmap sprite buffer");
        }
        self.current_texture = None;
        self.state = BatchState::Idle;

        log::trace!(
            "sprite session: {} sprites, {} draws, largest {}",
            self.stats.sprites,
            self.stats.flushes,
            self.stats.largest_flush
        );
    }

    /// Submits the pending run as one instanced draw. A no-op when nothing is pending.
    ///
    /// Leaves the buffer unmapped; the next `draw` remaps it.
    pub fn flush(&mut self) {
        if self.buffer.pending() == 0 {
            return;
        }
        let Some(texture) = self.current_texture.as_ref() else {
            debug::invariant(false, "pending sprites without a bound texture");
            return;
        };

        let Some(count) = debug::check(self.buffer.unmap(&mut self.device), "unmap sprite buffer") else {
            return;
        };
        let count = count as u32;

        let drawn = debug::check(self.device.bind_resources(texture), "bind sprite resources")
            .and_then(|()| {
                debug::check(
                    self.device.draw_instanced(VERTICES_PER_SPRITE, count),
                    "draw sprite batch",
                )
            });
        if drawn.is_none() {
            return;
        }

        self.stats.flushes += 1;
        self.stats.largest_flush = self.stats.largest_flush.max(count);
        log::trace!("sprite flush: {count} instances, texture {:?}", texture.id());
    }
}

impl<D: SpriteDevice> Drop for SpriteBatch<D> {
    fn drop(&mut self) {
        if self.buffer.is_mapped() {
            if let Err(err) = self.buffer.release(&mut self.device) {
                log::warn!("sprite batch: failed to unmap instance buffer on drop: {err:#}");
            }
        }
    }
}
