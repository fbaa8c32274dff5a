use anyhow::{ensure, Result};

use super::{SpriteDevice, SpriteInstance};

/// Fixed-capacity instance buffer with a single write cursor.
///
/// The buffer alternates between two access windows that never overlap:
/// - mapped: the CPU appends records at the cursor
/// - unmapped: the device may read what was published by the last `unmap`
///
/// CPU writes land in a staging slice owned here; the device receives them on `unmap`.
/// Each `map` asks the device for discard semantics, so the GPU copy written by the
/// previous mapping can still be in flight.
#[derive(Debug)]
pub struct InstanceBuffer {
    staging: Box<[SpriteInstance]>,
    cursor: usize,
    mapped: bool,
}

impl InstanceBuffer {
    /// Creates an unmapped buffer holding `capacity` records. `capacity` must be non-zero.
    pub fn new(capacity: usize) -> Self {
        Self {
            staging: vec![SpriteInstance::default(); capacity].into_boxed_slice(),
            cursor: 0,
            mapped: false,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.staging.len()
    }

    /// Records written since the last map.
    #[inline]
    pub fn pending(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.cursor == self.staging.len()
    }

    #[inline]
    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    /// Opens the CPU write window and rewinds the cursor to the buffer start.
    ///
    /// Returns the number of records that fit before the buffer must be flushed.
    pub fn map<D: SpriteDevice>(&mut self, device: &mut D) -> Result<usize> {
        ensure!(!self.mapped, "instance buffer is already mapped");
        device.map_discard()?;
        self.mapped = true;
        self.cursor = 0;
        Ok(self.capacity())
    }

    /// Appends one record at the cursor.
    pub fn push(&mut self, instance: SpriteInstance) -> Result<()> {
        ensure!(self.mapped, "instance buffer written while unmapped");
        ensure!(!self.is_full(), "instance buffer overflow ({} records)", self.capacity());
        self.staging[self.cursor] = instance;
        self.cursor += 1;
        Ok(())
    }

    /// Publishes the written records to the device and closes the write window.
    ///
    /// Returns how many records were published.
    pub fn unmap<D: SpriteDevice>(&mut self, device: &mut D) -> Result<usize> {
        ensure!(self.mapped, "instance buffer is not mapped");
        let written = self.cursor;
        device.unmap(&self.staging[..written])?;
        self.mapped = false;
        self.cursor = 0;
        Ok(written)
    }

    /// Closes the write window without publishing anything.
    pub fn release<D: SpriteDevice>(&mut self, device: &mut D) -> Result<()> {
        ensure!(self.mapped, "instance buffer is not mapped");
        self.mapped = false;
        self.cursor = 0;
        device.unmap(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::sprite::testing::{DeviceCall, MockDevice};

    fn inst(x: f32) -> SpriteInstance {
        SpriteInstance { x0: x, ..SpriteInstance::default() }
    }

    #[test]
    fn map_returns_capacity_and_rewinds() {
        let mut dev = MockDevice::new();
        let mut buf = InstanceBuffer::new(4);
        assert_eq!(buf.map(&mut dev).unwrap(), 4);
        buf.push(inst(1.0)).unwrap();
        buf.unmap(&mut dev).unwrap();
        buf.map(&mut dev).unwrap();
        assert_eq!(buf.pending(), 0);
    }

    #[test]
    fn unmap_publishes_written_prefix_in_order() {
        let mut dev = MockDevice::new();
        let mut buf = InstanceBuffer::new(4);
        buf.map(&mut dev).unwrap();
        buf.push(inst(1.0)).unwrap();
        buf.push(inst(2.0)).unwrap();
        assert_eq!(buf.unmap(&mut dev).unwrap(), 2);

        let log = dev.log();
        assert_eq!(log.calls, vec![DeviceCall::Map, DeviceCall::Unmap(2)]);
        let xs: Vec<f32> = log.published[0].iter().map(|s| s.x0).collect();
        assert_eq!(xs, vec![1.0, 2.0]);
    }

    #[test]
    fn push_stops_at_capacity() {
        let mut dev = MockDevice::new();
        let mut buf = InstanceBuffer::new(2);
        buf.map(&mut dev).unwrap();
        buf.push(inst(0.0)).unwrap();
        buf.push(inst(0.0)).unwrap();
        assert!(buf.is_full());
        assert!(buf.push(inst(0.0)).is_err());
        assert_eq!(buf.pending(), 2);
    }

    #[test]
    fn writes_require_mapping() {
        let mut buf = InstanceBuffer::new(2);
        assert!(buf.push(inst(0.0)).is_err());
    }

    #[test]
    fn map_and_unmap_preconditions() {
        let mut dev = MockDevice::new();
        let mut buf = InstanceBuffer::new(2);
        assert!(buf.unmap(&mut dev).is_err());
        buf.map(&mut dev).unwrap();
        assert!(buf.map(&mut dev).is_err());
        assert!(buf.is_mapped());
    }

    #[test]
    fn release_publishes_nothing() {
        let mut dev = MockDevice::new();
        let mut buf = InstanceBuffer::new(2);
        buf.map(&mut dev).unwrap();
        buf.push(inst(3.0)).unwrap();
        buf.release(&mut dev).unwrap();
        assert!(!buf.is_mapped());
        assert_eq!(buf.pending(), 0);
        assert_eq!(dev.log().calls, vec![DeviceCall::Map, DeviceCall::Unmap(0)]);
    }
}
