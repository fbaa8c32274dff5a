//! GPU device + surface management.
//!
//! Creates the wgpu instance, adapter, device and queue, configures the window surface
//! from [`GpuInit`], and hands out one [`GpuFrame`] per presented image.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::{GpuInit, VsyncWait};
pub use surface::SurfaceErrorAction;
